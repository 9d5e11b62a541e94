//! Walk and fetcher behaviour against live mock servers

use crate::{html_page, test_config};
use url::Url;
use webrecon::crawler::{
    CrossDomainWalker, FetchError, FetchResult, Fetcher, SameDomainWalker, Throttle, WalkLimits,
};
use webrecon::VisitedSet;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_page(server: &MockServer, route: &str, body: String, expected_fetches: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(expected_fetches)
        .mount(server)
        .await;
}

/// Three sites: a links to its own /page2 and to b; a/page2 links home and to c
struct Scenario {
    a: MockServer,
    b: MockServer,
    c: MockServer,
}

impl Scenario {
    /// Starts the servers, expecting the given number of fetches of the
    /// pages only some walks should reach
    async fn start(page2_fetches: u64, b_fetches: u64, c_fetches: u64) -> Self {
        let a = MockServer::start().await;
        let b = MockServer::start().await;
        let c = MockServer::start().await;

        let a_home = format!("{}/", a.uri());
        let b_ext = format!("{}/ext", b.uri());
        let c_ext = format!("{}/ext2", c.uri());

        mount_page(&a, "/", html_page(&[("/page2", "Page 2"), (b_ext.as_str(), "B")]), 1).await;
        mount_page(
            &a,
            "/page2",
            html_page(&[("/", "Home"), (c_ext.as_str(), "C")]),
            page2_fetches,
        )
        .await;
        mount_page(&b, "/ext", html_page(&[(a_home.as_str(), "Back")]), b_fetches).await;
        mount_page(&c, "/ext2", html_page(&[]), c_fetches).await;

        Self { a, b, c }
    }

    fn seed(&self) -> Url {
        Url::parse(&self.a.uri()).unwrap()
    }
}

#[tokio::test]
async fn test_cross_domain_walk_strict() {
    let scenario = Scenario::start(0, 1, 0).await;
    let config = test_config();
    let fetcher = Fetcher::from_config(&config).unwrap();
    let throttle = Throttle::new(config.crawler.request_delay());

    let mut visited = VisitedSet::new();
    let outcome = CrossDomainWalker::new(&fetcher, &throttle, WalkLimits::default())
        .walk(&scenario.seed(), &mut visited)
        .await;

    assert_eq!(outcome.links, vec![format!("{}/ext", scenario.b.uri())]);
    assert_eq!(outcome.stats.failed, 0);
}

#[tokio::test]
async fn test_cross_domain_walk_through_internal_pages() {
    let scenario = Scenario::start(1, 1, 1).await;
    let config = test_config();
    let fetcher = Fetcher::from_config(&config).unwrap();
    let throttle = Throttle::new(config.crawler.request_delay());

    let mut visited = VisitedSet::new();
    let outcome = CrossDomainWalker::new(&fetcher, &throttle, WalkLimits::default())
        .follow_internal(true)
        .walk(&scenario.seed(), &mut visited)
        .await;

    let mut links = outcome.links.clone();
    links.sort();
    let mut expected = vec![
        format!("{}/ext", scenario.b.uri()),
        format!("{}/ext2", scenario.c.uri()),
    ];
    expected.sort();
    assert_eq!(links, expected);
}

#[tokio::test]
async fn test_same_domain_walk() {
    let scenario = Scenario::start(1, 0, 0).await;
    let config = test_config();
    let fetcher = Fetcher::from_config(&config).unwrap();
    let throttle = Throttle::new(config.crawler.request_delay());

    let mut visited = VisitedSet::new();
    let outcome = SameDomainWalker::new(&fetcher, &throttle, WalkLimits::default())
        .walk(&scenario.seed(), &mut visited)
        .await;

    assert_eq!(outcome.links, vec![format!("{}/page2", scenario.a.uri())]);
}

#[tokio::test]
async fn test_same_domain_cycle_terminates() {
    let server = MockServer::start().await;

    mount_page(&server, "/", html_page(&[("/one", "1")]), 1).await;
    mount_page(&server, "/one", html_page(&[("/two", "2"), ("/", "home")]), 1).await;
    mount_page(&server, "/two", html_page(&[("/one", "1"), ("/three", "3")]), 1).await;
    mount_page(&server, "/three", html_page(&[("/", "home"), ("/two", "2")]), 1).await;

    let config = test_config();
    let fetcher = Fetcher::from_config(&config).unwrap();
    let throttle = Throttle::new(config.crawler.request_delay());
    let seed = Url::parse(&server.uri()).unwrap();

    let mut visited = VisitedSet::new();
    let outcome = SameDomainWalker::new(&fetcher, &throttle, WalkLimits::default())
        .walk(&seed, &mut visited)
        .await;

    let base = server.uri();
    assert_eq!(
        outcome.links,
        vec![
            format!("{}/one", base),
            format!("{}/two", base),
            format!("{}/three", base),
        ]
    );
}

#[tokio::test]
async fn test_retry_then_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("finally"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = Fetcher::from_config(&test_config()).unwrap();
    let result = fetcher.fetch(&format!("{}/flaky", server.uri())).await;

    let page = result.page().expect("third attempt should succeed");
    assert_eq!(page.attempts, 3);
    assert_eq!(page.text(), "finally");
}

#[tokio::test]
async fn test_retries_exhausted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let fetcher = Fetcher::from_config(&test_config()).unwrap();
    match fetcher.fetch(&format!("{}/down", server.uri())).await {
        FetchResult::Failure(failure) => {
            assert_eq!(failure.attempts, 3);
            assert_eq!(failure.status_code, Some(500));
            assert!(matches!(failure.error, FetchError::Status(500)));
        }
        FetchResult::Success(page) => panic!("unexpected success: HTTP {}", page.status_code),
    }
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = Fetcher::from_config(&test_config()).unwrap();
    let result = fetcher.fetch(&format!("{}/missing", server.uri())).await;

    assert_eq!(result.status_code(), Some(404));
    assert!(result.is_success());
}

#[tokio::test]
async fn test_requests_carry_pool_user_agent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(wiremock::matchers::header("user-agent", "OnlyAgent/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = test_config();
    config.user_agent.pool = vec!["OnlyAgent/1.0".to_string()];
    let fetcher = Fetcher::from_config(&config).unwrap();

    assert!(fetcher.fetch(&format!("{}/", server.uri())).await.is_success());
}
