//! Full runs through the coordinator, checking the written reports

use crate::test_config;
use std::fs;
use tempfile::TempDir;
use url::Url;
use webrecon::coordinator::seed_directory_name;
use webrecon::output::Findings;
use webrecon::tasks::{parse_task_selectors, Task};
use webrecon::{Coordinator, ReconError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HOME: &str = r#"<!DOCTYPE html>
<html lang="de">
<head>
    <title>Mock Shop</title>
    <meta name="description" content="A shop that does not exist">
    <script src="/static/app.js"></script>
</head>
<body>
    <!-- main navigation -->
    <h1>Welcome</h1>
    <p>Contact us at shop@mock.test or +49 30 1234567.</p>
    <a href="/">Home</a>
    <a href="/missing">Gone</a>
    <img src="/img/logo.png" alt="Logo">
</body>
</html>"#;

async fn mock_site() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(HOME)
                .insert_header("content-type", "text/html")
                .insert_header("set-cookie", "session=abc123; Path=/; HttpOnly"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "User-agent: *\nDisallow: /private\nCrawl-delay: 2\nSitemap: {}/sitemap.xml\n",
            server.uri()
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
                <url><loc>{0}/</loc></url>
                <url><loc>{0}/about</loc></url>
            </urlset>"#,
            server.uri()
        )))
        .mount(&server)
        .await;

    server
}

#[tokio::test]
async fn test_single_page_tasks_write_reports() {
    let server = mock_site().await;
    let output = TempDir::new().unwrap();
    let database = output.path().join("results.db");

    let mut config = test_config();
    config.output.directory = output.path().display().to_string();
    config.output.database_path = Some(database.display().to_string());

    let seed = Url::parse(&server.uri()).unwrap();
    let tasks = parse_task_selectors("3,4,5,6,7,8,9,10,11").unwrap();
    let mut coordinator = Coordinator::new(config, "test-hash", seed.clone()).unwrap();

    let reports = coordinator.run(&tasks).await.unwrap();
    assert_eq!(reports.len(), 9);

    let directory = output.path().join(seed_directory_name(&seed));
    let read = |name: &str| fs::read_to_string(directory.join(name)).unwrap();

    let robots = read("scraped_data_robots_txt.md");
    assert!(robots.starts_with(&format!("# URL: {}", seed)));
    assert!(robots.contains("Disallow: /private"));
    assert!(robots.contains("- Crawl-delay: 2 seconds"));
    assert!(robots.contains(&format!("- Sitemap: {}/sitemap.xml", server.uri())));

    let embedded = read("scraped_data_embedded_links.md");
    assert!(embedded.contains("- /static/app.js\n- /img/logo.png\n"));

    let metadata = read("scraped_data_metadata.md");
    assert!(metadata.contains("**Title:** Mock Shop"));
    assert!(metadata.contains("**Description:** A shop that does not exist"));

    let analysis = read("url_analysis.md");
    assert!(analysis.contains("#### H1\n- Welcome"));
    assert!(analysis.contains("### Email Addresses\n- shop@mock.test"));
    assert!(analysis.contains("- main navigation"));

    let broken = read("scraped_data_broken_links.md");
    assert!(broken.contains(&format!("- {}/missing (HTTP 404)", server.uri())));
    assert!(!broken.contains(&format!("- {}/ (", server.uri())));

    let performance = read("scraped_data_performance_metrics.md");
    assert!(performance.contains(&format!("**Page Size:** {} bytes", HOME.len())));

    let cookies = read("scraped_data_cookies.md");
    assert!(cookies.contains("- session: abc123"));

    let sitemap = read("scraped_data_sitemap_urls.md");
    assert!(sitemap.contains(&format!("- {}/about", server.uri())));

    let language = read("scraped_data_language.md");
    assert!(language.contains("## Detected Language\nde\n"));

    let conn = rusqlite::Connection::open(&database).unwrap();
    let (status, hash): (String, String) = conn
        .query_row("SELECT status, config_hash FROM runs", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .unwrap();
    assert_eq!(status, "completed");
    assert_eq!(hash, "test-hash");

    let cookie_value: String = conn
        .query_row(
            "SELECT value FROM findings WHERE task = ?1 AND key = 'session'",
            [Task::Cookies.selector()],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(cookie_value, "abc123");
}

#[tokio::test]
async fn test_link_walks_through_coordinator() {
    let server = mock_site().await;
    let output = TempDir::new().unwrap();

    let mut config = test_config();
    config.output.directory = output.path().display().to_string();

    let seed = Url::parse(&server.uri()).unwrap();
    let mut coordinator = Coordinator::new(config, "test-hash", seed.clone()).unwrap();
    let reports = coordinator
        .run(&[Task::CrossDomainLinks, Task::PageLinks])
        .await
        .unwrap();

    match &reports[1].findings {
        Findings::PageLinks(links) => assert_eq!(links, &vec![format!("{}/missing", server.uri())]),
        other => panic!("unexpected findings: {other:?}"),
    }

    let pages = fs::read_to_string(
        output
            .path()
            .join(seed_directory_name(&seed))
            .join("scraped_data_pages_links.md"),
    )
    .unwrap();
    assert!(pages.contains("## Pages Links\n- "));
}

#[tokio::test]
async fn test_unreachable_seed() {
    let output = TempDir::new().unwrap();

    let mut config = test_config();
    config.retry.attempts = 1;
    config.output.directory = output.path().display().to_string();

    // Nothing listens on port 1
    let seed = Url::parse("http://127.0.0.1:1/").unwrap();
    let mut coordinator = Coordinator::new(config, "test-hash", seed).unwrap();

    match coordinator.run(&[Task::PageLinks]).await {
        Err(ReconError::SeedUnreachable { url, .. }) => assert_eq!(url, "http://127.0.0.1:1/"),
        other => panic!("expected unreachable seed, got {other:?}"),
    }
}
