/// Turns a URL into a string safe to use as a file or directory name
///
/// Every character outside `[A-Za-z0-9_-]` becomes `_`.
///
/// ```
/// use webrecon::url::sanitize_filename;
///
/// assert_eq!(sanitize_filename("https://example.com/a"), "https___example_com_a");
/// ```
pub fn sanitize_filename(url: &str) -> String {
    url.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_safe_characters() {
        assert_eq!(sanitize_filename("abc-DEF_123"), "abc-DEF_123");
    }

    #[test]
    fn test_sanitize_replaces_reserved_characters() {
        assert_eq!(
            sanitize_filename("http://a.test:8080/x?y=1"),
            "http___a_test_8080_x_y_1"
        );
    }

    #[test]
    fn test_sanitize_replaces_non_ascii() {
        assert_eq!(sanitize_filename("https://bücher.de"), "https___b_cher_de");
    }
}
