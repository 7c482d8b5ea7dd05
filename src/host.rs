/// Hostname extraction and host-list helpers
use url::Url;

/// Extract the hostname that partitions scratchpad data from a tab URL
///
/// Only web pages carry a host worth saving notes against, so anything
/// that is not `http`/`https` (browser internal pages, `file://`,
/// `about:blank`, unparsable strings) yields `None`.
///
/// Examples:
/// - https://www.google.com/search → www.google.com
/// - http://localhost:3000/app → localhost
/// - chrome://extensions → None
pub fn extract_host(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    let parsed = Url::parse(url).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }

    parsed
        .host_str()
        .filter(|host| !host.is_empty())
        .map(|host| host.to_lowercase())
}

/// URL opened when the user asks to visit a saved host
pub fn site_url(scheme: &str, host: &str) -> String {
    format!("{}://{}", scheme, host)
}

/// Normalize text typed into the site filter box
pub fn normalize_filter(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Case-insensitive substring match; an empty filter matches everything
pub fn host_matches(host: &str, filter: &str) -> bool {
    filter.is_empty() || host.to_lowercase().contains(&filter.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_host_basic() {
        assert_eq!(extract_host("https://www.google.com"), Some("www.google.com".to_string()));
        assert_eq!(extract_host("http://github.com/rust-lang/rust"), Some("github.com".to_string()));
        assert_eq!(extract_host("https://docs.rs/serde?search=x#top"), Some("docs.rs".to_string()));
    }

    #[test]
    fn test_extract_host_keeps_subdomains() {
        assert_eq!(extract_host("https://news.bbc.co.uk/article"), Some("news.bbc.co.uk".to_string()));
        assert_eq!(extract_host("https://mail.google.com"), Some("mail.google.com".to_string()));
    }

    #[test]
    fn test_extract_host_strips_port_and_case() {
        assert_eq!(extract_host("http://localhost:3000"), Some("localhost".to_string()));
        assert_eq!(extract_host("https://Example.COM/Path"), Some("example.com".to_string()));
        assert_eq!(extract_host("http://127.0.0.1:8080/"), Some("127.0.0.1".to_string()));
    }

    #[test]
    fn test_extract_host_rejects_non_web_pages() {
        assert_eq!(extract_host(""), None);
        assert_eq!(extract_host("not a url"), None);
        assert_eq!(extract_host("chrome://extensions"), None);
        assert_eq!(extract_host("about:blank"), None);
        assert_eq!(extract_host("file:///home/user/notes.txt"), None);
    }

    #[test]
    fn test_site_url() {
        assert_eq!(site_url("https", "example.com"), "https://example.com");
    }

    #[test]
    fn test_normalize_filter() {
        assert_eq!(normalize_filter("  GitHub "), "github");
        assert_eq!(normalize_filter(""), "");
    }

    #[test]
    fn test_host_matches() {
        assert!(host_matches("github.com", ""));
        assert!(host_matches("gist.github.com", "git"));
        assert!(host_matches("github.com", "GIT"));
        assert!(!host_matches("gitlab.com", "hub"));
    }
}
