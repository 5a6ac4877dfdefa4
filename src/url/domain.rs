use url::Url;

/// Extracts the lowercase host of a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use web_connector::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Builds the conventional `/favicon.ico` location for a page's origin
///
/// Returns an empty string when the URL has no host.
pub fn default_favicon(url: &Url) -> String {
    match url.host_str() {
        Some(host) => match url.port() {
            Some(port) => format!("{}://{}:{}/favicon.ico", url.scheme(), host, port),
            None => format!("{}://{}/favicon.ico", url.scheme(), host),
        },
        None => String::new(),
    }
}
