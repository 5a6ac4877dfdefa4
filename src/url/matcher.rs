/// Checks if a host belongs to an allowed domain
///
/// A plain domain accepts itself and every subdomain below it, the way
/// allowed-domain lists are conventionally read by crawlers. A leading `*.`
/// is accepted as an explicit spelling of the same rule.
///
/// Both arguments are expected in lowercase.
///
/// # Examples
///
/// ```
/// use web_connector::url::matches_domain;
///
/// assert!(matches_domain("example.com", "example.com"));
/// assert!(matches_domain("example.com", "blog.example.com"));
/// assert!(matches_domain("*.example.com", "api.v2.example.com"));
/// assert!(!matches_domain("example.com", "myexample.com"));
/// ```
pub fn matches_domain(pattern: &str, host: &str) -> bool {
    let base = pattern.strip_prefix("*.").unwrap_or(pattern);
    if base.is_empty() || host.is_empty() {
        return false;
    }

    host == base
        || host
            .strip_suffix(base)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(matches_domain("example.com", "example.com"));
        assert!(matches_domain("blog.example.com", "blog.example.com"));
    }

    #[test]
    fn test_subdomains_match() {
        assert!(matches_domain("example.com", "blog.example.com"));
        assert!(matches_domain("example.com", "deep.nested.sub.example.com"));
        assert!(matches_domain("*.example.com", "example.com"));
        assert!(matches_domain("*.example.com", "www.example.com"));
    }

    #[test]
    fn test_parent_does_not_match() {
        assert!(!matches_domain("blog.example.com", "example.com"));
        assert!(!matches_domain("blog.example.com", "www.example.com"));
    }

    #[test]
    fn test_partial_names_do_not_match() {
        assert!(!matches_domain("example.com", "myexample.com"));
        assert!(!matches_domain("example.com", "example.com.org"));
        assert!(!matches_domain("example.com", "example.org"));
    }

    #[test]
    fn test_empty_strings() {
        assert!(!matches_domain("example.com", ""));
        assert!(!matches_domain("", "example.com"));
        assert!(!matches_domain("*.", "example.com"));
    }

    #[test]
    fn test_ip_hosts() {
        assert!(matches_domain("127.0.0.1", "127.0.0.1"));
        assert!(!matches_domain("127.0.0.1", "127.0.0.2"));
    }
}
