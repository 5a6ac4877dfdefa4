use crate::config::types::{CrawlConfig, CrawlerLimits};
use crate::ConfigError;
use regex::Regex;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &CrawlConfig) -> Result<(), ConfigError> {
    validate_run_fields(config)?;
    validate_ingestion_url(&config.ingestion_url)?;
    validate_start_urls(&config.start_urls)?;
    validate_allowed_domains(&config.allowed_domains)?;
    validate_patterns("allowed path", &config.allowed_paths)?;
    validate_patterns("excluded path", &config.excluded_paths)?;
    validate_crawler_limits(&config.crawler)?;
    Ok(())
}

fn validate_run_fields(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.timestamp < 0 {
        return Err(ConfigError::Validation(format!(
            "timestamp must be >= 0, got {}",
            config.timestamp
        )));
    }

    if config.datasource_id.is_empty() {
        return Err(ConfigError::Validation(
            "datasource_id cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_ingestion_url(ingestion_url: &str) -> Result<(), ConfigError> {
    let url = Url::parse(ingestion_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid ingestion_url '{}': {}", ingestion_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "ingestion_url '{}' must use HTTP or HTTPS",
            ingestion_url
        )));
    }

    Ok(())
}

fn validate_start_urls(start_urls: &[String]) -> Result<(), ConfigError> {
    if start_urls.is_empty() {
        return Err(ConfigError::Validation(
            "at least one start URL is required".to_string(),
        ));
    }

    for seed in start_urls {
        let url = Url::parse(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start URL '{}': {}", seed, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Start URL '{}' must use HTTP or HTTPS",
                seed
            )));
        }

        if url.host_str().is_none() {
            return Err(ConfigError::InvalidUrl(format!(
                "Start URL '{}' has no host",
                seed
            )));
        }
    }

    Ok(())
}

fn validate_allowed_domains(domains: &[String]) -> Result<(), ConfigError> {
    for domain in domains {
        validate_domain_pattern(domain)?;
    }
    Ok(())
}

/// Checks that every pattern compiles as a regex
fn validate_patterns(kind: &str, patterns: &[String]) -> Result<(), ConfigError> {
    for pattern in patterns {
        Regex::new(pattern).map_err(|e| {
            ConfigError::InvalidPattern(format!("Invalid {} '{}': {}", kind, pattern, e))
        })?;
    }
    Ok(())
}

fn validate_crawler_limits(limits: &CrawlerLimits) -> Result<(), ConfigError> {
    if limits.max_concurrent_pages < 1 || limits.max_concurrent_pages > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_pages must be between 1 and 100, got {}",
            limits.max_concurrent_pages
        )));
    }

    if limits.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            limits.max_pages
        )));
    }

    if limits.ingestion_timeout.is_zero() {
        return Err(ConfigError::Validation(
            "ingestion_timeout must be at least one second".to_string(),
        ));
    }

    if limits.fetch_timeout.is_zero() {
        return Err(ConfigError::Validation(
            "fetch_timeout must be at least one second".to_string(),
        ));
    }

    if limits.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates a domain pattern (supports a leading "*." wildcard)
fn validate_domain_pattern(pattern: &str) -> Result<(), ConfigError> {
    if pattern.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain pattern cannot be empty".to_string(),
        ));
    }

    match pattern.strip_prefix("*.") {
        Some(domain) => validate_domain_string(domain),
        None => validate_domain_string(pattern),
    }
}

/// Validates a domain string (without wildcard prefix)
fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> CrawlConfig {
        CrawlConfig {
            timestamp: 0,
            datasource_id: "1".to_string(),
            ingestion_url: "http://ingestion.local/".to_string(),
            allowed_domains: vec!["example.com".to_string()],
            start_urls: vec!["https://example.com/".to_string()],
            allowed_paths: vec![".*".to_string()],
            excluded_paths: vec![],
            follow: true,
            max_content_length: 100,
            crawler: CrawlerLimits::default(),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&create_test_config()).is_ok());
    }

    #[test]
    fn test_validate_domain_pattern() {
        assert!(validate_domain_pattern("example.com").is_ok());
        assert!(validate_domain_pattern("*.example.com").is_ok());
        assert!(validate_domain_pattern("localhost").is_ok());
        assert!(validate_domain_pattern("127.0.0.1").is_ok());

        assert!(validate_domain_pattern("").is_err());
        assert!(validate_domain_pattern("*.").is_err());
        assert!(validate_domain_pattern(".example.com").is_err());
        assert!(validate_domain_pattern("example.com.").is_err());
        assert!(validate_domain_pattern("exa mple.com").is_err());
        assert!(validate_domain_pattern("example..com").is_err());
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let mut config = create_test_config();
        config.excluded_paths = vec!["/broken/(".to_string()];
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_missing_start_urls_rejected() {
        let mut config = create_test_config();
        config.start_urls.clear();
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_non_http_seed_rejected() {
        let mut config = create_test_config();
        config.start_urls = vec!["ftp://example.com/".to_string()];
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_invalid_ingestion_url_rejected() {
        let mut config = create_test_config();
        config.ingestion_url = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_crawler_limits_rejected() {
        let mut config = create_test_config();
        config.crawler.max_concurrent_pages = 0;
        assert!(validate(&config).is_err());

        let mut config = create_test_config();
        config.crawler.max_pages = 0;
        assert!(validate(&config).is_err());

        let mut config = create_test_config();
        config.crawler.ingestion_timeout = std::time::Duration::ZERO;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_max_length_accepted() {
        let mut config = create_test_config();
        config.max_content_length = 0;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_datasource_rejected() {
        let mut config = create_test_config();
        config.datasource_id = String::new();
        assert!(validate(&config).is_err());
    }
}
