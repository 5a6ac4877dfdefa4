use crate::config::types::{
    CrawlConfig, CrawlerLimits, FlagValue, ListValue, RunConfigFile, TextOrNumber,
};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;
use std::time::Duration;

/// Loads, parses and validates a run configuration file
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(CrawlConfig)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use web_connector::config::load_config;
///
/// let config = load_config(Path::new("crawl.toml")).unwrap();
/// println!("Seeds: {:?}", config.start_urls);
/// ```
pub fn load_config(path: &Path) -> Result<CrawlConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates a run configuration from TOML text
pub fn parse_config(content: &str) -> Result<CrawlConfig, ConfigError> {
    let raw: RunConfigFile = toml::from_str(content)?;
    let config = build_config(raw)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at start-up so a run can be matched to the exact file it used.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(CrawlConfig, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Converts the loosely typed file representation into a `CrawlConfig`
fn build_config(raw: RunConfigFile) -> Result<CrawlConfig, ConfigError> {
    let timestamp = parse_integer("timestamp", &raw.timestamp)?;

    let datasource_id = match raw.datasource_id {
        TextOrNumber::Number(n) => n.to_string(),
        TextOrNumber::Text(s) => s.trim().to_string(),
    };

    let max_length = parse_integer("max-length", &raw.max_length)?;
    let max_content_length = usize::try_from(max_length).map_err(|_| ConfigError::InvalidValue {
        field: "max-length",
        message: format!("must not be negative, got {}", max_length),
    })?;

    let follow = match raw.follow {
        FlagValue::Bool(b) => b,
        FlagValue::Text(s) => str_to_bool("follow", &s)?,
    };

    let defaults = CrawlerLimits::default();
    let section = raw.crawler;
    let crawler = CrawlerLimits {
        max_pages: section.max_pages.unwrap_or(defaults.max_pages),
        max_depth: section.max_depth,
        max_concurrent_pages: section
            .max_concurrent_pages
            .unwrap_or(defaults.max_concurrent_pages),
        ingestion_timeout: section
            .ingestion_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(defaults.ingestion_timeout),
        fetch_timeout: section
            .fetch_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(defaults.fetch_timeout),
        user_agent: section.user_agent.unwrap_or(defaults.user_agent),
    };

    Ok(CrawlConfig {
        timestamp,
        datasource_id,
        ingestion_url: raw.ingestion_url.trim().to_string(),
        allowed_domains: optional_list("allowed-domains", raw.allowed_domains)?,
        start_urls: list_value("start-urls", raw.start_urls)?,
        allowed_paths: optional_list("allowed-paths", raw.allowed_paths)?,
        excluded_paths: optional_list("excluded-paths", raw.excluded_paths)?,
        follow,
        max_content_length,
        crawler,
    })
}

fn optional_list(
    field: &'static str,
    value: Option<ListValue>,
) -> Result<Vec<String>, ConfigError> {
    value
        .map(|v| list_value(field, v))
        .transpose()
        .map(Option::unwrap_or_default)
}

fn list_value(field: &'static str, value: ListValue) -> Result<Vec<String>, ConfigError> {
    match value {
        ListValue::List(items) => Ok(items),
        ListValue::Serialized(text) => parse_string_list(field, &text),
    }
}

fn parse_integer(field: &'static str, value: &TextOrNumber) -> Result<i64, ConfigError> {
    match value {
        TextOrNumber::Number(n) => Ok(*n),
        TextOrNumber::Text(s) => s.trim().parse::<i64>().map_err(|e| {
            ConfigError::InvalidValue {
                field,
                message: format!("'{}' is not an integer: {}", s, e),
            }
        }),
    }
}

/// Interprets a truthy/falsy token
///
/// Accepted (case-insensitive): `y`, `yes`, `t`, `true`, `on`, `1` and
/// `n`, `no`, `f`, `false`, `off`, `0`. Anything else is rejected.
///
/// # Examples
///
/// ```
/// use web_connector::config::str_to_bool;
///
/// assert!(str_to_bool("follow", "True").unwrap());
/// assert!(!str_to_bool("follow", "off").unwrap());
/// assert!(str_to_bool("follow", "maybe").is_err());
/// ```
pub fn str_to_bool(field: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "y" | "yes" | "t" | "true" | "on" | "1" => Ok(true),
        "n" | "no" | "f" | "false" | "off" | "0" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            field,
            message: format!("'{}' is not a boolean", other),
        }),
    }
}

/// Parses a list of strings serialized into a single string
///
/// JSON arrays (`["a", "b"]`) and single- or double-quoted literal lists
/// (`['a', 'b',]`, also with parentheses) are accepted. Backslash escapes other
/// than `\\`, `\'`, `\"`, `\n`, `\r` and `\t` are kept verbatim so regex
/// patterns such as `'\d+'` survive.
///
/// # Examples
///
/// ```
/// use web_connector::config::parse_string_list;
///
/// let urls = parse_string_list("start-urls", "['https://a.com', 'https://b.com']").unwrap();
/// assert_eq!(urls, vec!["https://a.com", "https://b.com"]);
/// ```
pub fn parse_string_list(field: &'static str, input: &str) -> Result<Vec<String>, ConfigError> {
    if let Ok(items) = serde_json::from_str::<Vec<String>>(input) {
        return Ok(items);
    }

    let invalid = |message: String| ConfigError::InvalidValue { field, message };

    let trimmed = input.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .or_else(|| trimmed.strip_prefix('(').and_then(|s| s.strip_suffix(')')))
        .ok_or_else(|| invalid(format!("expected a list, got '{}'", input)))?;

    let mut items = Vec::new();
    let mut chars = inner.chars().peekable();

    loop {
        skip_whitespace(&mut chars);

        let quote = match chars.next() {
            None => break,
            Some(q @ ('\'' | '"')) => q,
            Some(other) => {
                return Err(invalid(format!(
                    "expected a quoted string, found '{}'",
                    other
                )))
            }
        };

        let mut item = String::new();
        loop {
            match chars.next() {
                None => return Err(invalid("unterminated string".to_string())),
                Some('\\') => match chars.next() {
                    Some('n') => item.push('\n'),
                    Some('r') => item.push('\r'),
                    Some('t') => item.push('\t'),
                    Some(c @ ('\\' | '\'' | '"')) => item.push(c),
                    Some(c) => {
                        item.push('\\');
                        item.push(c);
                    }
                    None => return Err(invalid("unterminated string".to_string())),
                },
                Some(c) if c == quote => break,
                Some(c) => item.push(c),
            }
        }
        items.push(item);

        skip_whitespace(&mut chars);
        match chars.next() {
            None => break,
            Some(',') => continue,
            Some(other) => {
                return Err(invalid(format!(
                    "expected ',' between items, found '{}'",
                    other
                )))
            }
        }
    }

    Ok(items)
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
}
