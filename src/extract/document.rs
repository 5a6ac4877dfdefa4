use crate::extract::parser::{parse_html, ParsedPage};
use crate::extract::text::{normalize_text, truncate_chars};
use serde::{Deserialize, Serialize};
use url::Url;

/// Title used when a page has no <title> element
pub const UNKNOWN_TITLE: &str = "Unknown title";

/// Normalized document produced from one fetched page
///
/// `content` never holds more than the run's maximum content length in
/// characters, and contains no tab, newline or carriage-return characters and
/// no runs of spaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// URL the page was served from
    pub url: String,

    /// Page title, or `"Unknown title"`
    pub title: String,

    /// Normalized, truncated paragraph text
    pub content: String,

    /// Best-effort favicon URL, possibly empty
    pub favicon: String,
}

impl ExtractedDocument {
    /// Builds a document from an already parsed page
    pub fn from_parsed(url: &Url, parsed: &ParsedPage, max_content_length: usize) -> Self {
        let content = truncate_chars(&normalize_text(&parsed.text), max_content_length);

        Self {
            url: url.to_string(),
            title: parsed
                .title
                .clone()
                .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            content,
            favicon: parsed.favicon.clone(),
        }
    }
}

/// Extracts the document of an HTML page
///
/// # Example
///
/// ```
/// use web_connector::extract::extract;
/// use url::Url;
///
/// let url = Url::parse("https://example.com/").unwrap();
/// let doc = extract("<p>Hello\n   world</p>", &url, 5);
/// assert_eq!(doc.title, "Unknown title");
/// assert_eq!(doc.content, "Hello");
/// ```
pub fn extract(html: &str, url: &Url, max_content_length: usize) -> ExtractedDocument {
    let parsed = parse_html(html, url);
    ExtractedDocument::from_parsed(url, &parsed, max_content_length)
}
