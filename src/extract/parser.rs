//! HTML parser for extracting text, links and metadata
//!
//! This module handles parsing HTML content to extract:
//! - Page title
//! - Paragraph text, in document order
//! - Links to follow (from <a> tags)
//! - Favicon location

use crate::url::default_favicon;
use crate::FollowError;
use scraper::{Html, Selector};
use url::Url;

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// The page title (from <title> tag), trimmed
    pub title: Option<String>,

    /// Text of every <p> element concatenated without separator
    pub text: String,

    /// All followable links found on the page (absolute URLs)
    pub links: Vec<String>,

    /// Best-effort favicon URL (empty if none can be derived)
    pub favicon: String,
}

/// Parses HTML content and extracts text, links and metadata
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags anywhere in the document
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links and data URIs
/// - Fragment-only links
/// - hrefs that cannot be resolved against the page URL (logged)
///
/// # Example
///
/// ```
/// use web_connector::extract::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><p>Hi</p><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.text, "Hi");
/// assert_eq!(parsed.links, vec!["https://example.com/page"]);
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        text: extract_paragraph_text(&document),
        links: extract_links(&document, base_url),
        favicon: extract_favicon(&document, base_url),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
}

/// Concatenates the text of all paragraphs
fn extract_paragraph_text(document: &Html) -> String {
    let Ok(p_selector) = Selector::parse("p") else {
        return String::new();
    };

    document
        .select(&p_selector)
        .flat_map(|element| element.text())
        .collect()
}

/// Extracts all valid links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                match resolve_link(href, base_url) {
                    Ok(Some(absolute_url)) => links.push(absolute_url),
                    Ok(None) => {}
                    Err(e) => tracing::info!("Filtered url {}: {}", href, e),
                }
            }
        }
    }

    links
}

/// Finds the declared icon, falling back to `/favicon.ico` on the page origin
fn extract_favicon(document: &Html, base_url: &Url) -> String {
    let Ok(link_selector) = Selector::parse("link[rel][href]") else {
        return default_favicon(base_url);
    };

    let mut touch_icon = None;

    for element in document.select(&link_selector) {
        let (Some(rel), Some(href)) = (element.value().attr("rel"), element.value().attr("href"))
        else {
            continue;
        };
        let rel = rel.to_lowercase();

        if rel.split_whitespace().any(|t| t == "icon") {
            if let Ok(icon) = base_url.join(href.trim()) {
                return icon.to_string();
            }
        } else if touch_icon.is_none() && rel.split_whitespace().any(|t| t == "apple-touch-icon") {
            touch_icon = base_url.join(href.trim()).ok();
        }
    }

    touch_icon
        .map(|icon| icon.to_string())
        .unwrap_or_else(|| default_favicon(base_url))
}

/// Resolves a link href to an absolute URL
///
/// Returns `Ok(None)` for links that are skipped silently:
/// - javascript:, mailto:, tel: schemes and data: URIs
/// - fragment-only and empty hrefs
///
/// Returns a `FollowError` for hrefs that cannot be resolved or that resolve
/// to a non-HTTP(S) URL.
pub fn resolve_link(href: &str, base_url: &Url) -> Result<Option<String>, FollowError> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return Ok(None);
    }

    let lowered = href.to_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return Ok(None);
    }

    let absolute_url = base_url.join(href).map_err(|e| FollowError::Malformed {
        href: href.to_string(),
        message: e.to_string(),
    })?;

    if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
        Ok(Some(absolute_url.to_string()))
    } else {
        Err(FollowError::UnsupportedScheme {
            href: href.to_string(),
        })
    }
}
