//! HTTP fetcher implementation
//!
//! This module handles all page requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - GET requests to fetch page content
//! - Redirect detection (targets go back through the frontier)
//! - Content-Type checking
//! - Error classification

use crate::config::CrawlerLimits;
use crate::state::PageState;
use crate::{ConnectorError, FetchError, ParseError};
use reqwest::{
    header::{CONTENT_TYPE, LOCATION},
    redirect::Policy,
    Client, StatusCode,
};
use std::time::Duration;
use url::Url;

/// A successfully fetched HTML page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL that was requested and answered
    pub url: Url,

    /// Decoded page body
    pub body: String,
}

/// Result of a single page request
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// The page answered 2xx with HTML
    Page(FetchedPage),

    /// The page answered 3xx; the target is resolved against the request URL
    Redirect { location: Url },
}

/// Builds the HTTP client used for page fetches
///
/// # Arguments
///
/// * `limits` - Crawler limits carrying the user agent and fetch timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```
/// use web_connector::config::CrawlerLimits;
/// use web_connector::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerLimits::default()).unwrap();
/// ```
pub fn build_http_client(limits: &CrawlerLimits) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(limits.user_agent.as_str())
        .timeout(limits.fetch_timeout)
        .connect_timeout(Duration::from_secs(10).min(limits.fetch_timeout))
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page and returns its decoded HTML or its redirect target
///
/// Redirects are not followed here. The caller offers the target to the
/// frontier, so a target that was already visited is not fetched twice.
///
/// # Error Classification
///
/// | Condition | Error |
/// |-----------|-------|
/// | 3xx with a missing or unusable `Location` | `FetchError::Status` |
/// | Other non-2xx status | `FetchError::Status` |
/// | Timeout | `FetchError::Timeout` |
/// | Connection refused, DNS, TLS | `FetchError::Unreachable` |
/// | Other transport errors | `FetchError::Network` |
/// | Content-Type present and not HTML | `ParseError::NotHtml` |
/// | Body cannot be read or decoded | `ParseError::Body` |
///
/// Nothing is retried.
pub async fn fetch_page(client: &Client, url: &Url) -> crate::Result<FetchOutcome> {
    let response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|e| classify_transport_error(url, e))?;

    let status = response.status();

    if status.is_redirection() {
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| url.join(v).ok())
            .filter(|target| matches!(target.scheme(), "http" | "https"));

        if let Some(location) = location {
            return Ok(FetchOutcome::Redirect { location });
        }
    }

    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        }
        .into());
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !is_html_content_type(&content_type) {
        return Err(ParseError::NotHtml {
            url: url.to_string(),
            content_type,
        }
        .into());
    }

    let body = response.text().await.map_err(|e| ParseError::Body {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    Ok(FetchOutcome::Page(FetchedPage {
        url: url.clone(),
        body,
    }))
}

/// Returns true for HTML media types, or when the server sent none
pub fn is_html_content_type(content_type: &str) -> bool {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    media_type.is_empty() || media_type == "text/html" || media_type == "application/xhtml+xml"
}

/// Maps a page failure onto the state recorded in the run report
pub fn failure_state(error: &ConnectorError) -> PageState {
    match error {
        ConnectorError::Fetch(FetchError::Status { status, .. })
            if *status == StatusCode::NOT_FOUND.as_u16()
                || *status == StatusCode::GONE.as_u16() =>
        {
            PageState::DeadLink
        }
        ConnectorError::Fetch(FetchError::Timeout { .. })
        | ConnectorError::Fetch(FetchError::Unreachable { .. }) => PageState::Unreachable,
        ConnectorError::Parse(_) => PageState::ContentMismatch,
        _ => PageState::Failed,
    }
}

fn classify_transport_error(url: &Url, error: reqwest::Error) -> ConnectorError {
    let url = url.to_string();

    let fetch_error = if error.is_timeout() {
        FetchError::Timeout { url }
    } else if error.is_connect() {
        FetchError::Unreachable {
            url,
            message: error.to_string(),
        }
    } else {
        FetchError::Network {
            url,
            message: error.to_string(),
        }
    };

    fetch_error.into()
}
