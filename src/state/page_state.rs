/// Page state definitions for reporting crawl progress
///
/// Every page a worker visits ends in exactly one of these states.
use std::fmt;

/// Final state of a visited page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageState {
    // ===== Success States =====
    /// Page was extracted and its record accepted by the ingestion endpoint
    Ingested,

    /// Page matched an excluded path: traversed but not ingested
    Excluded,

    /// Page answered with a redirect; the target was offered to the frontier
    Redirected,

    // ===== Fetch Error States =====
    /// Page returned HTTP 404 or 410
    DeadLink,

    /// Page could not be reached (connection refused, DNS failure, timeout)
    Unreachable,

    /// Page fetch failed for other reasons (HTTP error status, worker panic)
    Failed,

    // ===== Parse Error States =====
    /// Page Content-Type is not HTML, or the body could not be read
    ContentMismatch,

    // ===== Delivery Error States =====
    /// Page was extracted but the ingestion endpoint rejected the record
    DispatchFailed,
}

impl PageState {
    /// Returns true if the page was handled as intended
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Ingested | Self::Excluded | Self::Redirected)
    }

    /// Returns true if this represents an error state
    pub fn is_error(&self) -> bool {
        !self.is_success()
    }

    /// Returns true if outbound links of a page in this state may be followed
    ///
    /// Only pages whose HTML was read have links. Delivery failures do not
    /// affect traversal.
    pub fn has_links(&self) -> bool {
        matches!(self, Self::Ingested | Self::Excluded | Self::DispatchFailed)
    }

    /// Short label used in logs and the run report
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ingested => "ingested",
            Self::Excluded => "excluded",
            Self::Redirected => "redirected",
            Self::DeadLink => "dead_link",
            Self::Unreachable => "unreachable",
            Self::Failed => "failed",
            Self::ContentMismatch => "content_mismatch",
            Self::DispatchFailed => "dispatch_failed",
        }
    }

    /// Returns all possible page states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Ingested,
            Self::Excluded,
            Self::Redirected,
            Self::DeadLink,
            Self::Unreachable,
            Self::Failed,
            Self::ContentMismatch,
            Self::DispatchFailed,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
