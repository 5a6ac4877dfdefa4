//! State module for tracking crawl progress
//!
//! `PageState` is the outcome of a single page visit, as tallied in the run
//! report.

mod page_state;

pub use page_state::PageState;
