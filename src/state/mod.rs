//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: Lifecycle of a single page (pending, fetching, succeeded, failed)
//! - `VisitedSet`: Shared record of every URL selected for fetching in one crawl

mod page_state;
mod visited;

// Re-export main types
pub use page_state::PageState;
pub use visited::VisitedSet;
