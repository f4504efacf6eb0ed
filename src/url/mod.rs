//! URL handling module for Gleaner
//!
//! This module decides which discovered hrefs are crawlable, resolves them to absolute
//! URLs, and keeps each crawl inside its seed's site.

mod filter;
mod scope;

pub use filter::{filter_link, LinkCandidate, LinkVerdict, RejectReason};
pub use scope::{contained_in_page_url, host_in_scope, DomainScope, HostPattern};
