//! Output module for post-processing and reporting crawl results
//!
//! This module handles:
//! - Dropping empty and error pages from finished crawls
//! - Summarizing crawl results on the console
//! - Writing markdown summaries

mod markdown;
mod post_process;
pub mod stats;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use post_process::{is_empty_page, looks_like_error_page, post_process};
pub use stats::{print_page_type_counts, print_summary, CrawlSummary, SeedSummary};
