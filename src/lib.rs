//! Gleaner: a depth-bounded content crawler
//!
//! This crate walks a site from one or more seed pages, following hyperlinks within a
//! configurable depth and per-page fan-out. Every fetched page is reduced to a structured
//! record (title, headings, paragraphs), tagged with a page type and keywords, and handed
//! to pluggable persistence sinks keyed by URL.

pub mod classify;
pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Gleaner operations
#[derive(Debug, Error)]
pub enum GleanerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Crawl task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),
}

/// Failures while fetching the bytes of a page
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP error for {url}: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },
}

/// Failures while turning fetched bytes into a document
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Body of {url} is not valid UTF-8")]
    InvalidEncoding { url: String },

    #[error("Expected HTML from {url}, got {content_type}")]
    NotHtml { url: String, content_type: String },
}

/// Failures while writing a record to a sink
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Any failure confined to a single page
///
/// The coordinator downgrades these to a warning and a failed page state; they never
/// abort a crawl.
#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Result type alias for Gleaner operations
pub type Result<T> = std::result::Result<T, GleanerError>;

// Re-export commonly used types
pub use classify::{classify, Classification, PageType};
pub use config::Config;
pub use crawler::{crawl_seeds, Coordinator, CrawlResultSet};
pub use output::post_process;
pub use state::{PageState, VisitedSet};
pub use storage::PageRecord;
pub use crate::url::{filter_link, LinkCandidate, LinkVerdict};
