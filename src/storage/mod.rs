//! Storage module for persisting page records
//!
//! This module handles everything written to durable storage, including:
//! - The `PageRecord` produced for every successfully crawled page
//! - The `PageSink` interface and the content-richness gate shared by all sinks
//! - A text-file sink (one file per page) and a SQLite sink (one row per URL)
//! - Run bookkeeping in the SQLite database

mod schema;
mod sqlite;
mod text_file;
mod traits;

pub use schema::{initialize_schema, SCHEMA_VERSION};
pub use sqlite::{RunSummaryRow, SqliteSink};
pub use text_file::{filename_for_url, render_page, TextFileSink};
pub use traits::{PageSink, SaveOutcome};

use crate::classify::{Classification, PageType};
use crate::config::OutputConfig;
use crate::crawler::ExtractedPage;
use crate::GleanerError;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

/// Paragraphs shorter than this are ignored by the richness gate
const MIN_PARAGRAPH_CHARS: usize = 20;

/// Pages whose retained paragraph text is shorter than this are not written
const MIN_CONTENT_CHARS: usize = 350;

/// Structured content of one successfully crawled page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub url: String,
    pub title: String,
    pub headings: Vec<String>,
    pub paragraphs: Vec<String>,
    pub page_type: PageType,
    pub keywords: BTreeSet<String>,
    pub section_title: String,
    pub scraped_at: DateTime<Utc>,
}

impl PageRecord {
    /// Assembles a record from extracted content and its classification
    pub fn new(url: impl Into<String>, page: ExtractedPage, classification: Classification) -> Self {
        Self {
            url: url.into(),
            title: page.title,
            headings: page.headings,
            paragraphs: page.paragraphs,
            page_type: classification.page_type,
            keywords: classification.keywords,
            section_title: classification.section_title,
            scraped_at: Utc::now(),
        }
    }
}

/// Paragraphs that count towards the content-richness gate
///
/// Drops cookie banners, navigation crumbs (anything containing `|`) and short
/// fragments.
pub fn rich_paragraphs(paragraphs: &[String]) -> impl Iterator<Item = &String> {
    paragraphs.iter().filter(|p| {
        !p.to_lowercase().contains("cookies")
            && !p.contains('|')
            && p.chars().count() >= MIN_PARAGRAPH_CHARS
    })
}

/// Checks whether a record carries enough prose to be worth writing
///
/// # Returns
///
/// * `None` - The record passes
/// * `Some(reason)` - Why the record should be skipped
pub fn richness_gate(record: &PageRecord) -> Option<String> {
    let total: usize = rich_paragraphs(&record.paragraphs)
        .map(|p| p.chars().count())
        .sum();

    (total < MIN_CONTENT_CHARS).then(|| {
        format!(
            "only {} characters of content (minimum {})",
            total, MIN_CONTENT_CHARS
        )
    })
}

/// Opens every sink enabled in the output configuration
///
/// # Returns
///
/// * `Ok(Vec)` - The enabled sinks, possibly empty
/// * `Err(GleanerError)` - A sink could not be opened (unwritable directory, bad database)
pub fn open_sinks(config: &OutputConfig) -> Result<Vec<Arc<dyn PageSink>>, GleanerError> {
    let mut sinks: Vec<Arc<dyn PageSink>> = Vec::new();

    if let Some(dir) = &config.pages_dir {
        sinks.push(Arc::new(TextFileSink::new(Path::new(dir))?));
    }

    if let Some(path) = &config.database_path {
        sinks.push(Arc::new(SqliteSink::new(Path::new(path))?));
    }

    Ok(sinks)
}
