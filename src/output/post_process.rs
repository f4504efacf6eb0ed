//! Post-crawl cleanup of result sets

use crate::crawler::CrawlResultSet;
use crate::storage::PageRecord;

/// Paragraphs at or below this many characters do not count as content
const MIN_CONTENT_PARAGRAPH_CHARS: usize = 50;

/// A page with no headings and no substantial paragraph
pub fn is_empty_page(record: &PageRecord) -> bool {
    record.headings.is_empty()
        && !record
            .paragraphs
            .iter()
            .any(|p| p.trim().chars().count() > MIN_CONTENT_PARAGRAPH_CHARS)
}

/// A page that mentions "404" anywhere in its title, headings or paragraphs
///
/// Sites often serve their not-found page with a 200 status, so this catches error
/// pages the transport could not. It also drops legitimate pages that mention 404.
pub fn looks_like_error_page(record: &PageRecord) -> bool {
    let mentions_404 = |text: &str| text.to_lowercase().contains("404");

    mentions_404(&record.title)
        || record.headings.iter().any(|h| mentions_404(h))
        || record.paragraphs.iter().any(|p| mentions_404(p))
}

/// Drops empty and error pages from a crawl's records
///
/// Surviving records keep their order. The visited set and failures pass through
/// untouched, so a dropped page still counts as visited.
pub fn post_process(results: CrawlResultSet) -> CrawlResultSet {
    let before = results.records.len();
    let CrawlResultSet {
        seed,
        records,
        visited,
        failures,
        cancelled,
    } = results;

    let records: Vec<PageRecord> = records
        .into_iter()
        .filter(|record| {
            if is_empty_page(record) {
                tracing::debug!("Dropping empty page {}", record.url);
                false
            } else if looks_like_error_page(record) {
                tracing::debug!("Dropping error page {}", record.url);
                false
            } else {
                true
            }
        })
        .collect();

    tracing::info!(
        "Post-processing {} kept {} of {} records",
        seed,
        records.len(),
        before
    );

    CrawlResultSet {
        seed,
        records,
        visited,
        failures,
        cancelled,
    }
}
