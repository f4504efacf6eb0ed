//! Crawler coordinator - main crawl orchestration logic
//!
//! One `crawl` call walks a single seed's site depth-first, left to right over each
//! page's links. Traversal state lives in an explicit stack of frames, one per expanded
//! page, holding the links still to consider and how many have been dispatched.
//!
//! A link is fetched only when all of these hold:
//! - its parent's depth is below `max_depth`
//! - the link filter accepts it
//! - it is inside the seed's domain scope
//! - it has not been visited in this crawl
//! - its parent has not used up its fan-out quota
//!
//! Fetch, parse, extract, classify and persist run as one unit per page. Any failure in
//! that unit marks the page failed, removes anything already persisted for it, and the
//! crawl carries on with the next sibling.

use crate::classify::classify;
use crate::config::{CrawlerConfig, SeedEntry};
use crate::crawler::fetcher::{FetchResponse, Transport};
use crate::crawler::parser::{ensure_html, extract, parse_document, ExtractedPage};
use crate::crawler::results::{CrawlResultSet, FailedPage};
use crate::state::{PageState, VisitedSet};
use crate::storage::{PageRecord, PageSink, SaveOutcome};
use crate::url::{filter_link, DomainScope, LinkCandidate, LinkVerdict};
use crate::{PageError, ParseError, PersistenceError, TransportError};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Traversal limits for one crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSettings {
    /// Pages deeper than this are never fetched; pages at this depth are not expanded
    pub max_depth: u32,

    /// Fetches dispatched per parent page; None means unbounded
    pub max_links_per_page: Option<usize>,

    pub fetch_timeout: Duration,

    /// Log a progress line every this many fetches
    pub progress_interval: usize,
}

impl CrawlSettings {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            max_links_per_page: config.max_links_per_page,
            fetch_timeout: Duration::from_secs(config.fetch_timeout_secs),
            progress_interval: config.progress_interval.max(1),
        }
    }
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            max_depth: 2,
            max_links_per_page: None,
            fetch_timeout: Duration::from_secs(30),
            progress_interval: 10,
        }
    }
}

/// One expanded page whose links are still being walked
struct Frame {
    page_url: String,
    depth: u32,
    links: std::vec::IntoIter<LinkCandidate>,
    dispatched: usize,
}

impl Frame {
    fn new(page_url: &str, depth: u32, links: Vec<LinkCandidate>) -> Self {
        Self {
            page_url: page_url.to_string(),
            depth,
            links: links.into_iter(),
            dispatched: 0,
        }
    }
}

/// Per-crawl mutable state threaded through page visits
struct CrawlContext {
    results: CrawlResultSet,
    fetches: usize,
}

/// Main crawler coordinator structure
///
/// Cheap to clone; clones share the transport, sinks and cancellation token.
#[derive(Clone)]
pub struct Coordinator {
    transport: Arc<dyn Transport>,
    sinks: Vec<Arc<dyn PageSink>>,
    settings: CrawlSettings,
    cancel: CancellationToken,
}

impl Coordinator {
    /// Creates a coordinator with no sinks and a fresh cancellation token
    pub fn new(transport: Arc<dyn Transport>, settings: CrawlSettings) -> Self {
        Self {
            transport,
            sinks: Vec::new(),
            settings,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_sinks(mut self, sinks: Vec<Arc<dyn PageSink>>) -> Self {
        self.sinks = sinks;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that stops every crawl driven by this coordinator
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Crawls one seed to completion or cancellation
    ///
    /// # Arguments
    ///
    /// * `seed` - The seed URL and its optional scope patterns
    ///
    /// # Returns
    ///
    /// The records, visited set and failures of this crawl. Page-level failures are
    /// recorded in the result, never returned as errors.
    pub async fn crawl(&self, seed: &SeedEntry) -> CrawlResultSet {
        let visited = VisitedSet::new();
        let mut ctx = CrawlContext {
            results: CrawlResultSet::new(&seed.url, visited.clone()),
            fetches: 0,
        };
        let scope = DomainScope::for_seed(&seed.url, &seed.scope);
        let max_depth = self.settings.max_depth;

        tracing::info!(
            "Starting crawl of {} (max depth {}, max links per page {})",
            seed.url,
            max_depth,
            self.settings
                .max_links_per_page
                .map_or_else(|| "unbounded".to_string(), |n| n.to_string())
        );

        if self.cancel.is_cancelled() {
            ctx.results.cancelled = true;
            return ctx.results;
        }

        let mut stack = Vec::new();
        visited.try_insert(&seed.url);
        if let Some(links) = self.visit(&seed.url, 0, &mut ctx).await {
            if max_depth > 0 {
                stack.push(Frame::new(&seed.url, 0, links));
            }
        }

        while let Some(frame) = stack.last_mut() {
            if self
                .settings
                .max_links_per_page
                .is_some_and(|cap| frame.dispatched >= cap)
            {
                tracing::debug!("Fan-out limit reached for {}", frame.page_url);
                stack.pop();
                continue;
            }

            let Some(candidate) = frame.links.next() else {
                stack.pop();
                continue;
            };

            let target = match filter_link(&frame.page_url, &candidate) {
                LinkVerdict::Accept(url) => url,
                LinkVerdict::Reject { href, reason } => {
                    tracing::debug!("Rejected link {} on {}: {:?}", href, frame.page_url, reason);
                    continue;
                }
            };

            if !scope.allows(&target, &frame.page_url) {
                tracing::debug!("Out of scope: {} (from {})", target, frame.page_url);
                continue;
            }

            if self.cancel.is_cancelled() {
                tracing::info!("Crawl of {} cancelled", seed.url);
                ctx.results.cancelled = true;
                break;
            }

            if !visited.try_insert(&target) {
                continue;
            }

            frame.dispatched += 1;
            let child_depth = frame.depth + 1;

            if let Some(links) = self.visit(&target, child_depth, &mut ctx).await {
                if child_depth < max_depth {
                    stack.push(Frame::new(&target, child_depth, links));
                }
            }
        }

        tracing::info!(
            "Finished crawl of {}: {} visited, {} records, {} failed",
            seed.url,
            ctx.results.visited_count(),
            ctx.results.record_count(),
            ctx.results.failed_count()
        );

        ctx.results
    }

    /// Fetches and processes one already-claimed URL
    ///
    /// Returns the page's links on success, None on failure.
    async fn visit(&self, url: &str, depth: u32, ctx: &mut CrawlContext) -> Option<Vec<LinkCandidate>> {
        let state = advance(url, PageState::Pending, PageState::Fetching);

        let outcome = match self.process_page(url).await {
            Ok((record, links)) => {
                advance(url, state, PageState::Succeeded);
                ctx.results.records.push(record);
                Some(links)
            }
            Err(e) => {
                advance(url, state, PageState::Failed);
                tracing::warn!("Failed to crawl {} at depth {}: {}", url, depth, e);
                ctx.results.failures.push(FailedPage {
                    url: url.to_string(),
                    depth,
                    error: e.to_string(),
                });
                None
            }
        };

        ctx.fetches += 1;
        if ctx.fetches % self.settings.progress_interval.max(1) == 0 {
            tracing::info!(
                "Progress for {}: {} visited, {} failed",
                ctx.results.seed,
                ctx.results.visited_count(),
                ctx.results.failed_count()
            );
        }

        outcome
    }

    /// Runs fetch, parse, extract, classify and persist for one page
    async fn process_page(&self, url: &str) -> Result<(PageRecord, Vec<LinkCandidate>), PageError> {
        let timeout = self.settings.fetch_timeout;
        let response = tokio::time::timeout(timeout, self.transport.fetch(url, timeout))
            .await
            .map_err(|_| TransportError::Timeout {
                url: url.to_string(),
            })??;

        if !response.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: response.status,
            }
            .into());
        }

        let mut page = extract_page(url, &response)?;
        if let Some(warning) = sparse_content_warning(url, &page) {
            tracing::warn!("{}", warning);
        }

        let links = std::mem::take(&mut page.links);
        let classification = classify(url, &page.title, &page.headings, &page.paragraphs);
        let record = PageRecord::new(url, page, classification);

        self.persist(&record)?;

        Ok((record, links))
    }

    /// Saves a record to every sink, all or nothing
    ///
    /// When a sink fails, whatever the earlier sinks wrote for this URL is discarded
    /// before the error is returned.
    fn persist(&self, record: &PageRecord) -> Result<(), PersistenceError> {
        let mut written: Vec<&Arc<dyn PageSink>> = Vec::new();

        for sink in &self.sinks {
            match sink.save(record) {
                Ok(SaveOutcome::Written(location)) => {
                    tracing::debug!("Sink {} wrote {} to {}", sink.name(), record.url, location);
                    written.push(sink);
                }
                Ok(SaveOutcome::Skipped(reason)) => {
                    tracing::warn!("Sink {} skipped {}: {}", sink.name(), record.url, reason);
                }
                Err(e) => {
                    for done in written.iter().rev() {
                        if let Err(discard_error) = done.discard(&record.url) {
                            tracing::warn!(
                                "Sink {} could not discard {}: {}",
                                done.name(),
                                record.url,
                                discard_error
                            );
                        }
                    }
                    return Err(e);
                }
            }
        }

        Ok(())
    }
}

/// Describes a page that has no headings or no paragraphs
fn sparse_content_warning(url: &str, page: &ExtractedPage) -> Option<String> {
    (page.headings.is_empty() || page.paragraphs.is_empty()).then(|| {
        format!(
            "{} has {} headings and {} paragraphs",
            url,
            page.headings.len(),
            page.paragraphs.len()
        )
    })
}

/// Parses and extracts a response body
///
/// Kept synchronous so the parsed document never lives across an await point.
fn extract_page(url: &str, response: &FetchResponse) -> Result<ExtractedPage, ParseError> {
    ensure_html(url, response.content_type.as_deref())?;
    let document = parse_document(url, &response.body)?;
    Ok(extract(&document))
}

fn advance(url: &str, from: PageState, to: PageState) -> PageState {
    let next = from.transition(to);
    debug_assert!(next.is_some(), "{} -> {}", from, to);
    tracing::trace!("{}: {} -> {}", url, from, to);
    next.unwrap_or(to)
}
