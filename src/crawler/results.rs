use crate::classify::PageType;
use crate::state::VisitedSet;
use crate::storage::PageRecord;
use std::collections::{BTreeMap, HashSet};

/// A page that was selected for fetching but did not produce a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedPage {
    pub url: String,
    pub depth: u32,
    pub error: String,
}

/// Everything one seed's crawl produced
#[derive(Debug, Clone)]
pub struct CrawlResultSet {
    pub seed: String,

    /// Records in the order their pages completed
    pub records: Vec<PageRecord>,

    /// Every URL selected for fetching, successful or not
    pub visited: VisitedSet,

    /// Failed pages in the order they failed
    pub failures: Vec<FailedPage>,

    /// Whether the crawl stopped early because it was cancelled
    pub cancelled: bool,
}

impl CrawlResultSet {
    pub fn new(seed: impl Into<String>, visited: VisitedSet) -> Self {
        Self {
            seed: seed.into(),
            records: Vec::new(),
            visited,
            failures: Vec::new(),
            cancelled: false,
        }
    }

    /// Number of URLs selected for fetching
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Number of distinct URLs selected for fetching
    pub fn unique_count(&self) -> usize {
        self.visited.urls().iter().collect::<HashSet<_>>().len()
    }

    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Record counts per page type, in page type order
    pub fn page_type_counts(&self) -> BTreeMap<PageType, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.page_type).or_insert(0) += 1;
        }
        counts
    }
}
