use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Inner {
    seen: HashSet<String>,
    order: Vec<String>,
}

/// Append-only set of URLs selected for fetching during one crawl
///
/// Clones share the same underlying set. Insertion is a single check-and-insert under
/// the lock, so two callers can never both claim the same URL. Insertion order is kept
/// for reporting.
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    inner: Arc<Mutex<Inner>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Only ever mutated by whole inserts, so a poisoned lock still holds a valid set
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Claims `url` for fetching
    ///
    /// # Returns
    ///
    /// * `true` - The URL was new and is now marked visited
    /// * `false` - The URL had already been claimed
    pub fn try_insert(&self, url: &str) -> bool {
        let mut inner = self.lock();
        if inner.seen.contains(url) {
            return false;
        }
        inner.seen.insert(url.to_string());
        inner.order.push(url.to_string());
        true
    }

    pub fn contains(&self, url: &str) -> bool {
        self.lock().seen.contains(url)
    }

    pub fn len(&self) -> usize {
        self.lock().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of visited URLs in insertion order
    pub fn urls(&self) -> Vec<String> {
        self.lock().order.clone()
    }
}
