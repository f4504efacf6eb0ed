//! Sink trait and outcome types

use crate::storage::PageRecord;
use crate::PersistenceError;
use std::fmt;

/// What a sink did with a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The record was written; carries a description of where
    Written(String),

    /// The record was not written; carries the reason
    Skipped(String),
}

impl SaveOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written(_))
    }
}

impl fmt::Display for SaveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Written(location) => write!(f, "written to {}", location),
            Self::Skipped(reason) => write!(f, "skipped: {}", reason),
        }
    }
}

/// Trait for persistence backends
///
/// A sink receives each record once, right after the page is classified. Saving the
/// same URL twice must replace, not duplicate, the stored page. Implementations are
/// shared between concurrently running seed crawls and guard their own state.
pub trait PageSink: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    /// Persists one record
    ///
    /// # Returns
    ///
    /// * `Ok(SaveOutcome)` - Written, or skipped by the sink's own policy
    /// * `Err(PersistenceError)` - The write failed; the page counts as failed
    fn save(&self, record: &PageRecord) -> Result<SaveOutcome, PersistenceError>;

    /// Removes what an earlier `save` wrote for `url`
    ///
    /// Called when a later sink fails on the same page, so a failed page leaves
    /// nothing behind. Discarding a URL the sink never wrote is not an error.
    fn discard(&self, url: &str) -> Result<(), PersistenceError>;
}
