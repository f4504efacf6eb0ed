/// Page state definitions for tracking crawl progress
///
/// A page moves `Pending -> Fetching -> {Succeeded, Failed}`; nothing else is legal.
use std::fmt;

/// Represents the current state of a page in one crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    /// Page has been selected and recorded as visited but not yet requested
    Pending,

    /// Page is currently being fetched and processed
    Fetching,

    /// Page was fetched, extracted, classified and persisted
    Succeeded,

    /// Page failed somewhere between fetch and persist; never retried
    Failed,
}

impl PageState {
    /// Checks whether `self -> next` is a legal transition
    pub fn can_transition_to(&self, next: PageState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Fetching)
                | (Self::Fetching, Self::Succeeded)
                | (Self::Fetching, Self::Failed)
        )
    }

    /// Performs a transition, returning the new state or None if it is not allowed
    pub fn transition(self, next: PageState) -> Option<PageState> {
        self.can_transition_to(next).then_some(next)
    }

    /// Lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
