/// Page state definitions for tracking one result page through the pipeline
///
/// Each requested page walks a small state machine from `Pending` to one of
/// four terminal states. Three of those are failures and each produces one
/// page-level error entry.
use crate::ScoutError;
use std::fmt;

/// Represents the current state of a result page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// Page has not been requested yet
    Pending,

    /// Page body was fetched successfully
    Fetched,

    /// No card containers were found; one forced reload follows
    ContainersMissing,

    /// At least one card container was found
    ContainersFound,

    // ===== Terminal Success States =====
    /// At least one valid company record was extracted
    RecordsExtracted,

    // ===== Terminal Error States =====
    /// Every fetch attempt failed
    FetchFailed,

    /// Still no card containers after the forced reload
    ContainersMissingFinal,

    /// Containers were found but no card had a usable name
    NoRecords,
}

impl PageState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::RecordsExtracted | Self::FetchFailed | Self::ContainersMissingFinal | Self::NoRecords
        )
    }

    /// Returns true if the page contributed records
    pub fn is_success(&self) -> bool {
        matches!(self, Self::RecordsExtracted)
    }

    /// Returns true if this terminal state counts as a page error
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::FetchFailed | Self::ContainersMissingFinal | Self::NoRecords
        )
    }

    /// Returns true if `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: PageState) -> bool {
        use PageState::*;

        matches!(
            (self, next),
            (Pending, Fetched)
                | (Pending, FetchFailed)
                | (Fetched, ContainersFound)
                | (Fetched, ContainersMissing)
                | (ContainersMissing, ContainersFound)
                | (ContainersMissing, ContainersMissingFinal)
                | (ContainersFound, RecordsExtracted)
                | (ContainersFound, NoRecords)
        )
    }

    /// Moves to `next`, rejecting transitions the state machine does not allow
    pub fn transition(self, next: PageState) -> Result<PageState, ScoutError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(ScoutError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Converts the page state to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetched => "fetched",
            Self::ContainersMissing => "containers_missing",
            Self::ContainersFound => "containers_found",
            Self::RecordsExtracted => "records_extracted",
            Self::FetchFailed => "fetch_failed",
            Self::ContainersMissingFinal => "containers_missing_final",
            Self::NoRecords => "no_records",
        }
    }

    /// Returns all possible page states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Pending,
            Self::Fetched,
            Self::ContainersMissing,
            Self::ContainersFound,
            Self::RecordsExtracted,
            Self::FetchFailed,
            Self::ContainersMissingFinal,
            Self::NoRecords,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
