//! Errors returned by this crate

use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Result type alias used across this crate
pub type Result<T> = std::result::Result<T, CalendarError>;

/// The store operation that failed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreAction {
    Fetch,
    Save,
    Update,
    Delete,
}

impl Display for StoreAction {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Self::Fetch => write!(f, "fetch"),
            Self::Save => write!(f, "save"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Problems with user input, detected before anything is sent to the store
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Must set a title for the event.")]
    MissingTitle,
    #[error("Must select a start date.")]
    MissingStart,
    #[error("Must select an end date.")]
    MissingEnd,
    #[error("Start date must be before the end date.")]
    StartNotBeforeEnd,
}

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A store call failed. Nothing has been changed locally.
    #[error("Unable to {action} events: {reason}")]
    Persistence { action: StoreAction, reason: String },

    /// The caller broke a documented precondition
    #[error("Precondition violated: {0}")]
    Precondition(String),

    /// A month that is beyond the dates that can be represented
    #[error("Month {month} cannot be shifted by {shift} month(s)")]
    OutOfRange { month: String, shift: i32 },
}

impl CalendarError {
    pub(crate) fn persistence(action: StoreAction, err: Box<dyn std::error::Error>) -> Self {
        Self::Persistence { action, reason: err.to_string() }
    }

    /// Whether repeating the same action may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence { .. })
    }

    /// The text that should be shown to the user for this error
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Persistence { action: StoreAction::Fetch, .. } => "Failed to load events.".to_string(),
            Self::Persistence { .. } => "Failed to save event to database.".to_string(),
            Self::Precondition(_) => "Something went wrong.".to_string(),
            Self::OutOfRange { .. } => "This date is out of range.".to_string(),
        }
    }
}
