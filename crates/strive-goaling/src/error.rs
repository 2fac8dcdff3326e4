// error.rs — Error types for the goal lifecycle subsystem.
//
// Two kinds matter to callers: NotAllowed (a validation or authorization
// rule rejected the request) and NotFound (the goal is not in the partition
// the operation requires). Storage failures are a third, infrastructural
// kind. The boundary layer branches on `kind()` to pick a status code and
// renders the specific variant into a message.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Coarse classification of a [`GoalError`] for the boundary layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A validation or authorization rule rejected the request.
    NotAllowed,

    /// The referenced goal does not exist where the operation looked.
    NotFound,

    /// The backing store failed.
    Storage,
}

/// Errors that can occur during goal lifecycle operations.
#[derive(Debug, Error)]
pub enum GoalError {
    /// Goal name was empty on create or update.
    #[error("goal name cannot be empty")]
    EmptyName,

    /// Target amount was zero or negative.
    #[error("goal amount must be positive, got {0}")]
    NonPositiveAmount(f64),

    /// Progress delta was zero or negative.
    #[error("progress must be positive, got {0}")]
    NonPositiveProgress(f64),

    /// Target completion date was not strictly in the future.
    #[error("target completion date must be in the future, got {0}")]
    DeadlineNotFuture(DateTime<Utc>),

    /// The candidate is not the author of the goal.
    #[error("{actor} is not the author of goal {goal_id}")]
    NotAuthor { actor: String, goal_id: Uuid },

    /// The goal does not exist in the required partition.
    #[error("goal {0} does not exist")]
    NotFound(Uuid),

    /// A file I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// Failed to serialize/deserialize goal data.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GoalError {
    /// Which of the two caller-facing error kinds (plus storage) this is.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GoalError::EmptyName
            | GoalError::NonPositiveAmount(_)
            | GoalError::NonPositiveProgress(_)
            | GoalError::DeadlineNotFuture(_)
            | GoalError::NotAuthor { .. } => ErrorKind::NotAllowed,
            GoalError::NotFound(_) => ErrorKind::NotFound,
            GoalError::Io { .. } | GoalError::Serialization(_) => ErrorKind::Storage,
        }
    }
}
