// goal.rs — Goal: the tracked-quantity record at the heart of Strive.
//
// A Goal is a target amount with accumulated progress, a deadline, and an
// author. The author type is generic: the same record (and the same engine)
// serves user-authored goals and community-authored goals, differing only in
// what the author identifier means. The engine compares authors for equality
// and nothing else.
//
// The lifecycle has two states and one transition:
//   Incomplete → Complete (when progress reaches the target amount)
// A completed goal never becomes incomplete again.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The lifecycle state of a goal. Derived from partition membership,
/// not stored: a record carrying `completed_from` is Complete.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GoalState {
    /// Progress is still accumulating toward the target amount.
    Incomplete,

    /// The target was reached; the record is immutable history.
    Complete,
}

impl fmt::Display for GoalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalState::Incomplete => write!(f, "incomplete"),
            GoalState::Complete => write!(f, "complete"),
        }
    }
}

/// A single goal record.
///
/// `A` is the opaque author identifier — a user id in the user-goal engine,
/// a community id in the community-goal engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal<A> {
    /// Storage identifier. Fresh on creation, and fresh again after
    /// migration to the complete partition.
    pub id: Uuid,

    /// The owning entity. Never changes for the lifetime of the goal.
    pub author: A,

    /// Display label. Non-empty (enforced by the engine).
    pub name: String,

    /// Free-text unit of measure (e.g., "km", "pages"). May be empty.
    pub unit: String,

    /// Target quantity. Positive while incomplete.
    pub amount: f64,

    /// Accumulated quantity. Non-negative, never decreases while
    /// incomplete; clamped to `amount` on completion.
    pub progress: f64,

    /// When the goal was created. Immutable.
    pub created_at: DateTime<Utc>,

    /// Deadline while incomplete; overwritten with the completion instant
    /// when the goal completes (the field doubles as "completed at").
    pub target_date: DateTime<Utc>,

    /// On completed records only: the id the goal held while incomplete.
    /// This is what keeps the goal addressable by its original id after
    /// it moves partitions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_from: Option<Uuid>,
}

impl<A> Goal<A> {
    /// Create a fresh incomplete goal with zero progress.
    ///
    /// Validation (non-empty name, positive amount, future deadline) is the
    /// engine's job; this constructor only stamps identity and timestamps.
    pub fn new(
        author: A,
        name: impl Into<String>,
        unit: impl Into<String>,
        amount: f64,
        target_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            author,
            name: name.into(),
            unit: unit.into(),
            amount,
            progress: 0.0,
            created_at: Utc::now(),
            target_date,
            completed_from: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> GoalState {
        if self.completed_from.is_some() {
            GoalState::Complete
        } else {
            GoalState::Incomplete
        }
    }

    /// The goal's stable logical identifier: its own id while incomplete,
    /// the original (pre-migration) id after completion.
    pub fn logical_id(&self) -> Uuid {
        self.completed_from.unwrap_or(self.id)
    }
}
