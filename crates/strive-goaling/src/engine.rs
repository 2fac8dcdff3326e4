// engine.rs — Goaling: the goal lifecycle policy layer.
//
// One generic engine backs both goal domains. Strive instantiates it twice:
// once with user ids as authors, once with community ids — two disjoint
// store directories, identical behavior, different meaning of "author".
//
// The engine owns all validation and the one-way Incomplete → Complete
// transition. The store below it only maintains the partition invariant;
// the HTTP boundary above it only resolves sessions and memberships before
// calling in.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::GoalError;
use crate::events::{EventDispatcher, GoalEvent, NotificationSink};
use crate::goal::Goal;
use crate::store::GoalStore;

/// A partial update to an incomplete goal. `None` fields are left as-is.
#[derive(Debug, Clone, Default)]
pub struct GoalUpdate {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub amount: Option<f64>,
    pub target_date: Option<DateTime<Utc>>,
}

/// Goal lifecycle engine, generic over the author identifier type.
///
/// The engine only compares authors for equality and renders them into
/// error and event context; it never interprets them.
pub struct Goaling<A> {
    store: GoalStore<A>,
    events: EventDispatcher,
}

impl<A> Goaling<A>
where
    A: Clone + Eq + fmt::Display + Serialize + DeserializeOwned,
{
    /// Open an engine over the two partitions rooted at `base_dir`.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self, GoalError> {
        Ok(Self {
            store: GoalStore::new(base_dir)?,
            events: EventDispatcher::new(),
        })
    }

    /// Register a notification sink for lifecycle events.
    pub fn add_sink(&mut self, sink: Box<dyn NotificationSink>) {
        self.events.add_sink(sink);
    }

    /// Create a new incomplete goal with zero progress.
    ///
    /// Rejects an empty name, a non-positive amount, and a deadline that is
    /// not strictly in the future.
    pub fn create(
        &self,
        author: A,
        name: &str,
        unit: &str,
        amount: f64,
        target_date: DateTime<Utc>,
    ) -> Result<Goal<A>, GoalError> {
        if name.is_empty() {
            return Err(GoalError::EmptyName);
        }
        // NaN is unordered, so it needs its own check to fail validation.
        if amount <= 0.0 || amount.is_nan() {
            return Err(GoalError::NonPositiveAmount(amount));
        }
        if target_date <= Utc::now() {
            return Err(GoalError::DeadlineNotFuture(target_date));
        }

        let goal = Goal::new(author, name, unit, amount, target_date);
        self.store.save_incomplete(&goal)?;
        tracing::debug!(goal_id = %goal.id, name, "goal created");
        self.events.dispatch(&GoalEvent::goal_created(
            goal.id,
            &goal.author.to_string(),
            name,
        ));
        Ok(goal)
    }

    /// Partially update an incomplete goal. Completed goals are immutable
    /// and report NotFound here.
    ///
    /// If a new `amount` is supplied and the stored progress already meets
    /// it, the goal completes as a side effect — checked against the *new*
    /// amount, clamped to the *stored* one — and the remaining field
    /// changes are dropped (the incomplete record no longer exists to
    /// receive them). Fields are validated in declaration order, so a bad
    /// deadline supplied alongside a completing amount still errors, after
    /// the completion has happened.
    pub fn update(&self, id: Uuid, update: GoalUpdate) -> Result<(), GoalError> {
        let mut goal = self
            .store
            .read_incomplete(id)?
            .ok_or(GoalError::NotFound(id))?;
        let mut completed = false;

        if let Some(name) = update.name {
            if name.is_empty() {
                return Err(GoalError::EmptyName);
            }
            goal.name = name;
        }
        if let Some(unit) = update.unit {
            goal.unit = unit;
        }
        if let Some(amount) = update.amount {
            if amount <= 0.0 || amount.is_nan() {
                return Err(GoalError::NonPositiveAmount(amount));
            }
            if goal.progress >= amount {
                self.complete(id)?;
                completed = true;
            }
            goal.amount = amount;
        }
        if let Some(target_date) = update.target_date {
            if target_date <= Utc::now() {
                return Err(GoalError::DeadlineNotFuture(target_date));
            }
            goal.target_date = target_date;
        }

        if !completed {
            self.store.save_incomplete(&goal)?;
        }
        Ok(())
    }

    /// Add a positive progress delta to an incomplete goal, completing it
    /// if the accumulated progress reaches the target amount.
    pub fn add_progress(&self, id: Uuid, delta: f64) -> Result<(), GoalError> {
        let mut goal = self
            .store
            .read_incomplete(id)?
            .ok_or(GoalError::NotFound(id))?;
        if delta <= 0.0 || delta.is_nan() {
            return Err(GoalError::NonPositiveProgress(delta));
        }

        goal.progress += delta;
        self.store.save_incomplete(&goal)?;
        self.events
            .dispatch(&GoalEvent::progress_added(id, goal.progress, goal.amount));

        if goal.progress >= goal.amount {
            self.complete(id)?;
        }
        Ok(())
    }

    /// The completion trigger: stamp the completion instant over the
    /// deadline, clamp progress to the target amount, and migrate the
    /// record to the complete partition.
    ///
    /// A goal that has already completed (a racing trigger) is a silent
    /// no-op; NotFound means the id is in neither partition.
    pub fn complete(&self, id: Uuid) -> Result<(), GoalError> {
        if self.store.read_complete(id)?.is_some() {
            return Ok(());
        }
        let mut goal = self
            .store
            .read_incomplete(id)?
            .ok_or(GoalError::NotFound(id))?;

        goal.target_date = Utc::now();
        goal.progress = goal.amount;
        let completed = self.store.migrate(goal)?;

        tracing::info!(goal_id = %id, name = %completed.name, "goal completed");
        self.events.dispatch(&GoalEvent::goal_completed(
            id,
            &completed.author.to_string(),
            &completed.name,
        ));
        Ok(())
    }

    /// Delete an incomplete goal. Completed goals are history and cannot
    /// be deleted through this engine.
    pub fn delete_incomplete(&self, id: Uuid) -> Result<(), GoalError> {
        if !self.store.remove_incomplete(id)? {
            return Err(GoalError::NotFound(id));
        }
        tracing::debug!(goal_id = %id, "incomplete goal deleted");
        Ok(())
    }

    /// Check that `candidate` authored the incomplete goal `id`.
    ///
    /// Only incomplete goals need authorization checks; completed goals
    /// are read-only for everyone.
    pub fn assert_author(&self, id: Uuid, candidate: &A) -> Result<(), GoalError> {
        let goal = self
            .store
            .read_incomplete(id)?
            .ok_or(GoalError::NotFound(id))?;
        if goal.author == *candidate {
            Ok(())
        } else {
            Err(GoalError::NotAuthor {
                actor: candidate.to_string(),
                goal_id: id,
            })
        }
    }

    /// Resolve a goal by its logical id, whichever partition holds it.
    pub fn get(&self, id: Uuid) -> Result<Goal<A>, GoalError> {
        self.store.lookup(id)?.ok_or(GoalError::NotFound(id))
    }

    /// All incomplete goals, newest-first.
    pub fn incomplete_goals(&self) -> Result<Vec<Goal<A>>, GoalError> {
        self.store.list_incomplete()
    }

    /// All completed goals, newest-first by completion time.
    pub fn complete_goals(&self) -> Result<Vec<Goal<A>>, GoalError> {
        self.store.list_complete()
    }

    /// Incomplete goals owned by the given author, newest-first.
    pub fn incomplete_by_author(&self, author: &A) -> Result<Vec<Goal<A>>, GoalError> {
        let mut goals = self.store.list_incomplete()?;
        goals.retain(|g| g.author == *author);
        Ok(goals)
    }

    /// Completed goals owned by the given author, newest-first.
    pub fn complete_by_author(&self, author: &A) -> Result<Vec<Goal<A>>, GoalError> {
        let mut goals = self.store.list_complete()?;
        goals.retain(|g| g.author == *author);
        Ok(goals)
    }
}
