//! # strive-goaling
//!
//! Goal lifecycle engine for Strive.
//!
//! A [`Goal`] is a tracked quantity with a target amount, a deadline, and
//! an author. Goals live in one of two partitions — incomplete or
//! complete — and migrate one way when accumulated progress reaches the
//! target, while staying addressable by the id they were created with.
//!
//! The engine is generic over the author identifier: Strive instantiates
//! it once for user-authored goals and once for community-authored goals,
//! with disjoint storage and identical behavior.
//!
//! ## Key components
//!
//! - [`Goal`] / [`GoalState`] — the record and its two-state lifecycle
//! - [`Goaling`] — the policy layer: validation, progress accrual, the
//!   completion trigger, authorization checks, and read projections
//! - [`GoalStore`] — dual-partition JSON file persistence with
//!   identity-preserving migration
//! - [`GoalError`] / [`ErrorKind`] — the NotAllowed / NotFound taxonomy
//! - [`GoalEvent`] / [`EventDispatcher`] — lifecycle event notifications
//! - [`responses`] — boundary-layer goal and error rendering

pub mod engine;
pub mod error;
pub mod events;
pub mod goal;
pub mod responses;
pub mod store;

pub use engine::{GoalUpdate, Goaling};
pub use error::{ErrorKind, GoalError};
pub use events::{EventDispatcher, GoalEvent, LogSink, NotificationSink};
pub use goal::{Goal, GoalState};
pub use store::GoalStore;
