// events.rs — Event model and notification dispatch.
//
// The engine emits events at the three points callers care about:
// creation, progress accrual, and completion. Notification sinks (log
// files, feed fan-out, push notifications) subscribe to these events.
// Sink failures never fail the operation that produced the event.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GoalError;

/// Events emitted by the goal engine.
///
/// Authors are rendered to strings here so sinks stay independent of the
/// engine's author type parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum GoalEvent {
    /// A new goal entered the incomplete partition.
    GoalCreated {
        goal_id: Uuid,
        author: String,
        name: String,
        timestamp: DateTime<Utc>,
    },

    /// Progress was added to an incomplete goal.
    ProgressAdded {
        goal_id: Uuid,
        progress: f64,
        amount: f64,
        timestamp: DateTime<Utc>,
    },

    /// A goal reached its target and migrated to the complete partition.
    GoalCompleted {
        goal_id: Uuid,
        author: String,
        name: String,
        timestamp: DateTime<Utc>,
    },
}

impl GoalEvent {
    /// The event type name (matches the serialized `event_type` tag).
    pub fn event_type(&self) -> &str {
        match self {
            GoalEvent::GoalCreated { .. } => "goal_created",
            GoalEvent::ProgressAdded { .. } => "progress_added",
            GoalEvent::GoalCompleted { .. } => "goal_completed",
        }
    }

    pub fn goal_created(goal_id: Uuid, author: &str, name: &str) -> Self {
        GoalEvent::GoalCreated {
            goal_id,
            author: author.to_string(),
            name: name.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn progress_added(goal_id: Uuid, progress: f64, amount: f64) -> Self {
        GoalEvent::ProgressAdded {
            goal_id,
            progress,
            amount,
            timestamp: Utc::now(),
        }
    }

    pub fn goal_completed(goal_id: Uuid, author: &str, name: &str) -> Self {
        GoalEvent::GoalCompleted {
            goal_id,
            author: author.to_string(),
            name: name.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Trait for receiving goal events.
///
/// Implementations decide what to do with each event: append to a file,
/// fan out to a feed, send a push notification.
pub trait NotificationSink: Send {
    /// Handle an event. Errors are logged but don't stop the engine.
    fn send(&self, event: &GoalEvent) -> Result<(), GoalError>;
}

/// Logs events as JSONL to a file (always-on sink).
pub struct LogSink {
    path: PathBuf,
}

impl LogSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl NotificationSink for LogSink {
    fn send(&self, event: &GoalEvent) -> Result<(), GoalError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| GoalError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| GoalError::Io {
                path: self.path.display().to_string(),
                source,
            })?;

        let json = serde_json::to_string(event)?;
        writeln!(file, "{}", json).map_err(|source| GoalError::Io {
            path: self.path.display().to_string(),
            source,
        })?;

        Ok(())
    }
}

/// Dispatches events to multiple sinks.
///
/// Errors from individual sinks are logged (via tracing) but don't
/// prevent other sinks from receiving the event.
#[derive(Default)]
pub struct EventDispatcher {
    sinks: Vec<Box<dyn NotificationSink>>,
}

impl EventDispatcher {
    /// Create a new dispatcher with no sinks.
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    /// Add a notification sink.
    pub fn add_sink(&mut self, sink: Box<dyn NotificationSink>) {
        self.sinks.push(sink);
    }

    /// Dispatch an event to all sinks.
    pub fn dispatch(&self, event: &GoalEvent) {
        for sink in &self.sinks {
            if let Err(e) = sink.send(event) {
                tracing::warn!("notification sink error: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn event_serialization_round_trip() {
        let event = GoalEvent::goal_created(Uuid::new_v4(), "alice", "Run");
        let json = serde_json::to_string(&event).unwrap();
        let restored: GoalEvent = serde_json::from_str(&json).unwrap();

        assert_eq!(event.event_type(), restored.event_type());
        assert!(json.contains("\"goal_created\""));
    }

    #[test]
    fn log_sink_appends_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let sink = LogSink::new(&path);

        sink.send(&GoalEvent::goal_created(Uuid::new_v4(), "alice", "Run"))
            .unwrap();
        sink.send(&GoalEvent::progress_added(Uuid::new_v4(), 4.0, 10.0))
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn dispatcher_sends_to_all_sinks() {
        let dir = tempdir().unwrap();
        let path1 = dir.path().join("sink1.jsonl");
        let path2 = dir.path().join("sink2.jsonl");

        let mut dispatcher = EventDispatcher::new();
        dispatcher.add_sink(Box::new(LogSink::new(&path1)));
        dispatcher.add_sink(Box::new(LogSink::new(&path2)));

        dispatcher.dispatch(&GoalEvent::goal_completed(Uuid::new_v4(), "alice", "Run"));

        assert!(fs::read_to_string(&path1).unwrap().contains("goal_completed"));
        assert!(fs::read_to_string(&path2).unwrap().contains("goal_completed"));
    }
}
