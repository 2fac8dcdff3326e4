// store.rs — Dual-partition storage for goal records.
//
// One engine instance owns two partitions on disk:
//   <base>/incomplete/<id>.json        — keyed by the goal's own id
//   <base>/complete/<original_id>.json — keyed by the id the goal held
//                                        while incomplete
//
// Filing completed records under their original id is the reverse index
// that keeps a goal addressable by the same identifier across its whole
// logical lifetime, even though completion assigns a fresh storage id.
//
// Migration is insert-then-delete: write the completed record first, then
// remove the incomplete one. A crash between the two steps leaves the goal
// transiently present in both partitions (never lost), so `lookup` consults
// the complete partition first and `migrate` cleans up a leftover
// incomplete record instead of inserting twice.

use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::GoalError;
use crate::goal::Goal;

/// Persistent store for one engine instance's two goal partitions.
///
/// Each record gets its own JSON file, which keeps the partitions easy to
/// inspect manually. The store knows nothing about lifecycle policy; it
/// only maintains the exactly-one-partition-per-logical-id invariant.
pub struct GoalStore<A> {
    incomplete_dir: PathBuf,
    complete_dir: PathBuf,
    _author: PhantomData<A>,
}

impl<A> GoalStore<A>
where
    A: Serialize + DeserializeOwned,
{
    /// Open a store rooted at the given directory, creating the two
    /// partition directories if they don't exist.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self, GoalError> {
        let base_dir = base_dir.as_ref();
        let incomplete_dir = base_dir.join("incomplete");
        let complete_dir = base_dir.join("complete");
        for dir in [&incomplete_dir, &complete_dir] {
            fs::create_dir_all(dir).map_err(|source| GoalError::Io {
                path: dir.display().to_string(),
                source,
            })?;
        }
        Ok(Self {
            incomplete_dir,
            complete_dir,
            _author: PhantomData,
        })
    }

    /// Save an incomplete record (creates or overwrites).
    pub fn save_incomplete(&self, goal: &Goal<A>) -> Result<(), GoalError> {
        self.write_record(&self.incomplete_file(goal.id), goal)
    }

    /// Read an incomplete record by its own id.
    pub fn read_incomplete(&self, id: Uuid) -> Result<Option<Goal<A>>, GoalError> {
        self.read_record(&self.incomplete_file(id))
    }

    /// Read a complete record by the id it held while incomplete.
    pub fn read_complete(&self, original_id: Uuid) -> Result<Option<Goal<A>>, GoalError> {
        self.read_record(&self.complete_file(original_id))
    }

    /// Remove an incomplete record. Returns whether it existed.
    pub fn remove_incomplete(&self, id: Uuid) -> Result<bool, GoalError> {
        let path = self.incomplete_file(id);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).map_err(|source| GoalError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(true)
    }

    /// Resolve a logical id across both partitions.
    ///
    /// The complete partition wins: during the migration crash window a
    /// goal can transiently exist in both, and the completed record is the
    /// authoritative one.
    pub fn lookup(&self, id: Uuid) -> Result<Option<Goal<A>>, GoalError> {
        if let Some(complete) = self.read_complete(id)? {
            return Ok(Some(complete));
        }
        self.read_incomplete(id)
    }

    /// Move a record from the incomplete to the complete partition.
    ///
    /// Takes the record in its final (caller-mutated) form, assigns a
    /// fresh storage id, and files it under the original id. Idempotent:
    /// if the complete partition already holds the original id (a racing
    /// trigger, or a crash after the insert step), the existing completed
    /// record is kept and only the leftover incomplete file is removed.
    pub fn migrate(&self, goal: Goal<A>) -> Result<Goal<A>, GoalError> {
        let original_id = goal.id;

        if let Some(existing) = self.read_complete(original_id)? {
            self.remove_incomplete(original_id)?;
            return Ok(existing);
        }

        let completed = Goal {
            id: Uuid::new_v4(),
            completed_from: Some(original_id),
            ..goal
        };
        // Insert before delete: a crash here duplicates, never loses.
        self.write_record(&self.complete_file(original_id), &completed)?;
        self.remove_incomplete(original_id)?;
        Ok(completed)
    }

    /// All incomplete records, newest-first by creation time.
    pub fn list_incomplete(&self) -> Result<Vec<Goal<A>>, GoalError> {
        let mut goals = self.read_partition(&self.incomplete_dir)?;
        goals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(goals)
    }

    /// All complete records, newest-first by completion time (the trigger
    /// stamps `target_date` with the completion instant, so completion
    /// order is insertion order for this partition).
    pub fn list_complete(&self) -> Result<Vec<Goal<A>>, GoalError> {
        let mut goals = self.read_partition(&self.complete_dir)?;
        goals.sort_by(|a, b| b.target_date.cmp(&a.target_date));
        Ok(goals)
    }

    fn read_partition(&self, dir: &Path) -> Result<Vec<Goal<A>>, GoalError> {
        let mut goals = Vec::new();
        let entries = fs::read_dir(dir).map_err(|source| GoalError::Io {
            path: dir.display().to_string(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| GoalError::Io {
                path: dir.display().to_string(),
                source,
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Ok(json) = fs::read_to_string(&path) {
                    if let Ok(goal) = serde_json::from_str::<Goal<A>>(&json) {
                        goals.push(goal);
                    }
                }
            }
        }
        Ok(goals)
    }

    fn write_record(&self, path: &Path, goal: &Goal<A>) -> Result<(), GoalError> {
        let json = serde_json::to_string_pretty(goal)?;
        fs::write(path, json).map_err(|source| GoalError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    fn read_record(&self, path: &Path) -> Result<Option<Goal<A>>, GoalError> {
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(path).map_err(|source| GoalError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let goal: Goal<A> = serde_json::from_str(&json)?;
        Ok(Some(goal))
    }

    fn incomplete_file(&self, id: Uuid) -> PathBuf {
        self.incomplete_dir.join(format!("{}.json", id))
    }

    fn complete_file(&self, original_id: Uuid) -> PathBuf {
        self.complete_dir.join(format!("{}.json", original_id))
    }
}
