//! Identity-partitioned task repositories.
//!
//! A store holds the tasks of every identity but only ever hands out or
//! replaces one identity's subset at a time.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde_json::Value;
use tracing::{debug, error};

use crate::error::{Result, TaskError};
use crate::json_file;
use crate::model::{Identity, Task};

/// Repository of tasks keyed by owning identity.
pub trait TaskStore: Send + Sync {
    /// Every record, for all identities, in stored order.
    ///
    /// Unreadable backing data is reported as an empty collection.
    fn load_all(&self) -> Vec<Task>;

    /// Replace all records owned by `identity` with `tasks`.
    ///
    /// # Errors
    ///
    /// Returns `StorageWrite` if the backing data could not be rewritten.
    fn save(&self, identity: &Identity, tasks: &[Task]) -> Result<()>;

    /// Records owned by `identity`, in stored order.
    fn load(&self, identity: &Identity) -> Vec<Task> {
        self.load_all()
            .into_iter()
            .filter(|task| &task.owner == identity)
            .collect()
    }
}

/// Drop `identity`'s records from `all` and append `tasks`.
fn merge(mut all: Vec<Task>, identity: &Identity, tasks: &[Task]) -> Vec<Task> {
    all.retain(|task| &task.owner != identity);
    all.extend_from_slice(tasks);
    all
}

/// Whether a raw file record belongs to `identity`.
fn owned_by(record: &Value, identity: &Identity) -> bool {
    record.get("user_id").and_then(Value::as_str) == Some(identity.as_str())
}

/// Store backed by one JSON file shared by all identities.
///
/// Every save re-reads the whole file, merges, and rewrites it. The merge
/// works on raw records, so other identities' entries are written back
/// unchanged even when they do not decode as tasks. Saves from this process
/// are serialized; other processes writing the same file still race, and the
/// last rewrite wins.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskStore for JsonFileStore {
    fn load_all(&self) -> Vec<Task> {
        json_file::load_or_empty(&self.path)
    }

    fn save(&self, identity: &Identity, tasks: &[Task]) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut records = json_file::load_records_or_empty(&self.path);
        records.retain(|record| !owned_by(record, identity));
        for task in tasks {
            let record = serde_json::to_value(task)
                .map_err(|e| TaskError::storage_write(&self.path, e))?;
            records.push(record);
        }
        debug!(
            identity = %identity,
            owned = tasks.len(),
            total = records.len(),
            "rewriting task file"
        );

        json_file::save_records(&self.path, &records).map_err(|e| {
            error!(path = %self.path.display(), error = %e, "failed to save tasks");
            TaskError::storage_write(&self.path, e)
        })
    }
}

/// Store kept entirely in memory. Used by tests and as a scratch backend.
#[derive(Default)]
pub struct MemoryStore {
    tasks: Mutex<Vec<Task>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records.
    #[must_use]
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
        }
    }
}

impl TaskStore for MemoryStore {
    fn load_all(&self) -> Vec<Task> {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, identity: &Identity, tasks: &[Task]) -> Result<()> {
        let mut guard = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        let all = std::mem::take(&mut *guard);
        *guard = merge(all, identity, tasks);
        Ok(())
    }
}
