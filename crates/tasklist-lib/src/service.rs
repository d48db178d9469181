//! Task operations for a single identity.
//!
//! `TaskService` owns the working list of the active identity and writes it
//! back through its [`TaskStore`] after every mutation.

use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::model::{Identity, Priority, Task};
use crate::store::TaskStore;

/// Current time at the precision the task file stores.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Aggregate counts over the active identity's tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl TaskStats {
    /// `completed / total`, or 0 when there are no tasks.
    #[must_use]
    pub fn completion_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// Task counts per priority over the unfiltered list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityBreakdown {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PriorityBreakdown {
    #[must_use]
    pub const fn count(&self, priority: Priority) -> usize {
        match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }
}

/// In-memory task list for one identity, persisted on every change.
///
/// Mutations return `Ok(false)` when nothing changed (blank title, unknown id)
/// and `Err(StorageWrite)` when the change was applied in memory but could not
/// be saved. The in-memory change is not rolled back in that case.
pub struct TaskService {
    identity: Identity,
    store: Arc<dyn TaskStore>,
    tasks: Vec<Task>,
}

impl TaskService {
    /// Bind to `identity` and load its tasks from `store`.
    #[must_use]
    pub fn new(store: Arc<dyn TaskStore>, identity: Identity) -> Self {
        let tasks = store.load(&identity);
        debug!(identity = %identity, count = tasks.len(), "loaded tasks");
        Self {
            identity,
            store,
            tasks,
        }
    }

    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// All tasks of the active identity in insertion order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[must_use]
    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Add a task. Returns `Ok(false)` if the trimmed title is empty.
    ///
    /// # Errors
    ///
    /// Returns `StorageWrite` if the task was added but could not be saved.
    pub fn add_task(&mut self, title: &str, description: &str, priority: Priority) -> Result<bool> {
        if title.trim().is_empty() {
            debug!(identity = %self.identity, "rejected task with blank title");
            return Ok(false);
        }

        let task = Task::new(
            self.next_id(),
            self.identity.clone(),
            title,
            description,
            priority,
            now(),
        );
        info!(identity = %self.identity, id = task.id, "task added");
        self.tasks.push(task);
        self.persist()?;
        Ok(true)
    }

    /// Mark a task complete and stamp `completed_at`.
    ///
    /// # Errors
    ///
    /// Returns `StorageWrite` if the change could not be saved.
    pub fn mark_complete(&mut self, id: u64) -> Result<bool> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        task.complete(now());
        debug!(identity = %self.identity, id, "task completed");
        self.persist()?;
        Ok(true)
    }

    /// Mark a task incomplete and clear `completed_at`.
    ///
    /// # Errors
    ///
    /// Returns `StorageWrite` if the change could not be saved.
    pub fn mark_incomplete(&mut self, id: u64) -> Result<bool> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        task.reopen();
        debug!(identity = %self.identity, id, "task reopened");
        self.persist()?;
        Ok(true)
    }

    /// Remove a task.
    ///
    /// # Errors
    ///
    /// Returns `StorageWrite` if the removal could not be saved.
    pub fn delete_task(&mut self, id: u64) -> Result<bool> {
        let Some(index) = self.tasks.iter().position(|t| t.id == id) else {
            return Ok(false);
        };
        self.tasks.remove(index);
        info!(identity = %self.identity, id, "task deleted");
        self.persist()?;
        Ok(true)
    }

    /// All tasks, or only incomplete ones.
    #[must_use]
    pub fn list_tasks(&self, include_completed: bool) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| include_completed || !t.completed)
            .collect()
    }

    #[must_use]
    pub fn stats(&self) -> TaskStats {
        let total = self.tasks.len();
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        TaskStats {
            total,
            completed,
            pending: total - completed,
        }
    }

    #[must_use]
    pub fn priority_breakdown(&self) -> PriorityBreakdown {
        self.tasks
            .iter()
            .fold(PriorityBreakdown::default(), |mut acc, task| {
                match task.priority {
                    Priority::High => acc.high += 1,
                    Priority::Medium => acc.medium += 1,
                    Priority::Low => acc.low += 1,
                }
                acc
            })
    }

    // One past the largest id in the working list.
    fn next_id(&self) -> u64 {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    fn persist(&self) -> Result<()> {
        self.store.save(&self.identity, &self.tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskError;
    use crate::query::{ListFilters, SortKey};
    use crate::store::{JsonFileStore, MemoryStore};
    use proptest::prelude::*;

    fn service(store: &Arc<MemoryStore>, owner: &str) -> TaskService {
        TaskService::new(store.clone(), Identity::new(owner))
    }

    #[test]
    fn test_blank_title_rejected_without_touching_store() {
        let store = Arc::new(MemoryStore::new());
        let mut svc = service(&store, "alice");

        assert!(!svc.add_task("", "", Priority::Medium).unwrap());
        assert!(!svc.add_task("   \t", "desc", Priority::High).unwrap());
        assert!(svc.tasks().is_empty());
        assert!(store.load_all().is_empty());
    }

    #[test]
    fn test_add_then_complete_then_reopen() {
        let store = Arc::new(MemoryStore::new());
        let mut svc = service(&store, "alice");

        assert!(svc.add_task("Write report", "", Priority::Medium).unwrap());
        let task = svc.get(1).unwrap();
        assert!(!task.completed);
        assert!(task.completed_at.is_none());

        assert!(svc.mark_complete(1).unwrap());
        let task = svc.get(1).unwrap();
        assert!(task.completed);
        assert!(task.completed_at.is_some());

        assert!(svc.mark_incomplete(1).unwrap());
        let task = svc.get(1).unwrap();
        assert!(!task.completed);
        assert!(task.completed_at.is_none());

        // persisted state follows every step
        assert!(!store.load(&Identity::new("alice"))[0].completed);
    }

    #[test]
    fn test_unknown_id_returns_false() {
        let store = Arc::new(MemoryStore::new());
        let mut svc = service(&store, "alice");
        assert!(!svc.mark_complete(42).unwrap());
        assert!(!svc.mark_incomplete(42).unwrap());
        assert!(!svc.delete_task(42).unwrap());
    }

    #[test]
    fn test_delete_removes_one_and_repeat_fails() {
        let store = Arc::new(MemoryStore::new());
        let mut svc = service(&store, "alice");
        svc.add_task("One", "", Priority::Low).unwrap();
        svc.add_task("Two", "", Priority::Low).unwrap();

        assert!(svc.delete_task(1).unwrap());
        assert_eq!(svc.tasks().len(), 1);
        assert_eq!(store.load_all().len(), 1);
        assert!(!svc.delete_task(1).unwrap());
    }

    #[test]
    fn test_ids_stay_unique_after_delete() {
        let store = Arc::new(MemoryStore::new());
        let mut svc = service(&store, "alice");
        for title in ["a", "b", "c"] {
            svc.add_task(title, "", Priority::Medium).unwrap();
        }
        svc.delete_task(1).unwrap();
        svc.add_task("d", "", Priority::Medium).unwrap();

        let ids: Vec<u64> = svc.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 3, 4]);
    }

    #[test]
    fn test_list_tasks_hides_completed() {
        let store = Arc::new(MemoryStore::new());
        let mut svc = service(&store, "alice");
        svc.add_task("open", "", Priority::Medium).unwrap();
        svc.add_task("done", "", Priority::Medium).unwrap();
        svc.mark_complete(2).unwrap();

        assert_eq!(svc.list_tasks(true).len(), 2);
        let pending = svc.list_tasks(false);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].title, "open");
    }

    #[test]
    fn test_scenario_priority_sort_and_stats() {
        let store = Arc::new(MemoryStore::new());
        let mut svc = TaskService::new(store.clone(), Identity::from_email("alice@example.com"));
        assert_eq!(svc.identity().as_str(), "alice_example_com");

        svc.add_task("Buy milk", "", Priority::Low).unwrap();
        svc.add_task("Ship release", "critical", Priority::High).unwrap();

        let filters = ListFilters {
            sort: SortKey::Priority,
            ..Default::default()
        };
        let sorted: Vec<&str> = filters
            .apply(svc.list_tasks(true))
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(sorted, vec!["Ship release", "Buy milk"]);

        svc.mark_complete(1).unwrap();
        assert_eq!(
            svc.stats(),
            TaskStats {
                total: 2,
                completed: 1,
                pending: 1
            }
        );
        assert!((svc.stats().completion_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_two_identities_share_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        let store: Arc<dyn TaskStore> = Arc::new(JsonFileStore::new(&path));

        let mut a = TaskService::new(store.clone(), Identity::new("a"));
        let mut b = TaskService::new(store.clone(), Identity::new("b"));
        a.add_task("from a", "", Priority::Medium).unwrap();
        b.add_task("from b", "", Priority::Medium).unwrap();

        let all = crate::json_file::load(&path).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all.iter().filter(|t| t.owner.as_str() == "a").count(), 1);
        assert_eq!(all.iter().filter(|t| t.owner.as_str() == "b").count(), 1);

        // a fresh service sees only its own records
        let reloaded = TaskService::new(store, Identity::new("a"));
        assert_eq!(reloaded.tasks(), a.tasks());
    }

    #[test]
    fn test_priority_breakdown_and_empty_rate() {
        let store = Arc::new(MemoryStore::new());
        let mut svc = service(&store, "alice");
        assert!(svc.stats().completion_rate().abs() < f64::EPSILON);

        svc.add_task("h1", "", Priority::High).unwrap();
        svc.add_task("h2", "", Priority::High).unwrap();
        svc.add_task("l1", "", Priority::Low).unwrap();
        let breakdown = svc.priority_breakdown();
        assert_eq!(breakdown.count(Priority::High), 2);
        assert_eq!(breakdown.count(Priority::Medium), 0);
        assert_eq!(breakdown.count(Priority::Low), 1);
    }

    #[test]
    fn test_write_failure_keeps_in_memory_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "x").unwrap();
        let store: Arc<dyn TaskStore> = Arc::new(JsonFileStore::new(&path));
        let mut svc = TaskService::new(store, Identity::new("alice"));

        let result = svc.add_task("Unsaved", "", Priority::Medium);
        assert!(matches!(result, Err(TaskError::StorageWrite { .. })));
        assert_eq!(svc.tasks().len(), 1);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(String, u8),
        Complete(u64),
        Reopen(u64),
        Delete(u64),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            ("[ a-z]{0,8}", 0u8..3).prop_map(|(t, p)| Op::Add(t, p)),
            (1u64..8).prop_map(Op::Complete),
            (1u64..8).prop_map(Op::Reopen),
            (1u64..8).prop_map(Op::Delete),
        ]
    }

    proptest! {
        #[test]
        fn prop_stats_total_is_completed_plus_pending(ops in proptest::collection::vec(op_strategy(), 0..40)) {
            let store = Arc::new(MemoryStore::new());
            let mut svc = service(&store, "prop");
            for op in ops {
                match op {
                    Op::Add(title, p) => {
                        svc.add_task(&title, "", Priority::ALL[usize::from(p)]).unwrap();
                    }
                    Op::Complete(id) => { svc.mark_complete(id).unwrap(); }
                    Op::Reopen(id) => { svc.mark_incomplete(id).unwrap(); }
                    Op::Delete(id) => { svc.delete_task(id).unwrap(); }
                }
                let stats = svc.stats();
                prop_assert_eq!(stats.total, stats.completed + stats.pending);
                for task in svc.tasks() {
                    prop_assert_eq!(task.completed, task.completed_at.is_some());
                }
            }
            prop_assert_eq!(store.load(&Identity::new("prop")), svc.tasks().to_vec());
        }
    }
}
