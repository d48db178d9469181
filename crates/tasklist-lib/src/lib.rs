//! `tasklist-lib`: per-identity task lists over a shared JSON file.
//!
//! All identities' tasks live in one JSON array. A [`TaskService`] loads the
//! subset for one identity and writes the merged document back after every
//! change.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use tasklist_lib::{Identity, JsonFileStore, Priority, TaskService};
//!
//! let store = Arc::new(JsonFileStore::new("tasks.json"));
//! let mut tasks = TaskService::new(store, Identity::from_email("alice@example.com"));
//!
//! tasks.add_task("Ship release", "critical", Priority::High).unwrap();
//! tasks.mark_complete(1).unwrap();
//! println!("{:?}", tasks.stats());
//! ```

pub mod error;
pub mod json_file;
pub mod model;
pub mod query;
pub mod service;
pub mod session;
pub mod store;
pub mod util;

pub use error::{Result, TaskError};
pub use model::{Identity, Priority, Task, UserInfo};
pub use query::{ListFilters, SortKey};
pub use service::{PriorityBreakdown, TaskService, TaskStats};
pub use session::Session;
pub use store::{JsonFileStore, MemoryStore, TaskStore};
