//! Filter and sort options for task list views.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TaskError;
use crate::model::{Priority, Task};

/// Ordering applied to a task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Newest first.
    #[default]
    Created,
    /// High, then Medium, then Low.
    Priority,
    /// Case-insensitive A to Z.
    Title,
}

impl SortKey {
    pub const ALL: [Self; 3] = [Self::Created, Self::Priority, Self::Title];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Priority => "priority",
            Self::Title => "title",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Created => "Created Date",
            Self::Priority => "Priority",
            Self::Title => "Title",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "created" | "created_at" | "created date" | "date" => Ok(Self::Created),
            "priority" => Ok(Self::Priority),
            "title" => Ok(Self::Title),
            other => Err(TaskError::InvalidSort {
                sort: other.to_string(),
            }),
        }
    }
}

/// Parse a priority filter where `"All"` (or an empty value) means no filter.
///
/// # Errors
///
/// Returns `InvalidPriority` for anything other than All/Low/Medium/High.
pub fn parse_priority_filter(raw: &str) -> Result<Option<Priority>, TaskError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
        Ok(None)
    } else {
        trimmed.parse().map(Some)
    }
}

/// Filter options for listing tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFilters {
    pub include_completed: bool,
    /// `None` shows every priority.
    pub priority: Option<Priority>,
    pub sort: SortKey,
}

impl Default for ListFilters {
    fn default() -> Self {
        Self {
            include_completed: true,
            priority: None,
            sort: SortKey::default(),
        }
    }
}

impl ListFilters {
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if !self.include_completed && task.completed {
            return false;
        }
        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }
        true
    }

    /// Filter then sort. Sorting is stable, so ties keep their input order.
    #[must_use]
    pub fn apply<'a>(&self, tasks: impl IntoIterator<Item = &'a Task>) -> Vec<&'a Task> {
        let mut results: Vec<&Task> = tasks.into_iter().filter(|t| self.matches(t)).collect();
        sort_tasks(&mut results, self.sort);
        results
    }
}

/// Sort tasks in place by `sort`.
pub fn sort_tasks(tasks: &mut [&Task], sort: SortKey) {
    match sort {
        SortKey::Created => {
            tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }
        SortKey::Priority => {
            tasks.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank()));
        }
        SortKey::Title => {
            tasks.sort_by_cached_key(|t| t.title.to_lowercase());
        }
    }
}
