//! Text formatting functions for `tasklist_rust`.
//!
//! Provides plain text formatting shared by the terminal and the web views:
//! - Status icons (✅ ⏳)
//! - Priority markers (🔴 🟡 🟢)
//! - Task line and metadata formatting

use chrono::{DateTime, Local, Utc};
use tasklist_lib::{Priority, Task};

/// Status and priority marker characters.
pub mod icons {
    /// Completed task.
    pub const COMPLETED: &str = "✅";
    /// Pending task.
    pub const PENDING: &str = "⏳";
    /// High priority.
    pub const HIGH: &str = "🔴";
    /// Medium priority.
    pub const MEDIUM: &str = "🟡";
    /// Low priority.
    pub const LOW: &str = "🟢";
}

#[must_use]
pub const fn format_status_icon(completed: bool) -> &'static str {
    if completed {
        icons::COMPLETED
    } else {
        icons::PENDING
    }
}

#[must_use]
pub const fn format_priority_icon(priority: Priority) -> &'static str {
    match priority {
        Priority::High => icons::HIGH,
        Priority::Medium => icons::MEDIUM,
        Priority::Low => icons::LOW,
    }
}

/// Format a timestamp as local `YYYY-MM-DD HH:MM`.
#[must_use]
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Format a ratio in `[0, 1]` as a percentage with one decimal.
#[must_use]
pub fn format_percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Format a single-line task summary.
///
/// Format: `{status} #{id} {title} {priority}`
#[must_use]
pub fn format_task_line(task: &Task) -> String {
    format!(
        "{} #{} {} {}",
        format_status_icon(task.completed),
        task.id,
        task.title,
        format_priority_icon(task.priority),
    )
}

/// Creation and completion times, e.g. `Created: 2024-03-01 09:30 | Completed: ...`.
#[must_use]
pub fn format_task_meta(task: &Task) -> String {
    let created = format!("Created: {}", format_timestamp(&task.created_at));
    match task.completed_at {
        Some(ref done) if task.completed => {
            format!("{created} | Completed: {}", format_timestamp(done))
        }
        _ => created,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tasklist_lib::Identity;

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn make_test_task() -> Task {
        let created = local(2024, 3, 1, 9, 30);
        Task::new(
            7,
            Identity::new("alice_example_com"),
            "Test title",
            "",
            Priority::High,
            created,
        )
    }

    #[test]
    fn test_icons() {
        assert_eq!(format_status_icon(true), "✅");
        assert_eq!(format_status_icon(false), "⏳");
        assert_eq!(format_priority_icon(Priority::High), "🔴");
        assert_eq!(format_priority_icon(Priority::Medium), "🟡");
        assert_eq!(format_priority_icon(Priority::Low), "🟢");
    }

    #[test]
    fn test_format_task_line() {
        assert_eq!(format_task_line(&make_test_task()), "⏳ #7 Test title 🔴");
    }

    #[test]
    fn test_format_task_meta() {
        let mut task = make_test_task();
        assert_eq!(format_task_meta(&task), "Created: 2024-03-01 09:30");

        task.complete(local(2024, 3, 2, 18, 5));
        assert_eq!(
            format_task_meta(&task),
            "Created: 2024-03-01 09:30 | Completed: 2024-03-02 18:05"
        );
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.0), "0.0%");
        assert_eq!(format_percent(0.5), "50.0%");
        assert_eq!(format_percent(2.0 / 3.0), "66.7%");
    }
}
