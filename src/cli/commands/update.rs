//! Done, undo and delete command implementations.

use anyhow::Result;
use serde_json::json;
use tasklist_lib::{TaskError, TaskService};

use super::print_json;
use crate::cli::CommandContext;
use crate::format::format_task_line;

/// Row action applied to a single task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Complete,
    Reopen,
    Delete,
}

impl Action {
    fn apply(self, service: &mut TaskService, id: u64) -> tasklist_lib::Result<bool> {
        match self {
            Self::Complete => service.mark_complete(id),
            Self::Reopen => service.mark_incomplete(id),
            Self::Delete => service.delete_task(id),
        }
    }

    const fn verb(self) -> &'static str {
        match self {
            Self::Complete => "Completed",
            Self::Reopen => "Reopened",
            Self::Delete => "Deleted",
        }
    }
}

/// Execute a row action on task `id`.
///
/// # Errors
///
/// Returns `TaskNotFound` if the signed-in identity has no such task, or an
/// error if the task file cannot be written.
pub fn execute(id: u64, action: Action, ctx: &CommandContext) -> Result<()> {
    let mut session = ctx.session()?;
    let service = session.service_mut()?;

    if !action.apply(service, id)? {
        return Err(TaskError::TaskNotFound { id }.into());
    }

    match (action, service.get(id)) {
        (Action::Delete, _) | (_, None) => {
            if ctx.json {
                return print_json(&json!({ "id": id, "deleted": true }));
            }
            println!("{} task #{id}", action.verb());
        }
        (_, Some(task)) => {
            if ctx.json {
                return print_json(task);
            }
            println!("{} {}", action.verb(), format_task_line(task));
        }
    }
    Ok(())
}
