//! Add command implementation.

use anyhow::Result;
use tasklist_lib::{Priority, TaskError};

use super::print_json;
use crate::cli::{AddArgs, CommandContext};
use crate::format::format_task_line;

/// Execute the add command.
///
/// # Errors
///
/// Returns an error if sign-in fails, the title is blank, the priority is
/// unknown, or the task file cannot be written.
pub fn execute(args: &AddArgs, ctx: &CommandContext) -> Result<()> {
    let priority: Priority = args.priority.parse()?;
    let mut session = ctx.session()?;
    let service = session.service_mut()?;

    if !service.add_task(&args.title, &args.description, priority)? {
        return Err(TaskError::validation("title", "Please enter a task title!").into());
    }

    // The new task is always the highest id.
    let Some(task) = service.tasks().iter().max_by_key(|t| t.id) else {
        return Ok(());
    };

    if ctx.json {
        return print_json(task);
    }

    println!("✅ Task '{}' added successfully!", task.title);
    println!("{}", format_task_line(task));
    Ok(())
}
