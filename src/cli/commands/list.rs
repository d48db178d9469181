//! List command implementation.

use anyhow::Result;
use tasklist_lib::{ListFilters, SortKey, query::parse_priority_filter};

use super::print_json;
use crate::cli::{CommandContext, ListArgs};
use crate::format::{format_task_line, format_task_meta};

/// Build list filters from CLI arguments.
///
/// # Errors
///
/// Returns an error for an unknown priority filter or sort key.
pub fn build_filters(args: &ListArgs) -> Result<ListFilters> {
    let priority = match args.priority.as_deref() {
        Some(raw) => parse_priority_filter(raw)?,
        None => None,
    };
    let sort = match args.sort.as_deref() {
        Some(raw) => raw.parse::<SortKey>()?,
        None => SortKey::default(),
    };
    Ok(ListFilters {
        include_completed: !args.hide_completed,
        priority,
        sort,
    })
}

/// Execute the list command.
///
/// # Errors
///
/// Returns an error if filters are invalid or sign-in fails.
pub fn execute(args: &ListArgs, ctx: &CommandContext) -> Result<()> {
    let filters = build_filters(args)?;
    let session = ctx.session()?;
    let service = session.service()?;
    let tasks = filters.apply(service.list_tasks(filters.include_completed));

    if ctx.json {
        return print_json(&tasks);
    }

    if tasks.is_empty() {
        println!("No tasks found. Add some tasks to get started!");
        return Ok(());
    }

    for task in &tasks {
        println!("{}", format_task_line(task));
        if !task.description.is_empty() {
            println!("    {}", task.description);
        }
        println!("    {}", format_task_meta(task));
    }
    Ok(())
}
