//! Stats command implementation.

use anyhow::Result;
use tasklist_lib::Priority;

use super::print_json;
use crate::cli::CommandContext;
use crate::format::{StatsOutput, format_percent, format_priority_icon};

/// Execute the stats command.
///
/// # Errors
///
/// Returns an error if sign-in fails.
pub fn execute(ctx: &CommandContext) -> Result<()> {
    let session = ctx.session()?;
    let service = session.service()?;
    let output = StatsOutput::new(service.stats(), service.priority_breakdown());

    if ctx.json {
        return print_json(&output);
    }

    let stats = &output.stats;
    println!("Total Tasks: {}", stats.total);
    println!("Completed:   {}", stats.completed);
    println!("Pending:     {}", stats.pending);
    println!("Completion Rate: {}", format_percent(output.completion_rate));

    if stats.total > 0 {
        println!();
        println!("Priority Breakdown:");
        for priority in Priority::ALL.iter().rev() {
            println!(
                "  {} {}: {}",
                format_priority_icon(*priority),
                priority.as_str(),
                output.by_priority.count(*priority)
            );
        }
    }
    Ok(())
}
