//! Serve command implementation.

use anyhow::{Context, Result};

use crate::cli::CommandContext;
use crate::web;

/// Run the web UI until the process is stopped.
///
/// # Errors
///
/// Returns an error if the runtime cannot start or the address cannot be bound.
pub fn execute(ctx: &CommandContext) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(web::serve(&ctx.config.server, ctx.store()))
}
