//! Version command implementation.

use anyhow::Result;
use serde::Serialize;

use super::print_json;
use crate::cli::CommandContext;

#[derive(Serialize)]
struct VersionOutput<'a> {
    version: &'a str,
    build: &'a str,
}

/// Execute the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(ctx: &CommandContext) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    let build = if cfg!(debug_assertions) {
        "dev"
    } else {
        "release"
    };

    if ctx.json {
        return print_json(&VersionOutput { version, build });
    }

    println!("tl version {version} ({build})");
    Ok(())
}
