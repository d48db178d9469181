//! Init command implementation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tasklist_lib::json_file;
use tracing::info;

use crate::cli::{CommandContext, InitArgs};
use crate::config::{CONFIG_TEMPLATE, DEFAULT_CONFIG_FILE};

/// Execute the init command.
///
/// Writes `tasklist.yaml` in the current directory and creates an empty task
/// file at the configured path if none exists yet.
///
/// # Errors
///
/// Returns an error if the config already exists (without `--force`) or a
/// file cannot be written.
pub fn execute(args: &InitArgs, ctx: &CommandContext) -> Result<()> {
    let config_path = Path::new(DEFAULT_CONFIG_FILE);
    if config_path.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }
    fs::write(config_path, CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    info!(path = %config_path.display(), "wrote config template");

    let data_file = &ctx.config.data_file;
    let created_data = if data_file.exists() {
        false
    } else {
        json_file::save(data_file, &[])?;
        true
    };

    if ctx.json {
        return super::print_json(&serde_json::json!({
            "config": config_path,
            "data_file": data_file,
            "created_data_file": created_data,
        }));
    }

    println!("Wrote {}", config_path.display());
    if created_data {
        println!("Created empty task file {}", data_file.display());
    }
    Ok(())
}
