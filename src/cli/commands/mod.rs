//! Command implementations.

pub mod add;
pub mod init;
pub mod list;
pub mod serve;
pub mod stats;
pub mod update;
pub mod version;
pub mod whoami;

use anyhow::Result;
use serde::Serialize;

/// Print a value as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
