//! Whoami command implementation.

use anyhow::Result;

use super::print_json;
use crate::cli::CommandContext;

/// Print the signed-in user and derived identity key.
///
/// # Errors
///
/// Returns an error if sign-in fails.
pub fn execute(ctx: &CommandContext) -> Result<()> {
    let session = ctx.session()?;
    let Some(user) = session.user() else {
        return Ok(());
    };

    if ctx.json {
        return print_json(user);
    }

    println!("{} <{}>", user.name, user.email);
    println!("identity: {}", user.identity);
    println!("avatar: {}", user.avatar_url);
    println!("data file: {}", ctx.config.data_file.display());
    Ok(())
}
