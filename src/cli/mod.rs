//! Command-line interface for `tasklist_rust`.
//!
//! This module provides the CLI parsing and command routing using clap.

pub mod commands;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tasklist_lib::{JsonFileStore, Session, TaskStore};

use crate::config::{self, CliOverrides, Config};
use crate::logging;

/// `tasklist_rust` (tl) - File-backed task list with a web UI.
#[derive(Parser, Debug)]
#[command(name = "tl")]
#[command(
    author,
    version,
    about = "File-backed personal task list with a server-rendered web UI",
    long_about = None,
    after_help = "Identity is taken from --email as entered; there is no password check."
)]
pub struct Cli {
    /// Output format: text (default) or json
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (default: ./tasklist.yaml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Shared task file
    #[arg(long, global = true, value_name = "PATH")]
    pub data_file: Option<PathBuf>,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Display name used to sign in
    #[arg(long, global = true, env = "TASKLIST_NAME")]
    pub name: Option<String>,

    /// Email used to sign in; selects whose tasks are used
    #[arg(long, global = true, env = "TASKLIST_EMAIL")]
    pub email: Option<String>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a config template and an empty task file
    Init(InitArgs),

    /// Run the web UI
    Serve(ServeArgs),

    /// Add a task
    Add(AddArgs),

    /// List tasks
    List(ListArgs),

    /// Mark a task complete
    #[command(alias = "complete")]
    Done(IdArgs),

    /// Mark a task incomplete
    #[command(alias = "reopen")]
    Undo(IdArgs),

    /// Delete a task
    #[command(alias = "rm")]
    Delete(IdArgs),

    /// Task statistics
    Stats,

    /// Show the identity derived from --email
    Whoami,

    /// Show version information
    Version,
}

#[derive(Args, Debug, Default)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Args, Debug, Default)]
pub struct AddArgs {
    /// Task title
    pub title: String,

    /// Optional description
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Priority: low, medium or high
    #[arg(short, long, default_value = "medium")]
    pub priority: String,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Hide completed tasks
    #[arg(long)]
    pub hide_completed: bool,

    /// Priority filter: all, low, medium or high
    #[arg(short, long)]
    pub priority: Option<String>,

    /// Sort by: created, priority or title
    #[arg(short, long)]
    pub sort: Option<String>,
}

#[derive(Args, Debug)]
pub struct IdArgs {
    /// Task id
    pub id: u64,
}

/// Resolved settings shared by every command.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: Config,
    pub json: bool,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl CommandContext {
    /// Store for the configured data file.
    #[must_use]
    pub fn store(&self) -> Arc<dyn TaskStore> {
        Arc::new(JsonFileStore::new(&self.config.data_file))
    }

    /// Sign in with `--name`/`--email` the same way the login form does.
    ///
    /// # Errors
    ///
    /// Returns a validation error if either value is missing or blank.
    pub fn session(&self) -> Result<Session> {
        let mut session = Session::new();
        session
            .sign_in(
                self.name.as_deref().unwrap_or_default(),
                self.email.as_deref().unwrap_or_default(),
                self.store(),
            )
            .context("sign-in requires --name and --email (or TASKLIST_NAME / TASKLIST_EMAIL)")?;
        Ok(session)
    }
}

/// Run the CLI.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    let overrides = match cli.command {
        Some(Commands::Serve(ref args)) => CliOverrides {
            data_file: cli.data_file.clone(),
            host: args.host.clone(),
            port: args.port,
        },
        _ => CliOverrides {
            data_file: cli.data_file.clone(),
            ..Default::default()
        },
    };
    let config = config::load(cli.config.as_deref(), &overrides)?;

    let ctx = CommandContext {
        config,
        json: cli.json,
        name: cli.name,
        email: cli.email,
    };

    match cli.command {
        Some(Commands::Init(args)) => commands::init::execute(&args, &ctx),
        Some(Commands::Serve(_)) => commands::serve::execute(&ctx),
        Some(Commands::Add(args)) => commands::add::execute(&args, &ctx),
        Some(Commands::List(args)) => commands::list::execute(&args, &ctx),
        Some(Commands::Done(args)) => {
            commands::update::execute(args.id, commands::update::Action::Complete, &ctx)
        }
        Some(Commands::Undo(args)) => {
            commands::update::execute(args.id, commands::update::Action::Reopen, &ctx)
        }
        Some(Commands::Delete(args)) => {
            commands::update::execute(args.id, commands::update::Action::Delete, &ctx)
        }
        Some(Commands::Stats) => commands::stats::execute(&ctx),
        Some(Commands::Whoami) => commands::whoami::execute(&ctx),
        Some(Commands::Version) => commands::version::execute(&ctx),
        None => {
            println!("tl - file-backed task list. Use --help for usage.");
            Ok(())
        }
    }
}
