//! `tasklist_rust` - File-backed personal task list
//!
//! This crate provides the `tl` binary: a server-rendered web UI and a
//! terminal front-end over the per-identity task lists in [`tasklist_lib`].
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`config`] - YAML config file, environment and flag layering
//! - [`format`] - Shared text and JSON output formatting
//! - [`logging`] - tracing subscriber setup
//! - [`web`] - axum router, browser sessions and HTML views

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod format;
pub mod logging;
pub mod web;

pub use tasklist_lib;

/// Run the CLI application.
///
/// This is the main entry point called from `main()`.
///
/// # Errors
///
/// Returns an error if command execution fails.
pub fn run() -> anyhow::Result<()> {
    cli::run()
}
