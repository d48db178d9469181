//! Logging setup for `tasklist_rust`.
//!
//! `RUST_LOG` always wins. Without it the level comes from `-v`/`-q`.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Arc, Once};

use tracing_subscriber::EnvFilter;

/// Map CLI verbosity flags to a default filter directive.
#[must_use]
pub const fn default_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// Logs go to stderr, or are appended to `log_file` when one is given.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a global subscriber
/// is already installed.
pub fn init_logging(
    verbose: u8,
    quiet: bool,
    log_file: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose, quiet)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder
            .with_ansi(false)
            .with_writer(Arc::new(file))
            .try_init()?;
    } else {
        builder.with_writer(std::io::stderr).try_init()?;
    }

    Ok(())
}

static TEST_LOGGING: Once = Once::new();

/// Install a test-friendly subscriber once per process.
pub fn init_test_logging() {
    TEST_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    });
}
