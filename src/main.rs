//! `tasklist_rust` (tl) - File-backed personal task list
//!
//! Serves the web UI with `tl serve`; the other commands work on the same
//! task file from the terminal.

use tasklist_rust::run;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
