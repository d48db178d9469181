//! Output formatting for `tasklist_rust`.
//!
//! Plain text lines for the terminal and the web views, plus the JSON shapes
//! printed with `--json`.

mod output;
mod text;

pub use output::StatsOutput;
pub use text::{
    format_percent, format_priority_icon, format_status_icon, format_task_line,
    format_task_meta, format_timestamp, icons,
};
