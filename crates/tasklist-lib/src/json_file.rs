//! JSON document I/O for the shared task file.
//!
//! The whole file is a single pretty-printed JSON array holding the tasks of
//! every identity. Records are decoded one at a time, so a record that does
//! not fit the task schema is skipped without hiding its neighbours.

use std::fs;
use std::io::{BufReader, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Result, TaskError};
use crate::model::Task;

/// Load the file's records without interpreting them.
///
/// # Errors
///
/// Returns `Io` if the file cannot be opened, or `Json` if it is not a JSON
/// array.
pub fn load_records(path: &Path) -> Result<Vec<Value>> {
    let file = fs::File::open(path)?;
    let records: Vec<Value> = serde_json::from_reader(BufReader::new(file))?;
    Ok(records)
}

/// Load the file's records, treating a missing or unreadable file as empty.
///
/// Read failures are logged and never returned.
#[must_use]
pub fn load_records_or_empty(path: &Path) -> Vec<Value> {
    match load_records(path) {
        Ok(records) => records,
        Err(TaskError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "task file absent; starting empty");
            Vec::new()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "task file unreadable; treating as empty");
            Vec::new()
        }
    }
}

/// Decode each record as a task, skipping (and logging) the ones that don't fit.
#[must_use]
pub fn decode_tasks(records: Vec<Value>) -> Vec<Task> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<Task>(record) {
            Ok(task) => Some(task),
            Err(e) => {
                warn!(index, error = %e, "skipping unreadable task record");
                None
            }
        })
        .collect()
}

/// Load every task in the file.
///
/// # Errors
///
/// Returns `Io` if the file cannot be opened, or `Json` if it is not a JSON
/// array. Individual records that are not tasks are skipped.
pub fn load(path: &Path) -> Result<Vec<Task>> {
    let tasks = decode_tasks(load_records(path)?);
    debug!(path = %path.display(), count = tasks.len(), "loaded task file");
    Ok(tasks)
}

/// Load every task, treating a missing or unreadable file as empty.
#[must_use]
pub fn load_or_empty(path: &Path) -> Vec<Task> {
    decode_tasks(load_records_or_empty(path))
}

/// Write all tasks as an indented JSON array.
///
/// # Errors
///
/// Returns `Io` or `Json` if the file cannot be written.
pub fn save(path: &Path, tasks: &[Task]) -> Result<()> {
    write_document(path, tasks)?;
    debug!(path = %path.display(), count = tasks.len(), "saved task file");
    Ok(())
}

/// Write raw records as an indented JSON array.
///
/// # Errors
///
/// Returns `Io` or `Json` if the file cannot be written.
pub fn save_records(path: &Path, records: &[Value]) -> Result<()> {
    write_document(path, records)?;
    debug!(path = %path.display(), count = records.len(), "saved task file");
    Ok(())
}

/// Non-ASCII text is written as-is. The document goes to a temp sibling first
/// and is then renamed over `path`.
fn write_document<T: Serialize + ?Sized>(path: &Path, document: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = path.with_extension("json.tmp");
    let mut file = fs::File::create(&tmp_path)?;
    serde_json::to_writer_pretty(&mut file, document)?;
    file.flush()?;
    drop(file);

    fs::rename(&tmp_path, path)?;
    Ok(())
}
