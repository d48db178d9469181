use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use assert_cmd::Command;
use tempfile::TempDir;

/// Scratch directory that `tl` runs in; the task file lives inside it.
pub struct TlWorkspace {
    pub temp_dir: TempDir,
    pub root: PathBuf,
}

impl TlWorkspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let root = temp_dir.path().to_path_buf();
        Self { temp_dir, root }
    }

    pub fn data_file(&self) -> PathBuf {
        self.root.join("tasks.json")
    }

    pub fn read_data(&self) -> serde_json::Value {
        let raw = std::fs::read_to_string(self.data_file()).expect("read tasks.json");
        serde_json::from_str(&raw).expect("parse tasks.json")
    }

    pub fn write_file(&self, name: impl AsRef<Path>, contents: &str) {
        std::fs::write(self.root.join(name), contents).expect("write file");
    }
}

pub struct TlOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl TlOutput {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout)
            .unwrap_or_else(|e| panic!("stdout is not JSON ({e}): {}", self.stdout))
    }
}

/// Run `tl` as Alice.
pub fn run_tl<I, S>(workspace: &TlWorkspace, args: I, label: &str) -> TlOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    run_tl_as(workspace, "Alice", "alice@example.com", args, label)
}

/// Run `tl` signed in as `name`/`email`.
pub fn run_tl_as<I, S>(
    workspace: &TlWorkspace,
    name: &str,
    email: &str,
    args: I,
    label: &str,
) -> TlOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    let mut cmd = Command::cargo_bin("tl").expect("tl binary");
    cmd.current_dir(&workspace.root)
        .env_remove("TASKLIST_DATA_FILE")
        .env_remove("TASKLIST_HOST")
        .env_remove("TASKLIST_PORT")
        .env_remove("RUST_LOG")
        .env("TASKLIST_NAME", name)
        .env("TASKLIST_EMAIL", email)
        .args(args);

    let output = cmd.output().expect("run tl");
    let result = TlOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    if !result.status.success() {
        eprintln!("[{label}] stderr: {}", result.stderr);
    }
    result
}
