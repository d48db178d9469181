mod common;
use common::cli::{TlWorkspace, run_tl};

#[test]
fn test_init_writes_config_and_data_file() {
    let workspace = TlWorkspace::new();
    let init = run_tl(&workspace, ["init"], "init");
    assert!(init.status.success(), "init failed: {}", init.stderr);
    assert!(workspace.root.join("tasklist.yaml").exists());
    assert_eq!(workspace.read_data(), serde_json::json!([]));

    let again = run_tl(&workspace, ["init"], "init_again");
    assert!(!again.status.success());
    assert!(again.stderr.contains("already exists"));

    let forced = run_tl(&workspace, ["init", "--force"], "init_force");
    assert!(forced.status.success(), "{}", forced.stderr);
}

#[test]
fn test_config_file_selects_data_file() {
    let workspace = TlWorkspace::new();
    workspace.write_file("tasklist.yaml", "data_file: store/custom.json\n");

    let add = run_tl(&workspace, ["add", "Configured"], "add");
    assert!(add.status.success(), "{}", add.stderr);
    assert!(workspace.root.join("store/custom.json").exists());
    assert!(!workspace.data_file().exists());
}

#[test]
fn test_data_file_flag_overrides_config() {
    let workspace = TlWorkspace::new();
    workspace.write_file("tasklist.yaml", "data_file: from-config.json\n");

    let add = run_tl(
        &workspace,
        ["--data-file", "from-flag.json", "add", "Flagged"],
        "add",
    );
    assert!(add.status.success(), "{}", add.stderr);
    assert!(workspace.root.join("from-flag.json").exists());
    assert!(!workspace.root.join("from-config.json").exists());
}

#[test]
fn test_invalid_config_is_an_error() {
    let workspace = TlWorkspace::new();
    workspace.write_file("tasklist.yaml", "server: [not, a, map]\n");

    let list = run_tl(&workspace, ["list"], "list");
    assert!(!list.status.success());
    assert!(list.stderr.contains("Invalid config"), "{}", list.stderr);
}

#[test]
fn test_help_lists_commands() {
    use assert_cmd::Command;
    use predicates::prelude::*;

    Command::cargo_bin("tl")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("serve")
                .and(predicate::str::contains("stats"))
                .and(predicate::str::contains("whoami")),
        );
}
