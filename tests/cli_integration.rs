//! CLI integration tests for tasktree
//!
//! These tests drive the binary against a task file in a temp directory,
//! checking that commands persist their effects for the next invocation.

use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Get a command instance for the tasktree binary, isolated from user config
fn tasktree_cmd(dir: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("tasktree"));
    cmd.env("XDG_CONFIG_HOME", dir.join("config"))
        .env_remove("TASKTREE_FILE")
        .env_remove("RUST_LOG")
        .arg("--file")
        .arg(dir.join("tasks.jsonl"));
    cmd
}

/// Create a temporary directory holding a seeded task file
fn setup() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    tasktree_cmd(dir.path()).arg("init").assert().success();
    let file = dir.path().join("tasks.jsonl");
    (dir, file)
}

fn show_json(dir: &Path, task: &str) -> serde_json::Value {
    let output = tasktree_cmd(dir)
        .args(["--format", "json", "show", task])
        .output()
        .unwrap();
    assert!(output.status.success(), "show {} failed", task);
    serde_json::from_slice(&output.stdout).unwrap()
}

// =============================================================================
// Initialization Tests
// =============================================================================

#[test]
fn test_init_writes_seed_tree() {
    let dir = TempDir::new().unwrap();

    tasktree_cmd(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized task file"));

    let content = fs::read_to_string(dir.path().join("tasks.jsonl")).unwrap();
    let first: serde_json::Value = serde_json::from_str(content.lines().next().unwrap()).unwrap();

    assert_eq!(first["name"], "My Life");
    assert_eq!(content.lines().count(), 9);
}

#[test]
fn test_init_keeps_existing_tasks() {
    let (dir, file) = setup();

    tasktree_cmd(dir.path())
        .args(["add", "root", "Garden"])
        .assert()
        .success();
    tasktree_cmd(dir.path()).arg("init").assert().success();

    let content = fs::read_to_string(file).unwrap();
    assert!(content.contains("Garden"));
}

#[test]
fn test_corrupt_file_falls_back_to_seed() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("tasks.jsonl"), "not json\n").unwrap();

    tasktree_cmd(dir.path())
        .arg("tree")
        .assert()
        .success()
        .stdout(predicate::str::contains("My Life"));
}

// =============================================================================
// Query Tests
// =============================================================================

#[test]
fn test_tree_lists_seed() {
    let (dir, _) = setup();

    tasktree_cmd(dir.path())
        .arg("tree")
        .assert()
        .success()
        .stdout(predicate::str::contains("My Life *"))
        .stdout(predicate::str::contains("  [ ] Work"))
        .stdout(predicate::str::contains("    [ ] Breakfast"));
}

#[test]
fn test_tree_json_nests_children() {
    let (dir, _) = setup();

    let output = tasktree_cmd(dir.path())
        .args(["--format", "json", "tree", "Meals"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let tree: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(tree["name"], "Meals");
    assert_eq!(tree["children"].as_array().unwrap().len(), 3);
}

#[test]
fn test_show_unknown_task_fails() {
    let (dir, _) = setup();

    tasktree_cmd(dir.path())
        .args(["show", "Nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task not found: Nope"));
}

#[test]
fn test_search_ranks_prefix_first() {
    let (dir, _) = setup();

    let output = tasktree_cmd(dir.path())
        .args(["--format", "json", "search", "l"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let hits: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<_> = hits
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["name"].as_str().unwrap().to_string())
        .collect();

    assert_eq!(names, vec!["Lunch", "Clean", "Meals"]);
}

#[test]
fn test_search_excludes_scope() {
    let (dir, _) = setup();

    tasktree_cmd(dir.path())
        .args(["search", "meal", "--scope", "Meals"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks match"));
}

// =============================================================================
// Editing Tests
// =============================================================================

#[test]
fn test_add_creates_child() {
    let (dir, _) = setup();

    tasktree_cmd(dir.path())
        .args(["add", "Home", "Laundry"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created task: Laundry"));

    let home = show_json(dir.path(), "Home");
    assert_eq!(home["active_children"].as_array().unwrap().len(), 3);
}

#[test]
fn test_add_rejects_empty_name() {
    let (dir, _) = setup();

    tasktree_cmd(dir.path())
        .args(["add", "root", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be empty"));
}

#[test]
fn test_link_shares_task_between_parents() {
    let (dir, _) = setup();

    tasktree_cmd(dir.path())
        .args(["link", "Home", "Lunch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Linked Lunch under Home"));

    let lunch = show_json(dir.path(), "Lunch");
    assert_eq!(lunch["parents"].as_array().unwrap().len(), 2);
}

#[test]
fn test_link_cycle_fails() {
    let (dir, _) = setup();

    tasktree_cmd(dir.path())
        .args(["link", "Yardwork", "Home"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("would create a cycle"));
}

#[test]
fn test_remove_detaches_child() {
    let (dir, _) = setup();

    tasktree_cmd(dir.path())
        .args(["remove", "Meals", "Dinner"])
        .assert()
        .success();

    tasktree_cmd(dir.path())
        .args(["show", "Dinner"])
        .assert()
        .failure();
}

#[test]
fn test_move_out_of_range_fails() {
    let (dir, _) = setup();

    tasktree_cmd(dir.path())
        .args(["move", "Home", "0", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn test_deactivate_cascades_to_children() {
    let (dir, _) = setup();

    tasktree_cmd(dir.path())
        .args(["deactivate", "Home"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Home is now inactive"));

    assert_eq!(show_json(dir.path(), "Yardwork")["active"], false);
    assert_eq!(show_json(dir.path(), "Clean")["active"], false);

    let root = show_json(dir.path(), "root");
    let inactive = root["inactive_children"].as_array().unwrap();
    assert_eq!(inactive.len(), 1);
    assert_eq!(inactive[0], show_json(dir.path(), "Home")["id"]);
}

#[test]
fn test_deactivating_last_child_of_selected_parent() {
    let (dir, _) = setup();

    // Home sits at index 1 under the root
    tasktree_cmd(dir.path())
        .args(["select", "root", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Selected Home"));

    tasktree_cmd(dir.path()).args(["deactivate", "Yardwork"]).assert().success();
    assert_eq!(show_json(dir.path(), "Home")["active"], true);

    tasktree_cmd(dir.path()).args(["deactivate", "Clean"]).assert().success();
    assert_eq!(show_json(dir.path(), "Home")["active"], false);
    assert_eq!(show_json(dir.path(), "root")["active"], true);
}

#[test]
fn test_activate_already_active_is_noop() {
    let (dir, file) = setup();
    let before = fs::read_to_string(&file).unwrap();

    tasktree_cmd(dir.path())
        .args(["activate", "Work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Work is already active"));

    assert_eq!(fs::read_to_string(&file).unwrap(), before);
}

#[test]
fn test_rename_plain() {
    let (dir, _) = setup();

    tasktree_cmd(dir.path())
        .args(["rename", "Work", "Job"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Renamed"));

    tasktree_cmd(dir.path()).args(["show", "Job"]).assert().success();
}

#[test]
fn test_rename_merges_into_existing_task() {
    let (dir, _) = setup();

    tasktree_cmd(dir.path())
        .args(["rename", "Work", "Lunch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Merged"));

    let lunch = show_json(dir.path(), "Lunch");
    assert_eq!(lunch["parents"].as_array().unwrap().len(), 2);

    // The renamed task was detached and is no longer stored
    tasktree_cmd(dir.path()).args(["show", "Work"]).assert().failure();
}

#[test]
fn test_rename_sibling_collision_is_a_noop() {
    let (dir, _) = setup();

    tasktree_cmd(dir.path())
        .args(["rename", "Work", "Home"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing renamed"));

    tasktree_cmd(dir.path()).args(["show", "Work"]).assert().success();
    tasktree_cmd(dir.path()).args(["show", "Home"]).assert().success();
}

#[test]
fn test_rename_sibling_collision_json_reports_rejection() {
    let (dir, _) = setup();

    let output = tasktree_cmd(dir.path())
        .args(["--format", "json", "rename", "Work", "Home"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["outcome"], "rejected");
}

#[test]
fn test_clear_unselects_descendants() {
    let (dir, _) = setup();

    tasktree_cmd(dir.path()).args(["select", "root", "2"]).assert().success();
    assert_eq!(show_json(dir.path(), "Meals")["selected"], true);

    tasktree_cmd(dir.path()).args(["clear", "root"]).assert().success();
    assert_eq!(show_json(dir.path(), "Meals")["selected"], false);
}
