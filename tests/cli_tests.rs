//! CLI integration tests using the real wanderer binary

mod common;

use common::{TestWorkspace, wanderer_cmd};
use predicates::prelude::*;

#[test]
fn test_help_output() {
    wanderer_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Self-propagating discovery agent"))
        .stdout(predicate::str::contains("replaces its own working tree"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("merge"))
        .stdout(predicate::str::contains("pick"));
}

#[test]
fn test_short_help_output() {
    wanderer_cmd()
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("Self-propagating discovery agent"))
        .stdout(predicate::str::contains("Wanderer picks a random package").not());
}

#[test]
fn test_version_output() {
    wanderer_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("wanderer"))
        .stdout(predicate::str::contains("Build info"));
}

#[test]
fn test_version_outside_repository() {
    let temp = tempfile::TempDir::new().unwrap();
    wanderer_cmd()
        .current_dir(temp.path())
        .arg("version")
        .assert()
        .success();
}

#[test]
fn test_completions_bash() {
    wanderer_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wanderer"));
}

#[test]
fn test_completions_unknown_shell() {
    wanderer_cmd()
        .args(["completions", "tcsh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_run_requires_owner() {
    let workspace = TestWorkspace::new();
    workspace
        .command()
        .args(["run", "--repo", "acme/agent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--owner"));
}

#[test]
fn test_run_requires_token() {
    let workspace = TestWorkspace::new();
    workspace
        .command()
        .env_remove("GITHUB_TOKEN")
        .args(["run", "--owner", "acme", "--repo", "acme/agent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--github"));
}

#[test]
fn test_outside_repository_without_root() {
    let temp = tempfile::TempDir::new().unwrap();
    wanderer_cmd()
        .current_dir(temp.path())
        .args(["run", "--owner", "acme", "--repo", "acme/agent"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: Not in a git repository"));
}

#[test]
fn test_invalid_config_file() {
    let workspace = TestWorkspace::new();
    workspace.write_file(".github/wanderer.yaml", "page_size: 10\nunknown_key: true\n");

    workspace
        .command()
        .args(["run", "--owner", "acme", "--repo", "acme/agent"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse configuration file"));
}

#[test]
fn test_invalid_page_size() {
    let workspace = TestWorkspace::new();

    workspace
        .command()
        .args(["pick", "--page-size", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("page_size must be between 1 and 250"));
}
