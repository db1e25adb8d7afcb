//! Common test utilities for Wanderer integration tests

#![allow(dead_code)]

use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// An agent tree for integration tests
pub struct TestWorkspace {
    /// Temporary directory
    pub temp: TempDir,
    /// Path to the agent root
    pub path: PathBuf,
}

impl TestWorkspace {
    /// Create an agent root with a control directory and a manifest
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().join("agent");
        std::fs::create_dir_all(path.join(".github")).expect("Failed to create control directory");
        let workspace = Self { temp, path };
        workspace.write_file(
            "package.json",
            r#"{"name":"agent","version":"1.0.0","dependencies":{"x":"^1.0.0"}}"#,
        );
        workspace.write_file(".github/workflows/wander.yml", "on: schedule");
        workspace
    }

    /// Write a file in the agent root
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from the agent root
    pub fn read_file(&self, path: &str) -> String {
        let file_path = self.path.join(path);
        std::fs::read_to_string(&file_path).expect("Failed to read file")
    }

    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// `wanderer --root <agent>` with a token and without inherited log filters
    pub fn command(&self) -> Command {
        let mut cmd = wanderer_cmd();
        cmd.arg("--root").arg(&self.path);
        cmd
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated)]
pub fn wanderer_cmd() -> Command {
    let mut cmd = Command::cargo_bin("wanderer").expect("wanderer binary");
    cmd.env("GITHUB_TOKEN", "test-token").env_remove("RUST_LOG");
    cmd
}

/// Registry search body holding `(name, keywords, repository)` entries
pub fn search_body(packages: &[(&str, &[&str], Option<&str>)]) -> serde_json::Value {
    let objects: Vec<_> = packages
        .iter()
        .map(|(name, keywords, repository)| {
            let mut links = serde_json::Map::new();
            if let Some(repository) = repository {
                links.insert("repository".to_string(), (*repository).into());
            }
            serde_json::json!({
                "package": {"name": name, "keywords": keywords, "links": links}
            })
        })
        .collect();
    serde_json::json!({ "objects": objects, "total": objects.len() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_creation() {
        let workspace = TestWorkspace::new();
        assert!(workspace.file_exists("package.json"));
        assert!(workspace.file_exists(".github/workflows/wander.yml"));
    }

    #[test]
    fn test_search_body() {
        let body = search_body(&[("a", &["k"], Some("https://github.com/o/a"))]);
        assert_eq!(body["objects"][0]["package"]["name"], "a");
        assert_eq!(
            body["objects"][0]["package"]["links"]["repository"],
            "https://github.com/o/a"
        );
    }
}
