//! Clone through the external `git` command

use std::path::Path;
use std::process::Command;

use crate::error::{Result, sync};

/// `git clone --depth 1 <url> <target>`, blocking until it exits.
///
/// Any non-zero exit is an error carrying git's stderr.
pub fn clone_repository(url: &str, target: &Path) -> Result<()> {
    tracing::info!(url, target = %target.display(), "cloning");

    let output = Command::new("git")
        .args(["clone", "--quiet", "--depth", "1", "--", url])
        .arg(target)
        // Unreachable or private repositories must fail, not wait for a password
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .map_err(|e| sync::clone_failed(url, format!("failed to run git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(sync::clone_failed(
            url,
            format!("{}: {}", output.status, stderr.trim()),
        ));
    }

    Ok(())
}
