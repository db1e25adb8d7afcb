//! Command implementations for the Wanderer CLI

pub mod completions;
pub mod merge;
pub mod pick;
pub mod run;
pub mod version;

use std::path::{Path, PathBuf};

use crate::error::{Result, WandererError, fs, git};

/// Resolve the agent root.
///
/// An explicit root is used as given. Otherwise the working directory of the
/// git repository enclosing `start` is used.
pub fn resolve_root(root: Option<PathBuf>, start: &Path) -> Result<PathBuf> {
    if let Some(root) = root {
        return dunce::canonicalize(&root).map_err(|e| fs::read_failed(&root, e));
    }

    let repo = match git2::Repository::discover(start) {
        Ok(repo) => repo,
        Err(e) if e.code() == git2::ErrorCode::NotFound => {
            return Err(WandererError::NotInGitRepository);
        }
        Err(e) => return Err(e.into()),
    };
    let workdir = repo
        .workdir()
        .ok_or_else(|| git::operation_failed("repository has no working tree"))?;
    dunce::canonicalize(workdir).map_err(|e| fs::read_failed(workdir, e))
}

/// Current directory as the default discovery start
pub fn current_dir() -> Result<PathBuf> {
    std::env::current_dir()
        .map_err(|e| fs::io_error(format!("Failed to get current directory: {e}")))
}
