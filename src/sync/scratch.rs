//! Scoped scratch directory for the clone
//!
//! The scratch directory is acquired before cloning and removed when the
//! guard drops, whether the cycle finished or failed. Ancestors created to
//! hold it are removed again if they end up empty.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, fs as fs_error, sync};

#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    /// Ancestors this guard created, deepest first
    created_dirs: Vec<PathBuf>,
}

impl ScratchDir {
    /// Reserve `path` for a clone.
    ///
    /// The directory itself is left for the clone to create. A leftover from
    /// an interrupted run is reported instead of reused.
    pub fn acquire(path: &Path) -> Result<Self> {
        if path.exists() {
            return Err(sync::scratch_occupied(path));
        }

        let mut created_dirs = Vec::new();
        if let Some(parent) = path.parent() {
            let mut missing: Vec<PathBuf> = parent
                .ancestors()
                .take_while(|dir| !dir.as_os_str().is_empty() && !dir.exists())
                .map(Path::to_path_buf)
                .collect();
            fs::create_dir_all(parent).map_err(|e| fs_error::write_failed(parent, e))?;
            created_dirs.append(&mut missing);
        }

        Ok(Self {
            path: path.to_path_buf(),
            created_dirs,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if self.path.exists() {
            if let Err(e) = fs::remove_dir_all(&self.path) {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to remove scratch directory");
            }
        }

        for dir in &self.created_dirs {
            let is_empty = fs::read_dir(dir)
                .map(|mut entries| entries.next().is_none())
                .unwrap_or(false);
            if is_empty {
                let _ = fs::remove_dir(dir);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WandererError;
    use tempfile::TempDir;

    #[test]
    fn test_removed_on_drop() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".github/scratch");
        std::fs::create_dir_all(temp.path().join(".github")).unwrap();

        {
            let scratch = ScratchDir::acquire(&path).unwrap();
            std::fs::create_dir_all(scratch.path().join("nested")).unwrap();
            std::fs::write(scratch.path().join("nested/file.txt"), "x").unwrap();
        }

        assert!(!path.exists());
        assert!(temp.path().join(".github").is_dir());
    }

    #[test]
    fn test_created_ancestors_removed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ctl/deep/scratch");

        {
            let scratch = ScratchDir::acquire(&path).unwrap();
            assert!(temp.path().join("ctl/deep").is_dir());
            assert!(!scratch.path().exists());
        }

        assert!(!temp.path().join("ctl").exists());
    }

    #[test]
    fn test_occupied_is_reported() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("scratch");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("stale.txt"), "old").unwrap();

        let err = ScratchDir::acquire(&path).unwrap_err();
        assert!(matches!(err, WandererError::ScratchDirOccupied { .. }));
        assert!(path.join("stale.txt").exists());
    }
}
