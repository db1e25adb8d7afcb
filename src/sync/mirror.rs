//! Mirror a source tree onto a destination tree
//!
//! After [`mirror`] the destination holds exactly the source's files, except
//! under excluded prefixes, which are neither written nor deleted.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::{Result, sync};
use crate::hash;

/// What a mirror pass changed
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MirrorReport {
    /// Files created or overwritten, relative to the destination
    pub written: Vec<PathBuf>,
    /// Files and directories removed, relative to the destination
    pub deleted: Vec<PathBuf>,
    /// Files already identical in the destination
    pub unchanged: usize,
}

fn is_excluded(relative: &Path, excludes: &[PathBuf]) -> bool {
    excludes.iter().any(|prefix| relative.starts_with(prefix))
}

fn relative_to<'a>(entry: &'a DirEntry, base: &Path) -> &'a Path {
    entry.path().strip_prefix(base).unwrap_or(entry.path())
}

/// Walk `base` below the root, pruning excluded subtrees
fn walk<'a>(
    base: &'a Path,
    excludes: &'a [PathBuf],
) -> impl Iterator<Item = Result<DirEntry>> + 'a {
    WalkDir::new(base)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| !is_excluded(relative_to(entry, base), excludes))
        .map(move |entry| {
            entry.map_err(|e| {
                let path = e.path().unwrap_or(base).to_path_buf();
                sync::mirror_failed(&path, e)
            })
        })
}

/// Replicate `src` onto `dst`, deleting destination-only paths.
///
/// `excludes` are prefixes relative to both roots.
pub fn mirror(src: &Path, dst: &Path, excludes: &[PathBuf]) -> Result<MirrorReport> {
    let mut report = MirrorReport::default();
    let mut present = HashSet::new();

    fs::create_dir_all(dst).map_err(|e| sync::mirror_failed(dst, e))?;

    for entry in walk(src, excludes) {
        let entry = entry?;
        let relative = relative_to(&entry, src).to_path_buf();
        let target = dst.join(&relative);

        if entry.file_type().is_dir() {
            prepare_directory(&target)?;
        } else if copy_entry(&entry, &target, &relative, excludes)? {
            tracing::debug!(path = %relative.display(), "written");
            report.written.push(relative.clone());
        } else {
            report.unchanged += 1;
        }

        present.insert(relative);
    }

    // Collected up front so removals do not disturb the walk
    let stale: Vec<DirEntry> = walk(dst, excludes)
        .filter(|entry| {
            entry
                .as_ref()
                .map_or(true, |e| !present.contains(relative_to(e, dst)))
        })
        .collect::<Result<_>>()?;

    // Deepest first, so directories are emptied before they are removed
    for entry in stale.iter().rev() {
        let relative = relative_to(entry, dst);
        if remove_entry(entry)? {
            tracing::debug!(path = %relative.display(), "deleted");
            report.deleted.push(relative.to_path_buf());
        }
    }

    Ok(report)
}

/// Make `target` a directory, replacing a file in its way
fn prepare_directory(target: &Path) -> Result<()> {
    match fs::symlink_metadata(target) {
        Ok(metadata) if metadata.is_dir() => return Ok(()),
        Ok(_) => fs::remove_file(target).map_err(|e| sync::mirror_failed(target, e))?,
        Err(_) => {}
    }
    fs::create_dir_all(target).map_err(|e| sync::mirror_failed(target, e))
}

/// Copy one non-directory entry; returns whether the destination changed
fn copy_entry(
    entry: &DirEntry,
    target: &Path,
    relative: &Path,
    excludes: &[PathBuf],
) -> Result<bool> {
    let existing = fs::symlink_metadata(target).ok();

    if let Some(metadata) = &existing {
        if metadata.is_dir() {
            // Replacing a directory must not take excluded paths with it
            if excludes.iter().any(|prefix| prefix.starts_with(relative)) {
                return Err(sync::mirror_failed(
                    target,
                    "source file would replace a directory holding excluded paths",
                ));
            }
            fs::remove_dir_all(target).map_err(|e| sync::mirror_failed(target, e))?;
        } else if entry.file_type().is_file()
            && metadata.is_file()
            && hash::same_contents(entry.path(), target)?
        {
            return Ok(false);
        } else if metadata.file_type().is_symlink() || entry.file_type().is_symlink() {
            fs::remove_file(target).map_err(|e| sync::mirror_failed(target, e))?;
        }
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| sync::mirror_failed(parent, e))?;
    }

    if entry.file_type().is_symlink() {
        copy_symlink(entry.path(), target)?;
    } else {
        fs::copy(entry.path(), target).map_err(|e| sync::mirror_failed(target, e))?;
    }
    Ok(true)
}

#[cfg(unix)]
fn copy_symlink(src: &Path, target: &Path) -> Result<()> {
    let link = fs::read_link(src).map_err(|e| sync::mirror_failed(src, e))?;
    std::os::unix::fs::symlink(link, target).map_err(|e| sync::mirror_failed(target, e))
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, target: &Path) -> Result<()> {
    fs::copy(src, target).map_err(|e| sync::mirror_failed(target, e))?;
    Ok(())
}

/// Remove a stale entry; a directory still holding excluded paths stays
fn remove_entry(entry: &DirEntry) -> Result<bool> {
    let path = entry.path();
    if entry.file_type().is_dir() {
        let is_empty = fs::read_dir(path)
            .map_err(|e| sync::mirror_failed(path, e))?
            .next()
            .is_none();
        if !is_empty {
            return Ok(false);
        }
        fs::remove_dir(path).map_err(|e| sync::mirror_failed(path, e))?;
    } else {
        fs::remove_file(path).map_err(|e| sync::mirror_failed(path, e))?;
    }
    Ok(true)
}
