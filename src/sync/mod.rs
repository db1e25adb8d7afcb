//! Tree synchronization
//!
//! The selected repository is cloned into a scoped scratch directory and then
//! mirrored onto the agent root. Excluded prefixes (the control directory and
//! `.git` by default) survive untouched; everything else ends up matching the
//! clone exactly.

pub mod clone;
pub mod mirror;
pub mod scratch;

use std::path::{Path, PathBuf};

pub use mirror::MirrorReport;
pub use scratch::ScratchDir;

use crate::error::Result;

/// Clone `url` into `scratch_dir` and mirror it onto `root`.
///
/// A clone failure aborts before the root is touched. The scratch directory
/// is removed on return in every case.
pub fn synchronize(
    url: &str,
    scratch_dir: &Path,
    root: &Path,
    excludes: &[PathBuf],
) -> Result<MirrorReport> {
    let scratch = ScratchDir::acquire(scratch_dir)?;
    clone::clone_repository(url, scratch.path())?;

    let report = mirror::mirror(scratch.path(), root, excludes)?;
    tracing::info!(
        written = report.written.len(),
        deleted = report.deleted.len(),
        unchanged = report.unchanged,
        "mirrored"
    );
    Ok(report)
}
