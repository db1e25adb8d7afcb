//! Clone and mirror errors

use std::path::Path;

use super::WandererError;

/// Creates a clone failed error
pub fn clone_failed(url: impl Into<String>, reason: impl ToString) -> WandererError {
    WandererError::CloneFailed {
        url: url.into(),
        reason: reason.to_string(),
    }
}

/// Creates a scratch directory occupied error
pub fn scratch_occupied(path: &Path) -> WandererError {
    WandererError::ScratchDirOccupied {
        path: path.display().to_string(),
    }
}

/// Creates a mirror failed error
pub fn mirror_failed(path: &Path, reason: impl ToString) -> WandererError {
    WandererError::MirrorFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}
