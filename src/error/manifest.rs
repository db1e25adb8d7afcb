//! Local dependency manifest errors

use std::path::Path;

use super::WandererError;

/// Creates a manifest read failed error
pub fn read_failed(path: &Path, reason: impl ToString) -> WandererError {
    WandererError::ManifestReadFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates an invalid manifest error
pub fn invalid(path: &Path, reason: impl ToString) -> WandererError {
    WandererError::ManifestInvalid {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates a manifest write failed error
pub fn write_failed(path: &Path, reason: impl ToString) -> WandererError {
    WandererError::ManifestWriteFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}
