//! Git repository errors

use super::WandererError;

/// Creates a git operation failed error
pub fn operation_failed(message: impl Into<String>) -> WandererError {
    WandererError::GitOperationFailed {
        message: message.into(),
    }
}
