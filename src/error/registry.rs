//! Package registry errors

use super::WandererError;

/// Creates a registry request failed error
pub fn request_failed(url: impl Into<String>, reason: impl ToString) -> WandererError {
    WandererError::RegistryRequestFailed {
        url: url.into(),
        reason: reason.to_string(),
    }
}

/// Creates an invalid registry response error
pub fn invalid_response(url: impl Into<String>, reason: impl ToString) -> WandererError {
    WandererError::RegistryResponseInvalid {
        url: url.into(),
        reason: reason.to_string(),
    }
}
