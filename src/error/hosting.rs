//! Repository hosting API errors

use super::WandererError;

/// Creates a sibling listing failed error
pub fn listing_failed(owner: impl Into<String>, reason: impl ToString) -> WandererError {
    WandererError::SiblingListingFailed {
        owner: owner.into(),
        reason: reason.to_string(),
    }
}

/// Creates a sibling manifest unavailable error
pub fn sibling_unavailable(repo: impl Into<String>, reason: impl ToString) -> WandererError {
    WandererError::SiblingManifestUnavailable {
        repo: repo.into(),
        reason: reason.to_string(),
    }
}

/// Creates an HTTP client build error
pub fn client_failed(reason: impl ToString) -> WandererError {
    WandererError::HttpClientFailed {
        reason: reason.to_string(),
    }
}
