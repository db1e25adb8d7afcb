//! Error types and handling for Wanderer
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`registry`]: Package registry errors
//! - [`hosting`]: Repository hosting API errors
//! - [`manifest`]: Local dependency manifest errors
//! - [`sync`]: Clone and mirror errors
//! - [`git`]: Git repository errors
//! - [`config`]: Configuration errors
//! - [`fs`]: File system errors
//!
//! Errors on the critical path (global listing, sibling listing, clone, local
//! manifest) terminate the run. Per-item failures are carried as values by the
//! stages that absorb them and never reach `main`.

pub mod config;
pub mod fs;
pub mod git;
pub mod hosting;
pub mod manifest;
pub mod registry;
pub mod sync;


use miette::Diagnostic;
use thiserror::Error;

/// Main error type for Wanderer operations
#[derive(Error, Diagnostic, Debug)]
pub enum WandererError {
    // Registry errors
    #[error("Registry request failed: {url}: {reason}")]
    #[diagnostic(
        code(wanderer::registry::request_failed),
        help("Check network access to the registry, or point --registry-url at a mirror")
    )]
    RegistryRequestFailed { url: String, reason: String },

    #[error("Registry returned an unexpected response from {url}: {reason}")]
    #[diagnostic(code(wanderer::registry::invalid_response))]
    RegistryResponseInvalid { url: String, reason: String },

    // Hosting errors
    #[error("Failed to list repositories of organization '{owner}': {reason}")]
    #[diagnostic(
        code(wanderer::hosting::listing_failed),
        help("Check that the token passed with --github can read the organization's repositories")
    )]
    SiblingListingFailed { owner: String, reason: String },

    #[error("Manifest of sibling '{repo}' is unavailable: {reason}")]
    #[diagnostic(code(wanderer::hosting::sibling_unavailable))]
    SiblingManifestUnavailable { repo: String, reason: String },

    #[error("Failed to build HTTP client: {reason}")]
    #[diagnostic(code(wanderer::hosting::client_failed))]
    HttpClientFailed { reason: String },

    // Manifest errors
    #[error("Failed to read manifest: {path}: {reason}")]
    #[diagnostic(
        code(wanderer::manifest::read_failed),
        help("The agent root must contain a package.json")
    )]
    ManifestReadFailed { path: String, reason: String },

    #[error("Invalid manifest: {path}: {reason}")]
    #[diagnostic(code(wanderer::manifest::invalid))]
    ManifestInvalid { path: String, reason: String },

    #[error("Failed to write manifest: {path}: {reason}")]
    #[diagnostic(code(wanderer::manifest::write_failed))]
    ManifestWriteFailed { path: String, reason: String },

    // Sync errors
    #[error("Failed to clone repository: {url}: {reason}")]
    #[diagnostic(
        code(wanderer::sync::clone_failed),
        help("Check that git is installed and the repository is reachable")
    )]
    CloneFailed { url: String, reason: String },

    #[error("Scratch directory already exists: {path}")]
    #[diagnostic(
        code(wanderer::sync::scratch_occupied),
        help("A previous run was interrupted. Remove the directory and run again")
    )]
    ScratchDirOccupied { path: String },

    #[error("Failed to mirror '{path}': {reason}")]
    #[diagnostic(code(wanderer::sync::mirror_failed))]
    MirrorFailed { path: String, reason: String },

    // Git errors
    #[error("Git operation failed: {message}")]
    #[diagnostic(code(wanderer::git::operation_failed))]
    GitOperationFailed { message: String },

    #[error("Not in a git repository")]
    #[diagnostic(
        code(wanderer::git::not_in_repo),
        help("Run from inside the agent's repository or pass --root")
    )]
    NotInGitRepository,

    // Configuration errors
    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(wanderer::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(wanderer::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(wanderer::config::invalid))]
    ConfigInvalid { message: String },

    // File system errors
    #[error("Failed to read file: {path}")]
    #[diagnostic(code(wanderer::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(wanderer::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(wanderer::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for WandererError {
    fn from(err: std::io::Error) -> Self {
        WandererError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for WandererError {
    fn from(err: serde_yaml::Error) -> Self {
        WandererError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for WandererError {
    fn from(err: serde_json::Error) -> Self {
        WandererError::ManifestInvalid {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<git2::Error> for WandererError {
    fn from(err: git2::Error) -> Self {
        WandererError::GitOperationFailed {
            message: err.message().to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, WandererError>;
