//! Configuration for Wanderer
//!
//! Settings are resolved in three layers:
//! - built-in defaults
//! - `<control dir>/wanderer.yaml` in the agent root, if present
//! - command-line flags

pub mod file;
pub mod settings;

pub use file::FileConfig;
pub use settings::{Endpoints, Identity, ListingMode, Settings, SettingsOverrides};
