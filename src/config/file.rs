//! Optional configuration file (`wanderer.yaml`) data structures

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::ListingMode;
use crate::error::{Result, config};

/// File name looked up inside the control directory
pub const CONFIG_FILE: &str = "wanderer.yaml";

/// Configuration file contents; every field is optional and overrides a default
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Number of packages requested for the global listing
    pub page_size: Option<u32>,

    /// How the global listing is obtained
    pub listing: Option<ListingMode>,

    /// Extra paths (relative to the root) left untouched by the mirror
    #[serde(default)]
    pub exclude: Vec<PathBuf>,

    /// Manifest path relative to the root
    pub manifest: Option<PathBuf>,

    /// Scratch clone directory relative to the root
    pub scratch_dir: Option<PathBuf>,

    /// Substring marking a sibling package as a test artifact
    pub test_marker: Option<String>,

    pub registry_url: Option<String>,
    pub metadata_url: Option<String>,
    pub frontend_url: Option<String>,
    pub api_url: Option<String>,
    pub raw_url: Option<String>,
}

impl FileConfig {
    fn parse(yaml: &str) -> serde_yaml::Result<Self> {
        serde_yaml::from_str(yaml)
    }

    /// Load `wanderer.yaml` from a control directory.
    ///
    /// A missing file is not an error and yields `None`.
    pub fn load(control_dir: &Path) -> Result<Option<Self>> {
        let path = control_dir.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| config::read_failed(path.display().to_string(), e.to_string()))?;

        if content.trim().is_empty() {
            return Ok(Some(Self::default()));
        }

        Self::parse(&content)
            .map(Some)
            .map_err(|e| config::parse_failed(path.display().to_string(), e.to_string()))
    }
}
