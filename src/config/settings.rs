//! Resolved run settings
//!
//! Every stage of the pipeline receives its resources (root, manifest path,
//! scratch directory, excludes, endpoints) from [`Settings`] rather than from
//! process-wide state.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

use crate::config::FileConfig;
use crate::error::{Result, config};

/// Control directory of the agent, never touched by the mirror
pub const DEFAULT_CONTROL_DIR: &str = ".github";
/// VCS metadata of the agent's own checkout
pub const GIT_DIR: &str = ".git";
pub const DEFAULT_MANIFEST: &str = "package.json";
/// Scratch clone location, inside the control directory
pub const DEFAULT_SCRATCH_NAME: &str = "wanderer-scratch";
pub const DEFAULT_PAGE_SIZE: u32 = 200;
/// Largest page the registry search endpoint serves
pub const MAX_PAGE_SIZE: u32 = 250;
pub const DEFAULT_TEST_MARKER: &str = "test";

/// How the global package listing is obtained
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ListingMode {
    /// Registry search API
    #[default]
    Search,
    /// Scrape package links from the registry web front-end
    Scrape,
}

/// Base URLs of every remote service the agent talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Registry search API
    pub registry: String,
    /// Per-package aggregate metadata API
    pub metadata: String,
    /// Registry web front-end
    pub frontend: String,
    /// Hosting platform REST API
    pub api: String,
    /// Hosting platform raw file host
    pub raw: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            registry: "https://registry.npmjs.org".to_string(),
            metadata: "https://api.npms.io/v2/package".to_string(),
            frontend: "https://www.npmjs.com".to_string(),
            api: "https://api.github.com".to_string(),
            raw: "https://raw.githubusercontent.com".to_string(),
        }
    }
}

/// Who the agent is and how it authenticates against the hosting API
#[derive(Clone)]
pub struct Identity {
    /// Organization owning the sibling repositories
    pub owner: String,
    /// Fully-qualified name of the agent's own repository (`owner/name`)
    pub repo: String,
    pub token: String,
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Values supplied on the command line; `None` keeps the lower layer
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub control_dir: Option<PathBuf>,
    pub listing: Option<ListingMode>,
    pub page_size: Option<u32>,
    pub seed: Option<u64>,
    pub exclude: Vec<PathBuf>,
    pub registry_url: Option<String>,
    pub metadata_url: Option<String>,
    pub frontend_url: Option<String>,
    pub api_url: Option<String>,
    pub raw_url: Option<String>,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    /// Agent root, the mirror destination
    pub root: PathBuf,
    /// Control directory relative to the root
    pub control_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub scratch_dir: PathBuf,
    /// Root-relative prefixes skipped by both mirror sweeps
    pub excludes: Vec<PathBuf>,
    pub page_size: u32,
    pub listing: ListingMode,
    pub test_marker: String,
    pub seed: Option<u64>,
    pub endpoints: Endpoints,
}

impl Settings {
    /// Resolve settings for `root`, reading `wanderer.yaml` from its control directory
    pub fn load(root: &Path, overrides: SettingsOverrides) -> Result<Self> {
        let control_dir = overrides
            .control_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTROL_DIR));
        let file = FileConfig::load(&root.join(&control_dir))?.unwrap_or_default();
        Self::resolve(root, file, overrides)
    }

    /// Merge defaults, file configuration and overrides, then validate
    pub fn resolve(root: &Path, file: FileConfig, overrides: SettingsOverrides) -> Result<Self> {
        let control_dir = normalize_relative(
            &overrides
                .control_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTROL_DIR)),
            "control directory",
        )?;

        let manifest = normalize_relative(
            &file
                .manifest
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST)),
            "manifest",
        )?;

        let scratch = match file.scratch_dir {
            Some(path) => normalize_relative(&path, "scratch directory")?,
            None => control_dir.join(DEFAULT_SCRATCH_NAME),
        };

        let mut excludes = vec![control_dir.clone(), PathBuf::from(GIT_DIR)];
        for extra in file.exclude.into_iter().chain(overrides.exclude) {
            let extra = normalize_relative(&extra, "exclude")?;
            if !excludes.contains(&extra) {
                excludes.push(extra);
            }
        }

        // The clone is the mirror source; a non-excluded scratch dir would be
        // swept by the delete pass while it is being read.
        if !excludes.iter().any(|prefix| scratch.starts_with(prefix)) {
            return Err(config::invalid(format!(
                "scratch directory '{}' must be inside an excluded path such as '{}'",
                scratch.display(),
                control_dir.display()
            )));
        }

        let page_size = overrides
            .page_size
            .or(file.page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(config::invalid(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"
            )));
        }

        let test_marker = file
            .test_marker
            .unwrap_or_else(|| DEFAULT_TEST_MARKER.to_string());
        if test_marker.is_empty() {
            return Err(config::invalid("test_marker must not be empty"));
        }

        let defaults = Endpoints::default();
        let endpoints = Endpoints {
            registry: pick_url(overrides.registry_url, file.registry_url, defaults.registry),
            metadata: pick_url(overrides.metadata_url, file.metadata_url, defaults.metadata),
            frontend: pick_url(overrides.frontend_url, file.frontend_url, defaults.frontend),
            api: pick_url(overrides.api_url, file.api_url, defaults.api),
            raw: pick_url(overrides.raw_url, file.raw_url, defaults.raw),
        };

        Ok(Self {
            root: root.to_path_buf(),
            manifest_path: root.join(manifest),
            scratch_dir: root.join(scratch),
            control_dir,
            excludes,
            page_size,
            listing: overrides.listing.or(file.listing).unwrap_or_default(),
            test_marker,
            seed: overrides.seed,
            endpoints,
        })
    }
}

/// Root-relative path with `.` components dropped.
///
/// Mirror excludes are matched component-wise, so `./.github` has to become
/// `.github`. Paths that are absolute, empty or climb out of the root with
/// `..` are rejected.
fn normalize_relative(path: &Path, what: &str) -> Result<PathBuf> {
    let invalid = || {
        config::invalid(format!(
            "{what} path must be relative to the agent root and stay inside it: '{}'",
            path.display()
        ))
    };

    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(invalid());
            }
        }
    }
    if normalized.as_os_str().is_empty() {
        return Err(invalid());
    }
    Ok(normalized)
}

fn pick_url(flag: Option<String>, file: Option<String>, default: String) -> String {
    flag.or(file)
        .unwrap_or(default)
        .trim_end_matches('/')
        .to_string()
}
