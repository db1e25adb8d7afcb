//! The propagation cycle
//!
//! A run is a fixed sequence of stages:
//!
//! 1. fetch the global listing
//! 2. select a repository
//! 3. synchronize the tree
//! 4. reload the manifest and merge sibling versions into it
//! 5. write the manifest
//!
//! Each stage returns `Result<Stage<T>>`. An error aborts the run; a
//! [`Stage::Skipped`] ends it successfully without running later stages.

use std::path::PathBuf;

use crate::config::{Identity, ListingMode, Settings};
use crate::error::Result;
use crate::hosting::Hosting;
use crate::manifest::Manifest;
use crate::merge::{self, MergeReport};
use crate::progress::Spinner;
use crate::random::Randomizer;
use crate::registry::{KeywordResolver, Package, Registry};
use crate::selector::{self, Candidate};
use crate::sync::{self, MirrorReport};

/// Outcome of a stage that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage<T> {
    Done(T),
    /// Nothing to do; the run ends successfully
    Skipped(String),
}

/// Unwrap a [`Stage::Done`] or return the skip from the enclosing function
macro_rules! done_or_return {
    ($stage:expr) => {
        match $stage? {
            Stage::Done(value) => value,
            Stage::Skipped(reason) => return Ok(Stage::Skipped(reason)),
        }
    };
}

/// Everything a completed cycle did
#[derive(Debug, Clone)]
pub struct RunReport {
    pub candidate: Candidate,
    pub mirror: MirrorReport,
    pub merge: MergeReport,
    pub manifest_path: PathBuf,
}

/// Listing and selection; needs no hosting access
pub struct Discovery<'a, R, G> {
    pub settings: &'a Settings,
    pub registry: &'a R,
    pub rng: G,
    pub progress: &'a Spinner,
}

impl<R: Registry, G: Randomizer> Discovery<'_, R, G> {
    pub async fn pick(&mut self) -> Result<Stage<Candidate>> {
        self.progress.stage("Fetching registry listing");
        let listing = done_or_return!(fetch_listing(self.registry, self.settings).await);

        self.progress.stage("Searching for a repository");
        select_candidate(self.registry, &mut self.rng, self.settings, listing).await
    }
}

/// Collaborators of one run
pub struct Pipeline<'a, R, H, G> {
    pub discovery: Discovery<'a, R, G>,
    pub identity: &'a Identity,
    pub hosting: &'a H,
}

impl<R: Registry, H: Hosting, G: Randomizer> Pipeline<'_, R, H, G> {
    /// One full cycle; stops at the first completed clone, merge and write
    pub async fn run(&mut self) -> Result<Stage<RunReport>> {
        let candidate = done_or_return!(self.discovery.pick().await);
        self.propagate(candidate).await
    }

    /// Everything after selection: mirror `candidate`, merge and write
    pub async fn propagate(&self, candidate: Candidate) -> Result<Stage<RunReport>> {
        let settings = self.discovery.settings;
        let progress = self.discovery.progress;

        progress.stage(format!("Cloning {}", candidate.url));
        let mirror = done_or_return!(synchronize_tree(&candidate, settings));

        progress.stage(format!("Merging sibling manifests of {}", self.identity.owner));
        let (manifest, merge) =
            done_or_return!(merge_manifest(self.hosting, self.identity, settings).await);
        manifest.write()?;

        Ok(Stage::Done(RunReport {
            candidate,
            mirror,
            merge,
            manifest_path: manifest.path().to_path_buf(),
        }))
    }
}

/// Stage 1
pub async fn fetch_listing<R: Registry>(
    registry: &R,
    settings: &Settings,
) -> Result<Stage<Vec<Package>>> {
    let listing = registry
        .fetch_global_listing(settings.listing, settings.page_size)
        .await?;
    tracing::info!(count = listing.len(), mode = ?settings.listing, "global listing");

    if listing.is_empty() {
        return Ok(Stage::Skipped("the registry listing is empty".to_string()));
    }
    Ok(Stage::Done(listing))
}

/// Stage 2
pub async fn select_candidate<R: Registry, G: Randomizer>(
    registry: &R,
    rng: &mut G,
    settings: &Settings,
    listing: Vec<Package>,
) -> Result<Stage<Candidate>> {
    // Scraped listings carry names only
    let resolver = match settings.listing {
        ListingMode::Search => KeywordResolver::embedded(),
        ListingMode::Scrape => KeywordResolver::with_metadata_lookup(),
    };

    match selector::select(registry, resolver, rng, listing).await {
        Some(candidate) => {
            tracing::info!(
                url = %candidate.url,
                package = %candidate.source_package.name,
                via = %candidate.via,
                keyword = %candidate.keyword,
                "candidate selected"
            );
            Ok(Stage::Done(candidate))
        }
        None => Ok(Stage::Skipped(
            "no package exposed a GitHub repository".to_string(),
        )),
    }
}

/// Stage 3
pub fn synchronize_tree(candidate: &Candidate, settings: &Settings) -> Result<Stage<MirrorReport>> {
    tracing::debug!(
        control_dir = %settings.control_dir.display(),
        excludes = settings.excludes.len(),
        "mirroring around control directory"
    );
    sync::synchronize(
        &candidate.url,
        &settings.scratch_dir,
        &settings.root,
        &settings.excludes,
    )
    .map(Stage::Done)
}

/// Stage 4; the manifest is reloaded because synchronization may replace it
pub async fn merge_manifest<H: Hosting>(
    hosting: &H,
    identity: &Identity,
    settings: &Settings,
) -> Result<Stage<(Manifest, MergeReport)>> {
    let mut manifest = Manifest::load(&settings.manifest_path)?;
    tracing::debug!(
        name = ?manifest.name(),
        version = ?manifest.version(),
        "local manifest loaded"
    );
    let report = merge::merge(&mut manifest, hosting, identity, &settings.test_marker).await?;
    tracing::info!(
        merged = report.merged(),
        skipped = report.skipped(),
        unreachable = report.unreachable(),
        "merge complete"
    );
    Ok(Stage::Done((manifest, report)))
}
