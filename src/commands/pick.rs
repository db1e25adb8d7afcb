//! Pick command implementation
//!
//! Runs discovery only and prints the repository a run would clone.

use std::path::{Path, PathBuf};

use console::Style;

use crate::cli::{self, PickArgs};
use crate::config::Settings;
use crate::error::Result;
use crate::http;
use crate::pipeline::{Discovery, Stage};
use crate::progress::Spinner;
use crate::random::StdRandomizer;
use crate::registry::RegistryClient;
use crate::selector::Candidate;

/// Print the repository a run would clone
pub async fn run(root: &Path, control_dir: Option<PathBuf>, args: PickArgs) -> Result<()> {
    let settings = Settings::load(
        root,
        cli::overrides(control_dir, Some(&args.discovery), None, &[]),
    )?;
    let registry = RegistryClient::new(http::client()?, &settings.endpoints);

    let spinner = Spinner::new();
    let mut discovery = Discovery {
        settings: &settings,
        registry: &registry,
        rng: StdRandomizer::new(settings.seed),
        progress: &spinner,
    };
    let outcome = discovery.pick().await;
    spinner.finish();

    match outcome? {
        Stage::Done(candidate) => println!("{}", render_candidate(&candidate)),
        Stage::Skipped(reason) => println!("{}", super::run::render_skip(&reason)),
    }
    Ok(())
}

fn render_candidate(candidate: &Candidate) -> String {
    format!(
        "{} {}\n  {} {} (via {} / {})",
        Style::new().green().bold().apply_to("Picked"),
        candidate.url,
        Style::new().bold().apply_to("Package:"),
        candidate.source_package.name,
        candidate.via,
        candidate.keyword
    )
}
