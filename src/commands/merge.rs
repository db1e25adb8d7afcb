//! Merge command implementation
//!
//! Refreshes the sibling dependencies of the current tree without discovering
//! or cloning anything.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use console::Style;

use crate::cli::{self, MergeArgs};
use crate::config::Settings;
use crate::error::Result;
use crate::hosting::HostingClient;
use crate::http;
use crate::merge::{MergeReport, SiblingOutcome};
use crate::pipeline::{self, Stage};
use crate::progress::Spinner;

/// Merge sibling manifests into the manifest under `root`
pub async fn run(root: &Path, control_dir: Option<PathBuf>, args: MergeArgs) -> Result<()> {
    let settings = Settings::load(
        root,
        cli::overrides(control_dir, None, Some(&args.hosting), &[]),
    )?;
    let identity = args.identity.identity();
    let hosting = HostingClient::new(http::client()?, &settings.endpoints, &identity);

    let spinner = Spinner::new();
    spinner.stage(format!("Merging sibling manifests of {}", identity.owner));
    let outcome = pipeline::merge_manifest(&hosting, &identity, &settings).await;
    spinner.finish();

    match outcome? {
        Stage::Done((manifest, report)) => {
            manifest.write()?;
            let relative = manifest.path().strip_prefix(root).unwrap_or(manifest.path());
            print!("{}", render_merge(&report, relative));
            print!("{}", render_outcomes(&report));
        }
        Stage::Skipped(reason) => println!("{}", super::run::render_skip(&reason)),
    }
    Ok(())
}

/// One-line merge summary
pub(crate) fn render_merge(report: &MergeReport, manifest: &Path) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {} {} merged, {} skipped, {} unreachable ({})",
        Style::new().bold().apply_to("Siblings:"),
        report.merged(),
        report.skipped(),
        report.unreachable(),
        manifest.display()
    );
    out
}

/// Per-sibling detail
fn render_outcomes(report: &MergeReport) -> String {
    let mut out = String::new();
    for (sibling, outcome) in &report.outcomes {
        let style = match outcome {
            SiblingOutcome::Merged { .. } => Style::new().green(),
            SiblingOutcome::Unreachable { .. } => Style::new().red(),
            SiblingOutcome::SkippedOwn | SiblingOutcome::SkippedTestArtifact { .. } => {
                Style::new().dim()
            }
        };
        let _ = writeln!(out, "    {sibling}: {}", style.apply_to(outcome));
    }
    out
}
