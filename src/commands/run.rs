//! Run command implementation
//!
//! One propagation cycle: discover, mirror, merge, write. Prints a summary on
//! completion, or why nothing was done.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use console::Style;

use crate::cli::{self, RunArgs};
use crate::config::Settings;
use crate::error::Result;
use crate::hosting::HostingClient;
use crate::http;
use crate::pipeline::{Discovery, Pipeline, RunReport, Stage};
use crate::progress::Spinner;
use crate::random::StdRandomizer;
use crate::registry::RegistryClient;

/// Run the propagation cycle against `root`
pub async fn run(root: &Path, control_dir: Option<PathBuf>, args: RunArgs) -> Result<()> {
    let overrides = cli::overrides(
        control_dir,
        Some(&args.discovery),
        Some(&args.hosting),
        &args.exclude,
    );
    let settings = Settings::load(root, overrides)?;
    let identity = args.identity.identity();
    tracing::debug!(?settings, ?identity, "resolved settings");

    let client = http::client()?;
    let registry = RegistryClient::new(client.clone(), &settings.endpoints);
    let hosting = HostingClient::new(client, &settings.endpoints, &identity);
    let spinner = Spinner::new();

    let mut pipeline = Pipeline {
        discovery: Discovery {
            settings: &settings,
            registry: &registry,
            rng: StdRandomizer::new(settings.seed),
            progress: &spinner,
        },
        identity: &identity,
        hosting: &hosting,
    };
    let outcome = pipeline.run().await;
    spinner.finish();

    match outcome? {
        Stage::Done(report) => print!("{}", render_report(&report, root)),
        Stage::Skipped(reason) => println!("{}", render_skip(&reason)),
    }
    Ok(())
}

pub(crate) fn render_skip(reason: &str) -> String {
    format!(
        "{} {reason}",
        Style::new().yellow().bold().apply_to("Nothing to do:")
    )
}

fn render_report(report: &RunReport, root: &Path) -> String {
    let bold = Style::new().bold();
    let manifest = report
        .manifest_path
        .strip_prefix(root)
        .unwrap_or(&report.manifest_path);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}",
        Style::new().green().bold().apply_to("Propagated from"),
        report.candidate.url
    );
    let _ = writeln!(
        out,
        "  {} {} (via {} / {})",
        bold.apply_to("Package:"),
        report.candidate.source_package.name,
        report.candidate.via,
        report.candidate.keyword
    );
    let _ = writeln!(
        out,
        "  {} {} written, {} deleted, {} unchanged",
        bold.apply_to("Files:"),
        report.mirror.written.len(),
        report.mirror.deleted.len(),
        report.mirror.unchanged
    );
    out.push_str(&super::merge::render_merge(&report.merge, manifest));
    out
}
