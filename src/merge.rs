//! Sibling manifest merge
//!
//! Every repository of the organization, other than the agent itself,
//! contributes `name → ^version` to the local manifest. A sibling that cannot
//! be fetched is skipped on its own; only the listing itself is fatal.

use std::fmt;

use crate::config::Identity;
use crate::error::Result;
use crate::hosting::{Hosting, SiblingRepository};
use crate::manifest::Manifest;

/// What happened to one sibling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiblingOutcome {
    /// Dependency set to the contained range
    Merged { name: String, range: String },
    /// The agent's own repository
    SkippedOwn,
    /// Manifest name carries the test marker
    SkippedTestArtifact { name: String },
    /// Manifest could not be fetched or parsed
    Unreachable { reason: String },
}

impl fmt::Display for SiblingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Merged { name, range } => write!(f, "merged {name}@{range}"),
            Self::SkippedOwn => write!(f, "skipped (own repository)"),
            Self::SkippedTestArtifact { name } => write!(f, "skipped (test artifact {name})"),
            Self::Unreachable { reason } => write!(f, "unreachable: {reason}"),
        }
    }
}

/// Outcome of every sibling, in listing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub outcomes: Vec<(String, SiblingOutcome)>,
}

impl MergeReport {
    pub fn merged(&self) -> usize {
        self.count(|o| matches!(o, SiblingOutcome::Merged { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                SiblingOutcome::SkippedOwn | SiblingOutcome::SkippedTestArtifact { .. }
            )
        })
    }

    pub fn unreachable(&self) -> usize {
        self.count(|o| matches!(o, SiblingOutcome::Unreachable { .. }))
    }

    fn count(&self, predicate: impl Fn(&SiblingOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| predicate(o)).count()
    }
}

/// Whether a listed repository is the agent's own
fn is_own(sibling: &SiblingRepository, identity: &Identity) -> bool {
    sibling.full_name.eq_ignore_ascii_case(&identity.repo)
}

/// Fold every sibling's published version into `manifest`.
///
/// Siblings are visited in listing order; a later sibling publishing the same
/// name overwrites an earlier one. The manifest is only changed in memory.
pub async fn merge<H: Hosting>(
    manifest: &mut Manifest,
    hosting: &H,
    identity: &Identity,
    test_marker: &str,
) -> Result<MergeReport> {
    let siblings = hosting.list_siblings(&identity.owner).await?;
    let mut report = MergeReport::default();

    for sibling in siblings {
        let outcome = merge_sibling(manifest, hosting, identity, test_marker, &sibling).await;
        match &outcome {
            SiblingOutcome::Unreachable { reason } => {
                tracing::warn!(sibling = %sibling.full_name, %reason, "sibling skipped");
            }
            other => tracing::info!(sibling = %sibling.full_name, outcome = %other, "sibling"),
        }
        report.outcomes.push((sibling.full_name, outcome));
    }

    Ok(report)
}

async fn merge_sibling<H: Hosting>(
    manifest: &mut Manifest,
    hosting: &H,
    identity: &Identity,
    test_marker: &str,
    sibling: &SiblingRepository,
) -> SiblingOutcome {
    if is_own(sibling, identity) {
        return SiblingOutcome::SkippedOwn;
    }

    let published = match hosting.fetch_manifest(sibling).await {
        Ok(published) => published,
        Err(e) => {
            return SiblingOutcome::Unreachable {
                reason: e.to_string(),
            };
        }
    };

    if published.name.contains(test_marker) {
        return SiblingOutcome::SkippedTestArtifact {
            name: published.name,
        };
    }

    let range = format!("^{}", published.version);
    if let Some(previous) = manifest.dependency(&published.name) {
        tracing::debug!(name = %published.name, %previous, %range, "replacing dependency");
    }
    manifest.set_dependency(&published.name, range.clone());
    SiblingOutcome::Merged {
        name: published.name,
        range,
    }
}
