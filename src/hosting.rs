//! Repository hosting API
//!
//! Lists the repositories of the agent's organization and fetches the
//! published manifest of each one from the raw file host. Both requests are
//! authenticated with the agent's token.

use reqwest::Client;
use serde::Deserialize;

use crate::config::{Endpoints, Identity};
use crate::error::{Result, hosting};
use crate::http::Get;

const GITHUB_JSON: &str = "application/vnd.github.v3+json";
/// Only the first page is read; organizations beyond it lose their tail
const REPOS_PER_PAGE: &str = "100";
/// Used when the listing omits a repository's default branch
pub const FALLBACK_BRANCH: &str = "main";
const SIBLING_MANIFEST: &str = "package.json";

/// One entry of the organization's repository listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SiblingRepository {
    /// `owner/name`
    pub full_name: String,
    #[serde(default)]
    pub default_branch: Option<String>,
}

impl SiblingRepository {
    pub fn branch(&self) -> &str {
        self.default_branch.as_deref().unwrap_or(FALLBACK_BRANCH)
    }
}

/// The two manifest fields a merge needs
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SiblingManifest {
    pub name: String,
    pub version: String,
}

/// Hosting queries issued by the merge phase
#[allow(async_fn_in_trait)]
pub trait Hosting {
    /// Repositories owned by `owner`, in listing order
    async fn list_siblings(&self, owner: &str) -> Result<Vec<SiblingRepository>>;

    /// Published manifest on the sibling's default branch
    async fn fetch_manifest(&self, sibling: &SiblingRepository) -> Result<SiblingManifest>;
}

/// Authenticated client for the hosting REST API and raw file host
#[derive(Debug, Clone)]
pub struct HostingClient {
    http: Client,
    api_url: String,
    raw_url: String,
    token: String,
}

impl HostingClient {
    pub fn new(http: Client, endpoints: &Endpoints, identity: &Identity) -> Self {
        Self {
            http,
            api_url: endpoints.api.clone(),
            raw_url: endpoints.raw.clone(),
            token: identity.token.clone(),
        }
    }
}

impl Hosting for HostingClient {
    async fn list_siblings(&self, owner: &str) -> Result<Vec<SiblingRepository>> {
        let url = format!("{}/orgs/{owner}/repos", self.api_url);
        let siblings: Vec<SiblingRepository> = Get::new(&self.http, &url)
            .query(&[("per_page", REPOS_PER_PAGE)])
            .bearer(&self.token)
            .accept(GITHUB_JSON)
            .json()
            .await
            .map_err(|e| hosting::listing_failed(owner, e))?;

        tracing::debug!(owner, count = siblings.len(), "listed siblings");
        Ok(siblings)
    }

    async fn fetch_manifest(&self, sibling: &SiblingRepository) -> Result<SiblingManifest> {
        let url = format!(
            "{}/{}/{}/{SIBLING_MANIFEST}",
            self.raw_url,
            sibling.full_name,
            sibling.branch()
        );
        Get::new(&self.http, &url)
            .bearer(&self.token)
            .json()
            .await
            .map_err(|e| hosting::sibling_unavailable(&sibling.full_name, e))
    }
}
