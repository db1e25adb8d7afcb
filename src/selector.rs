//! Repository selection
//!
//! The registry is walked lazily, package → keyword → keyword match, with
//! every level shuffled. [`select`] pulls matches one at a time and stops at
//! the first one whose repository is hosted on GitHub, so no request is made
//! past the winning match.

use std::vec::IntoIter;

use crate::random::Randomizer;
use crate::registry::{KeywordResolver, Package, Registry};

/// Repository links must start with this to be cloneable
pub const GITHUB_PREFIX: &str = "https://github.com/";

/// A repository chosen for cloning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub url: String,
    /// The keyword match that exposed the repository
    pub source_package: Package,
    /// Listing package whose keyword led here
    pub via: String,
    pub keyword: String,
}

/// One keyword match produced by the walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    pub via: String,
    pub keyword: String,
    pub package: Package,
}

/// Lazy traversal of the registry.
///
/// Holds the shuffled listing and the cursors into the current package's
/// keywords and the current keyword's matches; requests are only issued when
/// the previous level runs dry.
pub struct CandidateWalk<'a, R, G> {
    registry: &'a R,
    resolver: KeywordResolver,
    rng: &'a mut G,
    packages: IntoIter<Package>,
    keywords: IntoIter<String>,
    matches: IntoIter<Package>,
    current_package: String,
    current_keyword: String,
}

impl<'a, R: Registry, G: Randomizer> CandidateWalk<'a, R, G> {
    pub fn new(
        registry: &'a R,
        resolver: KeywordResolver,
        rng: &'a mut G,
        mut listing: Vec<Package>,
    ) -> Self {
        rng.shuffle(&mut listing);
        Self {
            registry,
            resolver,
            rng,
            packages: listing.into_iter(),
            keywords: Vec::new().into_iter(),
            matches: Vec::new().into_iter(),
            current_package: String::new(),
            current_keyword: String::new(),
        }
    }

    /// Next keyword match, or `None` once the listing is exhausted
    pub async fn next_match(&mut self) -> Option<Visit> {
        loop {
            if let Some(package) = self.matches.next() {
                return Some(Visit {
                    via: self.current_package.clone(),
                    keyword: self.current_keyword.clone(),
                    package,
                });
            }

            if let Some(keyword) = self.keywords.next() {
                self.matches = self.search(&keyword).await.into_iter();
                self.current_keyword = keyword;
                continue;
            }

            let package = self.packages.next()?;
            let mut keywords = self.resolver.resolve(self.registry, &package).await;
            self.rng.shuffle(&mut keywords);
            tracing::info!(package = %package.name, ?keywords, "keywords for package");

            self.keywords = keywords.into_iter();
            self.current_package = package.name;
        }
    }

    /// Keyword matches, shuffled; a failed search counts as no matches
    async fn search(&mut self, keyword: &str) -> Vec<Package> {
        match self.registry.fetch_by_keyword(keyword).await {
            Ok(mut matches) => {
                tracing::debug!(keyword, count = matches.len(), "keyword search");
                self.rng.shuffle(&mut matches);
                matches
            }
            Err(e) => {
                tracing::warn!(keyword, error = %e, "keyword search failed, skipping");
                Vec::new()
            }
        }
    }
}

/// GitHub repository link of a package, if it has one
pub fn github_repository(package: &Package) -> Option<&str> {
    package
        .repository_url
        .as_deref()
        .filter(|url| url.starts_with(GITHUB_PREFIX))
}

/// First keyword match exposing a GitHub repository; `None` when the listing
/// is exhausted without one.
pub async fn select<R: Registry, G: Randomizer>(
    registry: &R,
    resolver: KeywordResolver,
    rng: &mut G,
    listing: Vec<Package>,
) -> Option<Candidate> {
    let mut walk = CandidateWalk::new(registry, resolver, rng, listing);
    while let Some(visit) = walk.next_match().await {
        if let Some(url) = github_repository(&visit.package) {
            return Some(Candidate {
                url: url.to_string(),
                source_package: visit.package.clone(),
                via: visit.via,
                keyword: visit.keyword,
            });
        }
    }
    None
}
