//! Keyword set of a package

use super::{Package, Registry};

/// Resolves the keywords of a listed package.
///
/// Search listings embed keywords. Scraped listings carry only names, so the
/// resolver falls back to a metadata lookup when it is allowed to.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordResolver {
    lookup_metadata: bool,
}

impl KeywordResolver {
    /// Use embedded keywords only
    pub fn embedded() -> Self {
        Self {
            lookup_metadata: false,
        }
    }

    /// Fall back to a per-package metadata lookup when none are embedded
    pub fn with_metadata_lookup() -> Self {
        Self {
            lookup_metadata: true,
        }
    }

    pub async fn resolve<R: Registry>(&self, registry: &R, package: &Package) -> Vec<String> {
        if !package.keywords.is_empty() || !self.lookup_metadata {
            return package.keywords.clone();
        }
        registry.fetch_package_metadata(&package.name).await
    }
}
