//! Wire formats of the registry endpoints

use serde::Deserialize;

use super::Package;

/// Search endpoint response (`/-/v1/search`)
#[derive(Debug, Deserialize)]
pub(super) struct SearchResponse {
    #[serde(default)]
    pub objects: Vec<SearchObject>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchObject {
    pub package: SearchPackage,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchPackage {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub links: Links,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct Links {
    pub repository: Option<String>,
}

impl From<SearchObject> for Package {
    fn from(object: SearchObject) -> Self {
        let SearchPackage {
            name,
            keywords,
            links,
        } = object.package;
        Package {
            name,
            keywords,
            repository_url: links.repository,
        }
    }
}

/// Aggregate metadata endpoint response; only keywords are read
#[derive(Debug, Deserialize)]
pub(super) struct MetadataResponse {
    pub collected: Collected,
}

#[derive(Debug, Deserialize)]
pub(super) struct Collected {
    pub metadata: Metadata,
}

#[derive(Debug, Deserialize)]
pub(super) struct Metadata {
    #[serde(default)]
    pub keywords: Vec<String>,
}
