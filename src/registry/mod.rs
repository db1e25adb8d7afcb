//! Package registry client
//!
//! Three queries are made against the registry:
//! - a global listing, through the search API or by scraping the web front-end
//! - a keyword-filtered listing with fixed quality/popularity weighting
//! - a per-package metadata lookup, used for keywords the listing lacks
//!
//! Nothing is cached or throttled; every call is an independent GET.

pub mod keywords;
pub mod scrape;
mod types;

pub use keywords::KeywordResolver;

use reqwest::Client;

use crate::config::{Endpoints, ListingMode};
use crate::error::{Result, registry};
use crate::http::{Get, HttpError};
use types::{MetadataResponse, SearchResponse};

/// Search qualifier excluding packages flagged insecure or unstable
const SEARCH_FILTER: &str = "not:insecure,unstable";
const KEYWORD_QUALITY: &str = "0.8";
const KEYWORD_POPULARITY: &str = "0.8";

/// A package as reported by the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub keywords: Vec<String>,
    pub repository_url: Option<String>,
}

impl Package {
    /// Package known only by name (front-end listing)
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keywords: Vec::new(),
            repository_url: None,
        }
    }
}

/// Queries issued while walking the registry
#[allow(async_fn_in_trait)]
pub trait Registry {
    /// Batch of currently indexed packages.
    ///
    /// Fails on any transport or decoding error; the caller does not retry.
    async fn fetch_global_listing(
        &self,
        mode: ListingMode,
        page_size: u32,
    ) -> Result<Vec<Package>>;

    /// Packages tagged with `keyword`, best matches first
    async fn fetch_by_keyword(&self, keyword: &str) -> Result<Vec<Package>>;

    /// Declared keywords of one package; failures yield an empty list
    async fn fetch_package_metadata(&self, name: &str) -> Vec<String>;
}

/// HTTP client for the registry endpoints
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: Client,
    search_url: String,
    metadata_url: String,
    frontend_url: String,
}

impl RegistryClient {
    pub fn new(http: Client, endpoints: &Endpoints) -> Self {
        Self {
            http,
            search_url: format!("{}/-/v1/search", endpoints.registry),
            metadata_url: endpoints.metadata.clone(),
            frontend_url: endpoints.frontend.clone(),
        }
    }

    async fn search_listing(&self, page_size: u32) -> Result<Vec<Package>> {
        let size = page_size.to_string();
        self.search(&[("text", SEARCH_FILTER), ("size", size.as_str())])
            .await
    }

    async fn scrape_listing(&self) -> Result<Vec<Package>> {
        let url = format!("{}/", self.frontend_url);
        let html = Get::new(&self.http, &url)
            .accept("text/html")
            .text()
            .await
            .map_err(|e| map_http_error(&url, e))?;

        Ok(scrape::links_with_prefix(&html, scrape::PACKAGE_PATH_PREFIX)
            .into_iter()
            .map(Package::named)
            .collect())
    }

    async fn search(&self, params: &[(&str, &str)]) -> Result<Vec<Package>> {
        let response: SearchResponse = Get::new(&self.http, &self.search_url)
            .query(params)
            .accept("application/json")
            .json()
            .await
            .map_err(|e| map_http_error(&self.search_url, e))?;

        Ok(response.objects.into_iter().map(Package::from).collect())
    }
}

impl Registry for RegistryClient {
    async fn fetch_global_listing(
        &self,
        mode: ListingMode,
        page_size: u32,
    ) -> Result<Vec<Package>> {
        match mode {
            ListingMode::Search => self.search_listing(page_size).await,
            ListingMode::Scrape => self.scrape_listing().await,
        }
    }

    async fn fetch_by_keyword(&self, keyword: &str) -> Result<Vec<Package>> {
        let text = format!("keywords:{keyword} {SEARCH_FILTER}");
        self.search(&[
            ("text", text.as_str()),
            ("quality", KEYWORD_QUALITY),
            ("popularity", KEYWORD_POPULARITY),
        ])
        .await
    }

    async fn fetch_package_metadata(&self, name: &str) -> Vec<String> {
        let url = format!("{}/{}", self.metadata_url, encode_package_name(name));
        match Get::new(&self.http, &url)
            .accept("application/json")
            .json::<MetadataResponse>()
            .await
        {
            Ok(response) => response.collected.metadata.keywords,
            Err(e) => {
                tracing::warn!(package = name, error = %e, "metadata lookup failed");
                Vec::new()
            }
        }
    }
}

/// Scoped names keep their `@` but the separating slash must be escaped
fn encode_package_name(name: &str) -> String {
    name.replace('/', "%2F")
}

fn map_http_error(url: &str, err: HttpError) -> crate::error::WandererError {
    match err {
        HttpError::Decode(reason) => registry::invalid_response(url, reason),
        other => registry::request_failed(url, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WandererError;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> RegistryClient {
        let endpoints = Endpoints {
            registry: server.uri(),
            metadata: format!("{}/v2/package", server.uri()),
            frontend: server.uri(),
            ..Endpoints::default()
        };
        RegistryClient::new(crate::http::client().unwrap(), &endpoints)
    }

    fn search_body() -> serde_json::Value {
        json!({
            "objects": [
                {"package": {
                    "name": "alpha",
                    "keywords": ["cli", "tool"],
                    "links": {"repository": "https://github.com/acme/alpha"}
                }},
                {"package": {"name": "beta", "links": {"npm": "https://www.npmjs.com/package/beta"}}}
            ],
            "total": 2
        })
    }

    #[tokio::test]
    async fn test_global_listing_search() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/-/v1/search"))
            .and(query_param("text", "not:insecure,unstable"))
            .and(query_param("size", "200"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
            .expect(1)
            .mount(&server)
            .await;

        let packages = client_for(&server)
            .fetch_global_listing(ListingMode::Search, 200)
            .await
            .unwrap();

        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].name, "alpha");
        assert_eq!(packages[0].keywords, vec!["cli", "tool"]);
        assert_eq!(
            packages[0].repository_url.as_deref(),
            Some("https://github.com/acme/alpha")
        );
        assert_eq!(packages[1].repository_url, None);
    }

    #[tokio::test]
    async fn test_global_listing_scrape() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<ul><li><a href="/package/one">one</a></li><li><a href="/package/two">two</a></li></ul>"#,
            ))
            .mount(&server)
            .await;

        let packages = client_for(&server)
            .fetch_global_listing(ListingMode::Scrape, 200)
            .await
            .unwrap();

        assert_eq!(packages, vec![Package::named("one"), Package::named("two")]);
    }

    #[tokio::test]
    async fn test_global_listing_server_error_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_global_listing(ListingMode::Search, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, WandererError::RegistryRequestFailed { .. }));
    }

    #[tokio::test]
    async fn test_global_listing_garbage_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_global_listing(ListingMode::Search, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, WandererError::RegistryResponseInvalid { .. }));
    }

    #[tokio::test]
    async fn test_fetch_by_keyword_weighting() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/-/v1/search"))
            .and(query_param("text", "keywords:cli not:insecure,unstable"))
            .and(query_param("quality", "0.8"))
            .and(query_param("popularity", "0.8"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
            .expect(1)
            .mount(&server)
            .await;

        let matches = client_for(&server).fetch_by_keyword("cli").await.unwrap();
        assert_eq!(matches.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_by_keyword_no_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"objects": []})))
            .mount(&server)
            .await;

        let matches = client_for(&server).fetch_by_keyword("zzz").await.unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_package_metadata() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/package/@scope%2Fpkg"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "collected": {"metadata": {"name": "@scope/pkg", "keywords": ["x", "y"]}}
            })))
            .mount(&server)
            .await;

        let keywords = client_for(&server)
            .fetch_package_metadata("@scope/pkg")
            .await;
        assert_eq!(keywords, vec!["x", "y"]);
    }

    #[tokio::test]
    async fn test_fetch_package_metadata_absorbs_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let keywords = client_for(&server).fetch_package_metadata("gone").await;
        assert!(keywords.is_empty());
    }

    #[test]
    fn test_encode_package_name() {
        assert_eq!(encode_package_name("@scope/pkg"), "@scope%2Fpkg");
        assert_eq!(encode_package_name("plain"), "plain");
    }
}
