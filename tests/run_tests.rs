//! End-to-end tests of the run and pick commands against mock services

mod common;

use common::{TestWorkspace, search_body};
use predicates::prelude::*;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn registry_with(listing: serde_json::Value, keyword_matches: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/-/v1/search"))
        .and(query_param("text", "not:insecure,unstable"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/-/v1/search"))
        .and(query_param("quality", "0.8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(keyword_matches))
        .mount(&server)
        .await;
    server
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_without_candidate_changes_nothing() {
    let workspace = TestWorkspace::new();
    let registry = registry_with(
        search_body(&[("seed", &["cli"], None)]),
        search_body(&[("elsewhere", &[], Some("https://gitlab.com/acme/elsewhere"))]),
    )
    .await;
    // No hosting mock is mounted: merging must not be attempted
    let hosting = MockServer::start().await;
    let before = workspace.read_file("package.json");

    workspace
        .command()
        .args(["run", "--owner", "acme", "--repo", "acme/agent"])
        .args(["--registry-url", &registry.uri()])
        .args(["--api-url", &hosting.uri(), "--raw-url", &hosting.uri()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to do"));

    assert_eq!(workspace.read_file("package.json"), before);
    assert!(hosting.received_requests().await.unwrap_or_default().is_empty());
    assert!(!workspace.file_exists(".github/wanderer-scratch"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_listing_failure_is_fatal() {
    let workspace = TestWorkspace::new();
    let registry = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&registry)
        .await;

    workspace
        .command()
        .args(["run", "--owner", "acme", "--repo", "acme/agent"])
        .args(["--registry-url", &registry.uri()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: Registry request failed"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_refuses_stale_scratch_directory() {
    let workspace = TestWorkspace::new();
    workspace.write_file(".github/wanderer-scratch/leftover", "x");
    let registry = registry_with(
        search_body(&[("seed", &["cli"], None)]),
        search_body(&[("tool", &[], Some("https://github.com/acme/tool"))]),
    )
    .await;

    workspace
        .command()
        .args(["run", "--owner", "acme", "--repo", "acme/agent"])
        .args(["--registry-url", &registry.uri()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Scratch directory already exists"));

    // Left for the operator to inspect
    assert!(workspace.file_exists(".github/wanderer-scratch/leftover"));
    assert_eq!(
        workspace.read_file("package.json"),
        r#"{"name":"agent","version":"1.0.0","dependencies":{"x":"^1.0.0"}}"#
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_pick_prints_candidate() {
    let workspace = TestWorkspace::new();
    let registry = registry_with(
        search_body(&[("seed", &["cli"], None)]),
        search_body(&[("tool", &[], Some("https://github.com/acme/tool"))]),
    )
    .await;

    workspace
        .command()
        .args(["pick", "--seed", "1", "--registry-url", &registry.uri()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Picked https://github.com/acme/tool"))
        .stdout(predicate::str::contains("via seed / cli"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_pick_scrape_uses_metadata_keywords() {
    let workspace = TestWorkspace::new();
    let registry = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<a href="/package/seed">seed</a><a href="/about">about</a>"#),
        )
        .mount(&registry)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/package/seed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "collected": {"metadata": {"keywords": ["parser"]}}
        })))
        .mount(&registry)
        .await;
    Mock::given(method("GET"))
        .and(path("/-/v1/search"))
        .and(query_param("text", "keywords:parser not:insecure,unstable"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&[(
            "peg",
            &[],
            Some("https://github.com/acme/peg"),
        )])))
        .mount(&registry)
        .await;

    let uri = registry.uri();
    workspace
        .command()
        .args(["pick", "--listing", "scrape"])
        .args(["--registry-url", &uri, "--frontend-url", &uri])
        .args(["--metadata-url", &format!("{uri}/v2/package")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Picked https://github.com/acme/peg"))
        .stdout(predicate::str::contains("via seed / parser"));
}
