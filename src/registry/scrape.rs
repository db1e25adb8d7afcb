//! Package names from the registry web front-end
//!
//! Used when the search API is not available: the landing page links to
//! recently published packages as `<a href="/package/<name>">`.

use std::collections::HashSet;

use scraper::{Html, Selector};

/// Path prefix of package pages on the front-end
pub const PACKAGE_PATH_PREFIX: &str = "/package/";

/// Anchor targets under `prefix`, with the prefix stripped, deduplicated in
/// document order.
pub fn links_with_prefix(html: &str, prefix: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(anchors) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    document
        .select(&anchors)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(|href| href.strip_prefix(prefix))
        .map(|rest| {
            let end = rest.find(['?', '#']).unwrap_or(rest.len());
            rest[..end].trim_end_matches('/')
        })
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert((*name).to_string()))
        .map(str::to_string)
        .collect()
}
