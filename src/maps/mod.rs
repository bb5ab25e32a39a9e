pub mod gemini;
pub mod traits;
pub mod view;

pub use gemini::GeminiLocator;
pub use traits::{MapLocation, MapLocator, OfflineLocator};
pub use view::MapView;

use serde::Serialize;
use tracing::warn;
use url::Url;

const SEARCH_URL: &str = "https://www.google.com/maps/search/";

/// Where a "view on map" link points
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MapLink {
    pub url: String,
    pub title: Option<String>,
    /// False when the plain search fallback was used
    pub grounded: bool,
}

/// Plain Google Maps search for the query
pub fn fallback_url(query: &str) -> String {
    match Url::parse_with_params(SEARCH_URL, &[("api", "1"), ("query", query)]) {
        Ok(url) => url.into(),
        Err(_) => SEARCH_URL.to_string(),
    }
}

/// Resolve a map link, falling back to a search URL on any failure
pub async fn resolve_map_link(locator: &dyn MapLocator, query: &str) -> MapLink {
    match locator.locate(query).await {
        Ok(Some(location)) => MapLink {
            url: location.uri,
            title: Some(location.title).filter(|t| !t.is_empty()),
            grounded: true,
        },
        Ok(None) => fallback(query),
        Err(e) => {
            warn!(
                "{} locator failed for {:?}: {:#}",
                locator.locator_name(),
                query,
                e
            );
            fallback(query)
        }
    }
}

fn fallback(query: &str) -> MapLink {
    MapLink {
        url: fallback_url(query),
        title: None,
        grounded: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;

    struct FailingLocator;

    #[async_trait]
    impl MapLocator for FailingLocator {
        async fn locate(&self, _query: &str) -> Result<Option<MapLocation>> {
            anyhow::bail!("quota exceeded")
        }

        fn locator_name(&self) -> &'static str {
            "failing"
        }
    }

    struct FixedLocator;

    #[async_trait]
    impl MapLocator for FixedLocator {
        async fn locate(&self, _query: &str) -> Result<Option<MapLocation>> {
            Ok(Some(MapLocation {
                uri: "https://maps.google.com/?cid=1".to_string(),
                title: "My Khe Beach".to_string(),
            }))
        }

        fn locator_name(&self) -> &'static str {
            "fixed"
        }
    }

    #[test]
    fn fallback_is_a_plain_search() {
        assert_eq!(
            fallback_url("My Khe Beach, Da Nang"),
            "https://www.google.com/maps/search/?api=1&query=My+Khe+Beach%2C+Da+Nang"
        );
    }

    #[tokio::test]
    async fn errors_and_misses_degrade_to_fallback() {
        let link = resolve_map_link(&FailingLocator, "Hai Chau").await;
        assert!(!link.grounded);
        assert_eq!(link.url, fallback_url("Hai Chau"));

        let link = resolve_map_link(&OfflineLocator, "Hai Chau").await;
        assert!(!link.grounded);
    }

    #[tokio::test]
    async fn grounded_links_win() {
        let link = resolve_map_link(&FixedLocator, "My Khe").await;
        assert!(link.grounded);
        assert_eq!(link.title.as_deref(), Some("My Khe Beach"));
        assert_eq!(link.url, "https://maps.google.com/?cid=1");
    }
}
