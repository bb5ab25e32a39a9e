use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A resolved place on Google Maps
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapLocation {
    pub uri: String,
    pub title: String,
}

/// Resolves a free-text address into a map location
#[async_trait]
pub trait MapLocator: Send + Sync {
    /// `Ok(None)` when the address could not be pinned down
    async fn locate(&self, query: &str) -> Result<Option<MapLocation>>;

    fn locator_name(&self) -> &'static str;
}

/// Locator used when no grounding service is configured
pub struct OfflineLocator;

#[async_trait]
impl MapLocator for OfflineLocator {
    async fn locate(&self, _query: &str) -> Result<Option<MapLocation>> {
        Ok(None)
    }

    fn locator_name(&self) -> &'static str {
        "offline"
    }
}
