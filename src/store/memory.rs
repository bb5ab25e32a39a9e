use crate::models::StoredListing;
use crate::store::traits::ListingStore;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

/// Listings kept in process memory, used in mock mode and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    listings: RwLock<Vec<StoredListing>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ListingStore for MemoryStore {
    async fn fetch_all(&self) -> Result<Vec<StoredListing>> {
        Ok(self.listings.read().await.clone())
    }

    async fn save_all(&self, listings: &[StoredListing]) -> Result<()> {
        debug!("Replacing {} in-memory listings", listings.len());
        *self.listings.write().await = listings.to_vec();
        Ok(())
    }

    fn store_name(&self) -> &'static str {
        "memory"
    }
}
