use crate::models::StoredListing;
use anyhow::Result;
use async_trait::async_trait;

/// Persistence for the listings file.
///
/// The whole list is read and written at once; there is no per-record
/// addressing and concurrent writers simply overwrite each other.
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Every stored listing, in file order
    async fn fetch_all(&self) -> Result<Vec<StoredListing>>;

    /// Replace the stored list wholesale
    async fn save_all(&self, listings: &[StoredListing]) -> Result<()>;

    /// Name of the backing store, for logs
    fn store_name(&self) -> &'static str;

    /// Listings in any of the given districts; no districts means everything.
    ///
    /// District names must match exactly, as written in the file.
    async fn fetch_in_districts(&self, districts: &[&str]) -> Result<Vec<StoredListing>> {
        let all = self.fetch_all().await?;
        if districts.is_empty() {
            return Ok(all);
        }
        Ok(all
            .into_iter()
            .filter(|l| districts.contains(&l.district.as_str()))
            .collect())
    }
}
