//! Listing management behind the admin dashboard.
//!
//! Every mutation reads the whole file, changes it in memory and writes the
//! whole file back.

use crate::models::{vnd_to_usd, Category, District, DriveUser, PropertyMedia, StoredListing};
use crate::store::traits::ListingStore;
use anyhow::Result;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

/// Fields entered on the new listing form
#[derive(Debug, Clone, PartialEq)]
pub struct AdminListingInput {
    pub title: String,
    pub description: String,
    pub price_vnd: i64,
    pub address: String,
    pub district: District,
    pub category: Category,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Default for AdminListingInput {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            price_vnd: 15_000_000,
            address: String::new(),
            district: District::SonTra,
            category: Category::Apartment,
            latitude: None,
            longitude: None,
        }
    }
}

/// Turn an image reference into a displayable URL.
///
/// Full URLs are kept as they are; anything else is taken to be a Drive
/// file id and served through the Google user content host.
pub fn image_url(reference: &str) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }
    if reference.starts_with("http://") || reference.starts_with("https://") {
        Some(reference.to_string())
    } else {
        Some(format!("https://lh3.googleusercontent.com/d/{}", reference))
    }
}

/// Build a new record and put it at the front of the stored list
pub async fn create_listing(
    store: &dyn ListingStore,
    owner: &DriveUser,
    input: AdminListingInput,
    images: &[String],
) -> Result<StoredListing> {
    let listing = StoredListing {
        id: Uuid::new_v4().to_string(),
        owner_id: owner.id.clone(),
        title: input.title,
        description: Some(input.description).filter(|d| !d.is_empty()),
        price_per_night: vnd_to_usd(input.price_vnd),
        price_vnd: Some(input.price_vnd),
        address: input.address,
        district: input.district.to_string(),
        category: Some(input.category.to_string()),
        latitude: input.latitude,
        longitude: input.longitude,
        created_at: Utc::now(),
        property_media: images
            .iter()
            .enumerate()
            .map(|(idx, url)| PropertyMedia {
                url: url.clone(),
                sort_order: idx as u32,
            })
            .collect(),
    };

    let mut listings = store.fetch_all().await?;
    listings.insert(0, listing.clone());
    store.save_all(&listings).await?;

    info!(
        "Created listing {} in {} ({} listings total)",
        listing.id,
        store.store_name(),
        listings.len()
    );
    Ok(listing)
}

/// Remove a listing by id; unknown ids leave the file unchanged in content
pub async fn delete_listing(store: &dyn ListingStore, id: &str) -> Result<()> {
    let listings = store.fetch_all().await?;
    let before = listings.len();
    let remaining: Vec<StoredListing> = listings.into_iter().filter(|l| l.id != id).collect();
    store.save_all(&remaining).await?;

    info!(
        "Deleted {} listing(s) with id {} from {}",
        before - remaining.len(),
        id,
        store.store_name()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn owner() -> DriveUser {
        DriveUser {
            email: "host@example.com".to_string(),
            id: "perm-42".to_string(),
        }
    }

    fn input(title: &str) -> AdminListingInput {
        AdminListingInput {
            title: title.to_string(),
            address: "99 Ha Bong".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn image_references() {
        assert_eq!(
            image_url("1AbC").as_deref(),
            Some("https://lh3.googleusercontent.com/d/1AbC")
        );
        assert_eq!(image_url(" https://x/y.jpg ").as_deref(), Some("https://x/y.jpg"));
        assert_eq!(image_url("   "), None);
    }

    #[tokio::test]
    async fn create_prepends_and_converts_price() {
        let store = MemoryStore::new();
        create_listing(&store, &owner(), input("First"), &[]).await.unwrap();

        let images = vec!["https://a".to_string(), "https://b".to_string()];
        let created = create_listing(&store, &owner(), input("Second"), &images)
            .await
            .unwrap();

        assert_eq!(created.owner_id, "perm-42");
        assert_eq!(created.price_per_night, 600);
        assert_eq!(created.district, "Son Tra");
        assert_eq!(created.category.as_deref(), Some("Apartment"));
        assert_eq!(created.description, None);
        assert_eq!(created.property_media[1].sort_order, 1);

        let all = store.fetch_all().await.unwrap();
        let titles: Vec<_> = all.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["Second", "First"]);
        assert_ne!(all[0].id, all[1].id);
    }

    #[tokio::test]
    async fn delete_rewrites_without_the_record() {
        let store = MemoryStore::new();
        let keep = create_listing(&store, &owner(), input("Keep"), &[]).await.unwrap();
        let gone = create_listing(&store, &owner(), input("Drop"), &[]).await.unwrap();

        delete_listing(&store, &gone.id).await.unwrap();
        delete_listing(&store, "unknown").await.unwrap();

        let all = store.fetch_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, keep.id);
    }

    #[tokio::test]
    async fn district_lookup_filters_exact_names() {
        let store = MemoryStore::new();
        create_listing(&store, &owner(), input("Son Tra flat"), &[]).await.unwrap();
        let mut other = input("Hai Chau flat");
        other.district = District::HaiChau;
        create_listing(&store, &owner(), other, &[]).await.unwrap();

        assert_eq!(store.fetch_in_districts(&["Hai Chau"]).await.unwrap().len(), 1);
        assert_eq!(store.fetch_in_districts(&["Hai Chau", "Son Tra"]).await.unwrap().len(), 2);
        assert_eq!(store.fetch_in_districts(&[]).await.unwrap().len(), 2);
        assert!(store.fetch_in_districts(&["Cam Le"]).await.unwrap().is_empty());
    }
}
