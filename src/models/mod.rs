use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod catalog;

pub use catalog::catalog;

/// VND per US dollar used when converting stored prices for display
pub const VND_PER_USD: f64 = 25_000.0;

/// Shown when a stored listing has no media attached
pub const PLACEHOLDER_IMAGE: &str = "https://placehold.co/600x400?text=No+Image";

/// Flat monthly service fee charged by booking platforms (USD)
pub const OTA_SERVICE_FEE: i64 = 50;

/// Where a listing shown to visitors came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Catalog,
    Drive,
}

/// Da Nang districts offered by the admin form
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum District {
    #[serde(rename = "Hai Chau")]
    HaiChau,
    #[serde(rename = "Son Tra")]
    SonTra,
    #[serde(rename = "Ngu Hanh Son")]
    NguHanhSon,
    #[serde(rename = "Lien Chieu")]
    LienChieu,
    #[serde(rename = "Thanh Khe")]
    ThanhKhe,
    #[serde(rename = "Cam Le")]
    CamLe,
}

impl District {
    pub const ALL: [District; 6] = [
        District::HaiChau,
        District::SonTra,
        District::NguHanhSon,
        District::LienChieu,
        District::ThanhKhe,
        District::CamLe,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            District::HaiChau => "Hai Chau",
            District::SonTra => "Son Tra",
            District::NguHanhSon => "Ngu Hanh Son",
            District::LienChieu => "Lien Chieu",
            District::ThanhKhe => "Thanh Khe",
            District::CamLe => "Cam Le",
        }
    }
}

impl fmt::Display for District {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for District {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        District::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown district: {}", s))
    }
}

/// Property category offered by the admin form
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Category {
    Villa,
    Apartment,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Villa, Category::Apartment];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Villa => "Villa",
            Category::Apartment => "Apartment",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category: {}", s))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One image attached to a stored listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyMedia {
    pub url: String,
    pub sort_order: u32,
}

/// A listing as persisted in the remote JSON file.
///
/// District and category are kept as free strings: the file is edited by
/// hand as often as through the admin form, so nothing here is validated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredListing {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub price_per_night: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_vnd: Option<i64>,
    pub address: String,
    pub district: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub property_media: Vec<PropertyMedia>,
}

impl StoredListing {
    /// Monthly price in USD as shown on listing cards.
    ///
    /// A positive `price_vnd` wins and is converted at 25,000 VND per USD.
    /// Older records without one fall back to `price_per_night * 30`.
    pub fn monthly_usd(&self) -> i64 {
        match self.price_vnd {
            Some(vnd) if vnd > 0 => vnd_to_usd(vnd),
            _ => self.price_per_night * 30,
        }
    }

    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or("Apartment")
    }

    /// Media URLs ordered by their sort order
    pub fn media_urls(&self) -> Vec<&str> {
        let mut media: Vec<&PropertyMedia> = self.property_media.iter().collect();
        media.sort_by_key(|m| m.sort_order);
        media.into_iter().map(|m| m.url.as_str()).collect()
    }

    /// Convert into the browse model used by the listings pages
    pub fn to_listing(&self) -> Listing {
        Listing {
            id: self.id.clone(),
            title: self.title.clone(),
            location: format!("{}, {}", self.address, self.district),
            distance: Some(self.district.clone()),
            rating: 5.0,
            price: self.monthly_usd(),
            image: self
                .media_urls()
                .first()
                .map(|url| url.to_string())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            wifi: "Speed Check Pending".to_string(),
            amenities: vec!["Desk".to_string(), "AC".to_string()],
            reviews: Some(0),
            desc: format!("{} • Drive CMS", self.district),
            kind: self.category_label().to_string(),
            nomad_score: None,
            latitude: self.latitude,
            longitude: self.longitude,
            source: Source::Drive,
        }
    }
}

/// Round a VND amount to whole US dollars
pub fn vnd_to_usd(vnd: i64) -> i64 {
    (vnd as f64 / VND_PER_USD).round() as i64
}

/// Core listing model rendered on the browse and detail pages
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub location: String,
    pub distance: Option<String>,
    pub rating: f32,
    /// USD per month
    pub price: i64,
    pub image: String,
    pub wifi: String,
    pub amenities: Vec<String>,
    pub reviews: Option<u32>,
    pub desc: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub nomad_score: Option<u32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub source: Source,
}

impl Listing {
    pub fn is_stored(&self) -> bool {
        self.source == Source::Drive
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }

    /// Free-text query handed to the map locator
    pub fn map_query(&self) -> String {
        format!("{}, Da Nang", self.location)
    }

    /// Link to the map redirect for this listing
    pub fn map_href(&self) -> String {
        let query: String = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("q", &self.map_query())
            .finish();
        format!("/map?{}", query)
    }

    /// What the same stay costs through a booking platform, before fees
    pub fn ota_monthly(&self) -> i64 {
        (self.price as f64 * 1.3).round() as i64
    }

    pub fn ota_total(&self) -> i64 {
        self.ota_monthly() + OTA_SERVICE_FEE
    }

    pub fn headline_amenity(&self) -> &str {
        self.amenities.first().map(String::as_str).unwrap_or("Desk")
    }

    pub fn score(&self) -> u32 {
        self.nomad_score.unwrap_or(85)
    }
}

/// The Google account behind a signed-in session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DriveUser {
    pub email: String,
    /// Drive permission id, used as the listing owner id
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stored() -> StoredListing {
        StoredListing {
            id: "abc".to_string(),
            owner_id: "owner".to_string(),
            title: "Sea view loft".to_string(),
            description: None,
            price_per_night: 600,
            price_vnd: Some(15_000_000),
            address: "12 Vo Nguyen Giap".to_string(),
            district: "Son Tra".to_string(),
            category: None,
            latitude: None,
            longitude: None,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
            property_media: vec![
                PropertyMedia { url: "https://img/2".to_string(), sort_order: 1 },
                PropertyMedia { url: "https://img/1".to_string(), sort_order: 0 },
            ],
        }
    }

    #[test]
    fn stored_listing_maps_to_browse_model() {
        let listing = stored().to_listing();

        assert_eq!(listing.location, "12 Vo Nguyen Giap, Son Tra");
        assert_eq!(listing.distance.as_deref(), Some("Son Tra"));
        assert_eq!(listing.price, 600);
        assert_eq!(listing.image, "https://img/1");
        assert_eq!(listing.kind, "Apartment");
        assert_eq!(listing.desc, "Son Tra • Drive CMS");
        assert!(listing.is_stored());
    }

    #[test]
    fn legacy_records_fall_back_to_nightly_price() {
        let mut record = stored();
        record.price_vnd = None;
        record.price_per_night = 20;
        record.property_media.clear();

        let listing = record.to_listing();
        assert_eq!(listing.price, 600);
        assert_eq!(listing.image, PLACEHOLDER_IMAGE);
    }

    #[test]
    fn vnd_price_takes_precedence_over_nightly() {
        let mut record = stored();
        record.price_per_night = 20;
        record.price_vnd = Some(25_000_000);
        assert_eq!(record.monthly_usd(), 1000);

        record.price_vnd = Some(0);
        assert_eq!(record.monthly_usd(), 600);
    }

    #[test]
    fn reads_records_with_missing_optional_fields() {
        let raw = r#"{
            "id": "x1",
            "owner_id": "o",
            "title": "Plain",
            "description": null,
            "price_per_night": 12,
            "address": "1 Tran Phu",
            "district": "Hai Chau",
            "latitude": null,
            "longitude": null,
            "created_at": "2024-01-01T00:00:00Z",
            "extra": "ignored"
        }"#;

        let record: StoredListing = serde_json::from_str(raw).unwrap();
        assert_eq!(record.category, None);
        assert!(record.property_media.is_empty());
        assert_eq!(record.monthly_usd(), 360);
    }

    #[test]
    fn map_href_encodes_the_city_query() {
        let listing = stored().to_listing();
        assert_eq!(
            listing.map_href(),
            "/map?q=12+Vo+Nguyen+Giap%2C+Son+Tra%2C+Da+Nang"
        );
        assert_eq!(listing.ota_monthly(), 780);
        assert_eq!(listing.ota_total(), 830);
    }

    #[test]
    fn districts_parse_case_insensitively() {
        assert_eq!("son tra".parse::<District>(), Ok(District::SonTra));
        assert!("Hoi An".parse::<District>().is_err());
        assert_eq!(
            serde_json::to_string(&District::NguHanhSon).unwrap(),
            "\"Ngu Hanh Son\""
        );
    }
}
