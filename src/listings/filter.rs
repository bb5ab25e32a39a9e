use std::collections::HashMap;

use crate::listings::types::{BedroomFilter, ListingQuery};
use crate::models::Listing;

/// Estimate how many guests a property sleeps from its type label
pub fn capacity(kind: &str) -> u32 {
    let kind = kind.to_lowercase();
    if kind.contains("villa") {
        8
    } else if kind.contains("3br") || kind.contains("3 bedroom") {
        6
    } else if kind.contains("2br") || kind.contains("2 bedroom") {
        4
    } else {
        // Studio, 1BR, Suite, Loft
        2
    }
}

impl BedroomFilter {
    pub fn accepts(&self, kind: &str) -> bool {
        match self {
            BedroomFilter::All => true,
            BedroomFilter::Studio => kind == "Studio",
            BedroomFilter::One => matches!(kind, "1BR" | "Loft" | "Suite" | "Apartment"),
            BedroomFilter::Two => kind == "2BR",
            BedroomFilter::ThreePlus => matches!(kind, "3BR" | "Villa"),
        }
    }
}

impl ListingQuery {
    /// Whether a listing passes every active criterion
    pub fn matches(&self, listing: &Listing) -> bool {
        if let Some(location) = &self.search.location {
            let needle = location.to_lowercase();
            let hit = listing.title.to_lowercase().contains(&needle)
                || listing.location.to_lowercase().contains(&needle)
                || listing.desc.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }

        if self.search.guests > 1 && capacity(&listing.kind) < self.search.guests {
            return false;
        }

        if !self.price.contains(listing.price) {
            return false;
        }

        self.bedrooms.accepts(&listing.kind)
    }

    pub fn apply(&self, listings: Vec<Listing>) -> Vec<Listing> {
        listings.into_iter().filter(|l| self.matches(l)).collect()
    }
}

/// Stored listings first, then the catalog.
///
/// Stored records are deduplicated by id: a repeated id keeps the position of
/// its first occurrence and the contents of its last.
pub fn merge_listings(stored: Vec<Listing>, catalog: Vec<Listing>) -> Vec<Listing> {
    let mut merged: Vec<Listing> = Vec::with_capacity(stored.len() + catalog.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for listing in stored {
        match positions.get(&listing.id) {
            Some(&idx) => merged[idx] = listing,
            None => {
                positions.insert(listing.id.clone(), merged.len());
                merged.push(listing);
            }
        }
    }

    merged.extend(catalog);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listings::types::{PriceRange, SearchParams};
    use crate::models::catalog;

    fn ids(listings: &[Listing]) -> Vec<&str> {
        listings.iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn capacity_follows_type_label() {
        assert_eq!(capacity("Luxury Villa"), 8);
        assert_eq!(capacity("3BR"), 6);
        assert_eq!(capacity("Spacious 2 Bedroom"), 4);
        assert_eq!(capacity("Studio"), 2);
        assert_eq!(capacity("Apartment"), 2);
    }

    #[test]
    fn default_query_keeps_whole_catalog() {
        let all = catalog();
        let filtered = ListingQuery::default().apply(all.clone());
        assert_eq!(filtered.len(), all.len());
    }

    #[test]
    fn text_match_checks_title_location_and_description() {
        let query = ListingQuery {
            search: SearchParams {
                location: Some("NGU HANH".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let filtered = query.apply(catalog());
        assert_eq!(ids(&filtered), vec!["an-thuong-nomad-suite", "marble-mountains-3br"]);

        let query = ListingQuery {
            search: SearchParams {
                location: Some("coworking".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(catalog())), vec!["an-thuong-nomad-suite"]);
    }

    #[test]
    fn guests_filter_uses_estimated_capacity() {
        let query = ListingQuery {
            search: SearchParams {
                guests: 5,
                ..Default::default()
            },
            ..Default::default()
        };
        let filtered = query.apply(catalog());
        assert_eq!(ids(&filtered), vec!["marble-mountains-3br", "son-tra-peninsula-villa"]);
    }

    #[test]
    fn price_and_bedrooms_combine() {
        let query = ListingQuery {
            bedrooms: BedroomFilter::One,
            price: PriceRange { min: 400, max: 800 },
            ..Default::default()
        };
        let filtered = query.apply(catalog());
        assert_eq!(ids(&filtered), vec!["dragon-bridge-1br", "thanh-khe-budget-1br"]);
    }

    #[test]
    fn bedroom_groups() {
        assert!(BedroomFilter::One.accepts("Apartment"));
        assert!(BedroomFilter::ThreePlus.accepts("Villa"));
        assert!(!BedroomFilter::Two.accepts("3BR"));
        assert!(!BedroomFilter::Studio.accepts("studio"));
    }

    #[test]
    fn merge_deduplicates_stored_records() {
        let mut first = catalog()[0].clone();
        first.id = "dup".to_string();
        let mut other = catalog()[1].clone();
        other.id = "other".to_string();
        let mut second = first.clone();
        second.title = "Updated".to_string();

        let merged = merge_listings(vec![first, other, second], vec![catalog()[2].clone()]);
        assert_eq!(ids(&merged), vec!["dup", "other", "an-thuong-nomad-suite"]);
        assert_eq!(merged[0].title, "Updated");
    }
}
