use super::{Listing, Source};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Hand-picked Da Nang stays shown to every visitor.
///
/// The first three double as the featured listings on the home page.
pub fn catalog() -> Vec<Listing> {
    vec![
        Listing {
            id: "my-khe-ocean-loft".to_string(),
            title: "My Khe Ocean Loft".to_string(),
            location: "My Khe Beach, Son Tra".to_string(),
            distance: Some("2 mins".to_string()),
            rating: 4.9,
            price: 1200,
            image: "https://images.unsplash.com/photo-1502672260266-1c1ef2d93688?w=800".to_string(),
            wifi: "300 Mbps".to_string(),
            amenities: strings(&["Ergonomic Chair", "Standing Desk", "Sea View"]),
            reviews: Some(128),
            desc: "Beachfront loft with a dedicated work corner".to_string(),
            kind: "Loft".to_string(),
            nomad_score: Some(96),
            latitude: Some(16.0610),
            longitude: Some(108.2460),
            source: Source::Catalog,
        },
        Listing {
            id: "han-river-studio".to_string(),
            title: "Han River Studio".to_string(),
            location: "Bach Dang, Hai Chau".to_string(),
            distance: Some("10 mins".to_string()),
            rating: 4.7,
            price: 650,
            image: "https://images.unsplash.com/photo-1522708323590-d24dbb6b0267?w=800".to_string(),
            wifi: "150 Mbps".to_string(),
            amenities: strings(&["Desk", "Kitchenette", "River View"]),
            reviews: Some(64),
            desc: "Compact studio above the riverside cafes".to_string(),
            kind: "Studio".to_string(),
            nomad_score: Some(88),
            latitude: Some(16.0678),
            longitude: Some(108.2240),
            source: Source::Catalog,
        },
        Listing {
            id: "an-thuong-nomad-suite".to_string(),
            title: "An Thuong Nomad Suite".to_string(),
            location: "An Thuong, Ngu Hanh Son".to_string(),
            distance: Some("5 mins".to_string()),
            rating: 4.8,
            price: 900,
            image: "https://images.unsplash.com/photo-1560448204-e02f11c3d0e2?w=800".to_string(),
            wifi: "200 Mbps".to_string(),
            amenities: strings(&["Monitor", "Coworking Pass", "Gym"]),
            reviews: Some(91),
            desc: "Suite in the expat quarter, steps from coworking spaces".to_string(),
            kind: "Suite".to_string(),
            nomad_score: Some(93),
            latitude: Some(16.0475),
            longitude: Some(108.2441),
            source: Source::Catalog,
        },
        Listing {
            id: "dragon-bridge-1br".to_string(),
            title: "Dragon Bridge One Bedroom".to_string(),
            location: "Tran Hung Dao, Son Tra".to_string(),
            distance: Some("12 mins".to_string()),
            rating: 4.6,
            price: 780,
            image: "https://images.unsplash.com/photo-1493809842364-78817add7ffb?w=800".to_string(),
            wifi: "120 Mbps".to_string(),
            amenities: strings(&["Desk", "Balcony", "Washer"]),
            reviews: Some(37),
            desc: "Quiet one bedroom with bridge views".to_string(),
            kind: "1BR".to_string(),
            nomad_score: Some(84),
            latitude: Some(16.0612),
            longitude: Some(108.2297),
            source: Source::Catalog,
        },
        Listing {
            id: "pham-van-dong-2br".to_string(),
            title: "Pham Van Dong Family Flat".to_string(),
            location: "Pham Van Dong, Son Tra".to_string(),
            distance: Some("4 mins".to_string()),
            rating: 4.5,
            price: 1450,
            image: "https://images.unsplash.com/photo-1484154218962-a197022b5858?w=800".to_string(),
            wifi: "250 Mbps".to_string(),
            amenities: strings(&["Two Desks", "Pool", "Parking"]),
            reviews: Some(22),
            desc: "Two bedrooms for couples who both work remotely".to_string(),
            kind: "2BR".to_string(),
            nomad_score: Some(87),
            latitude: Some(16.0718),
            longitude: Some(108.2425),
            source: Source::Catalog,
        },
        Listing {
            id: "marble-mountains-3br".to_string(),
            title: "Marble Mountains House".to_string(),
            location: "Hoa Hai, Ngu Hanh Son".to_string(),
            distance: Some("8 mins".to_string()),
            rating: 4.7,
            price: 2100,
            image: "https://images.unsplash.com/photo-1512917774080-9991f1c4c750?w=800".to_string(),
            wifi: "200 Mbps".to_string(),
            amenities: strings(&["Office Room", "Garden", "Bikes"]),
            reviews: Some(15),
            desc: "Three bedroom house for small remote teams".to_string(),
            kind: "3BR".to_string(),
            nomad_score: Some(82),
            latitude: Some(16.0034),
            longitude: Some(108.2630),
            source: Source::Catalog,
        },
        Listing {
            id: "son-tra-peninsula-villa".to_string(),
            title: "Son Tra Peninsula Villa".to_string(),
            location: "Son Tra Peninsula, Son Tra".to_string(),
            distance: Some("15 mins".to_string()),
            rating: 5.0,
            price: 4200,
            image: "https://images.unsplash.com/photo-1613490493576-7fde63acd811?w=800".to_string(),
            wifi: "500 Mbps".to_string(),
            amenities: strings(&["Private Pool", "Meeting Room", "Chef"]),
            reviews: Some(9),
            desc: "Hillside villa for retreats and team offsites".to_string(),
            kind: "Villa".to_string(),
            nomad_score: Some(90),
            latitude: Some(16.1000),
            longitude: Some(108.2770),
            source: Source::Catalog,
        },
        Listing {
            id: "thanh-khe-budget-1br".to_string(),
            title: "Thanh Khe Local Living".to_string(),
            location: "Dien Bien Phu, Thanh Khe".to_string(),
            distance: None,
            rating: 4.3,
            price: 450,
            image: "https://images.unsplash.com/photo-1505691938895-1758d7feb511?w=800".to_string(),
            wifi: "80 Mbps".to_string(),
            amenities: vec![],
            reviews: Some(11),
            desc: "Affordable one bedroom near the local markets".to_string(),
            kind: "1BR".to_string(),
            nomad_score: None,
            latitude: None,
            longitude: None,
            source: Source::Catalog,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_ids_are_unique() {
        let listings = catalog();
        let ids: HashSet<_> = listings.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids.len(), listings.len());
        assert!(listings.iter().all(|l| l.source == Source::Catalog));
    }
}
