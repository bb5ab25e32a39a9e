use serde::Serialize;

use crate::models::Listing;

/// Da Nang city centre
pub const CITY_CENTER: (f64, f64) = (16.0544, 108.2022);
pub const DEFAULT_ZOOM: u8 = 13;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MapMarker {
    pub id: String,
    pub title: String,
    pub price: i64,
    pub lat: f64,
    pub lng: f64,
    pub url: String,
}

/// South-west and north-east corners
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Bounds {
    pub south_west: [f64; 2],
    pub north_east: [f64; 2],
}

impl Bounds {
    fn around(lat: f64, lng: f64) -> Self {
        Self {
            south_west: [lat, lng],
            north_east: [lat, lng],
        }
    }

    fn extend(&mut self, lat: f64, lng: f64) {
        self.south_west[0] = self.south_west[0].min(lat);
        self.south_west[1] = self.south_west[1].min(lng);
        self.north_east[0] = self.north_east[0].max(lat);
        self.north_east[1] = self.north_east[1].max(lng);
    }
}

/// Everything the browser-side map needs to draw the current results.
///
/// Rebuilt for every response, so markers always mirror the filtered list.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MapView {
    pub center: [f64; 2],
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
    /// Present when at least one marker exists; the map fits to it
    pub bounds: Option<Bounds>,
}

impl MapView {
    pub fn for_listings(listings: &[Listing]) -> Self {
        let mut bounds: Option<Bounds> = None;
        let mut markers = Vec::new();

        for listing in listings {
            let Some((lat, lng)) = listing.coordinates() else {
                continue;
            };

            match bounds.as_mut() {
                Some(b) => b.extend(lat, lng),
                None => bounds = Some(Bounds::around(lat, lng)),
            }

            markers.push(MapMarker {
                id: listing.id.clone(),
                title: listing.title.clone(),
                price: listing.price,
                lat,
                lng,
                url: format!("/property/{}", listing.id),
            });
        }

        Self {
            center: [CITY_CENTER.0, CITY_CENTER.1],
            zoom: DEFAULT_ZOOM,
            markers,
            bounds,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog;

    #[test]
    fn markers_skip_listings_without_coordinates() {
        let listings = catalog();
        let view = MapView::for_listings(&listings);

        let with_coords = listings.iter().filter(|l| l.coordinates().is_some()).count();
        assert_eq!(view.markers.len(), with_coords);
        assert!(view.markers.iter().all(|m| m.url == format!("/property/{}", m.id)));
    }

    #[test]
    fn bounds_cover_every_marker() {
        let view = MapView::for_listings(&catalog());
        let bounds = view.bounds.unwrap();

        for marker in &view.markers {
            assert!(marker.lat >= bounds.south_west[0] && marker.lat <= bounds.north_east[0]);
            assert!(marker.lng >= bounds.south_west[1] && marker.lng <= bounds.north_east[1]);
        }
    }

    #[test]
    fn empty_results_keep_city_view() {
        let view = MapView::for_listings(&[]);
        assert!(view.markers.is_empty());
        assert_eq!(view.bounds, None);
        assert_eq!(view.center, [16.0544, 108.2022]);
        assert!(view.to_json().contains("\"zoom\":13"));
    }
}
