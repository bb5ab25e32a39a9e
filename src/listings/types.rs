use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Lowest monthly price offered by the price filter (USD)
pub const MIN_PRICE: i64 = 400;
/// Highest monthly price offered by the price filter (USD)
pub const MAX_PRICE: i64 = 5000;

/// Raw query string of the listings page and API, exactly as sent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawListingQuery {
    pub location: Option<String>,
    #[serde(rename = "checkIn")]
    pub check_in: Option<String>,
    #[serde(rename = "checkOut")]
    pub check_out: Option<String>,
    pub guests: Option<String>,
    pub bedrooms: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub view: Option<String>,
}

/// What the visitor searched for on the home page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Free text matched against title, location and description
    pub location: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    /// Number of guests, at least 1
    pub guests: u32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            location: None,
            check_in: None,
            check_out: None,
            guests: 1,
        }
    }
}

impl SearchParams {
    /// Query string for `/listings`, leaving out anything not set
    pub fn to_query(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(location) = &self.location {
            query.append_pair("location", location);
        }
        if let Some(check_in) = &self.check_in {
            query.append_pair("checkIn", check_in);
        }
        if let Some(check_out) = &self.check_out {
            query.append_pair("checkOut", check_out);
        }
        if self.guests > 1 {
            query.append_pair("guests", &self.guests.to_string());
        }
        query.finish()
    }

    /// Link to the listings page for this search
    pub fn listings_url(&self) -> String {
        let query = self.to_query();
        if query.is_empty() {
            "/listings".to_string()
        } else {
            format!("/listings?{}", query)
        }
    }

    pub fn is_active(&self) -> bool {
        self.location.is_some() || self.check_in.is_some() || self.guests > 1
    }

    /// Human readable stay dates for the search chips
    pub fn dates_label(&self) -> Option<String> {
        self.check_in.as_ref().map(|start| match &self.check_out {
            Some(end) => format!("{} to {}", start, end),
            None => format!("{} +", start),
        })
    }
}

/// Bedroom toggle on the listings sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BedroomFilter {
    #[default]
    All,
    Studio,
    One,
    Two,
    ThreePlus,
}

impl BedroomFilter {
    pub const ALL: [BedroomFilter; 5] = [
        BedroomFilter::All,
        BedroomFilter::Studio,
        BedroomFilter::One,
        BedroomFilter::Two,
        BedroomFilter::ThreePlus,
    ];

    /// Value used in the query string
    pub fn param(&self) -> &'static str {
        match self {
            BedroomFilter::All => "All",
            BedroomFilter::Studio => "Studio",
            BedroomFilter::One => "1",
            BedroomFilter::Two => "2",
            BedroomFilter::ThreePlus => "3+",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BedroomFilter::All => "All",
            BedroomFilter::Studio => "Std",
            BedroomFilter::One => "1BR",
            BedroomFilter::Two => "2BR",
            BedroomFilter::ThreePlus => "3BR+",
        }
    }

    /// Unknown values fall back to `All`
    pub fn from_param(value: &str) -> Self {
        BedroomFilter::ALL
            .into_iter()
            .find(|f| f.param() == value.trim())
            .unwrap_or_default()
    }
}

/// Inclusive monthly price window in USD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: i64,
    pub max: i64,
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: MIN_PRICE,
            max: MAX_PRICE,
        }
    }
}

impl PriceRange {
    pub fn contains(&self, price: i64) -> bool {
        price >= self.min && price <= self.max
    }
}

/// List or map presentation of the results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    List,
    Map,
}

/// Everything that narrows down the listings page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListingQuery {
    pub search: SearchParams,
    pub bedrooms: BedroomFilter,
    pub price: PriceRange,
    pub view: ViewMode,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_price(value: Option<String>, default: i64) -> i64 {
    non_empty(value)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl From<RawListingQuery> for ListingQuery {
    fn from(raw: RawListingQuery) -> Self {
        let guests = non_empty(raw.guests)
            .and_then(|g| g.parse::<u32>().ok())
            .unwrap_or(1)
            .max(1);

        Self {
            search: SearchParams {
                location: non_empty(raw.location),
                check_in: non_empty(raw.check_in),
                check_out: non_empty(raw.check_out),
                guests,
            },
            bedrooms: raw
                .bedrooms
                .as_deref()
                .map(BedroomFilter::from_param)
                .unwrap_or_default(),
            price: PriceRange {
                min: parse_price(raw.min_price, MIN_PRICE),
                max: parse_price(raw.max_price, MAX_PRICE),
            },
            view: match raw.view.as_deref() {
                Some("map") => ViewMode::Map,
                _ => ViewMode::List,
            },
        }
    }
}

impl ListingQuery {
    /// Same search with the sidebar filters put back to their defaults
    pub fn reset_url(&self) -> String {
        self.search.listings_url()
    }

    /// Same query with a different presentation
    pub fn url_with_view(&self, view: ViewMode) -> String {
        let mut query = form_urlencoded::Serializer::new(self.search.to_query());
        if self.bedrooms != BedroomFilter::All {
            query.append_pair("bedrooms", self.bedrooms.param());
        }
        if self.price != PriceRange::default() {
            query.append_pair("min_price", &self.price.min.to_string());
            query.append_pair("max_price", &self.price.max.to_string());
        }
        if view == ViewMode::Map {
            query.append_pair("view", "map");
        }
        let query = query.finish();
        if query.is_empty() {
            "/listings".to_string()
        } else {
            format!("/listings?{}", query)
        }
    }
}
