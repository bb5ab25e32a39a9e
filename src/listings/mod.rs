pub mod filter;
pub mod types;

pub use filter::{capacity, merge_listings};
pub use types::{BedroomFilter, ListingQuery, PriceRange, RawListingQuery, SearchParams, ViewMode};

/// Districts whose stored listings appear on the public listings page
pub const PUBLIC_DISTRICTS: [&str; 3] = ["Son Tra", "Hai Chau", "Ngu Hanh Son"];
