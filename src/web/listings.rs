use std::sync::Arc;

use askama::Template;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Redirect;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use crate::listings::{
    merge_listings, types::MAX_PRICE, types::MIN_PRICE, BedroomFilter, ListingQuery,
    RawListingQuery, ViewMode,
};
use crate::maps::{resolve_map_link, MapView};
use crate::models::Listing;
use crate::state::AppState;
use crate::web::{render, Nav, PageResult};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/listings", get(listings))
        .route("/map", get(map_redirect))
}

struct BedroomOption {
    value: &'static str,
    label: &'static str,
    checked: bool,
}

#[derive(Template)]
#[template(path = "listings.html")]
struct ListingsTemplate {
    nav: Nav,
    query: ListingQuery,
    listings: Vec<Listing>,
    stored_count: usize,
    is_map: bool,
    map_json: String,
    list_url: String,
    map_url: String,
    reset_url: String,
    bedroom_options: Vec<BedroomOption>,
    dates_label: Option<String>,
    price_floor: i64,
    price_ceiling: i64,
}

/// Merge the visitor's stored listings with the catalog and filter them
pub async fn visible_listings(
    state: &AppState,
    headers: &HeaderMap,
    query: &ListingQuery,
) -> (Vec<Listing>, usize) {
    let session = state.session(headers).await;
    let stored = state.public_stored_listings(session.as_ref()).await;
    let stored_count = stored.len();

    let all = merge_listings(stored, state.catalog.clone());
    (query.apply(all), stored_count)
}

async fn listings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(raw): Query<RawListingQuery>,
) -> PageResult {
    let query = ListingQuery::from(raw);
    let (listings, stored_count) = visible_listings(&state, &headers, &query).await;

    let bedroom_options = BedroomFilter::ALL
        .into_iter()
        .map(|f| BedroomOption {
            value: f.param(),
            label: f.label(),
            checked: f == query.bedrooms,
        })
        .collect();

    render(&ListingsTemplate {
        nav: Nav::for_request(&state, &headers).await,
        is_map: query.view == ViewMode::Map,
        map_json: MapView::for_listings(&listings).to_json(),
        list_url: query.url_with_view(ViewMode::List),
        map_url: query.url_with_view(ViewMode::Map),
        reset_url: query.reset_url(),
        dates_label: query.search.dates_label(),
        bedroom_options,
        stored_count,
        listings,
        query,
        price_floor: MIN_PRICE,
        price_ceiling: MAX_PRICE,
    })
}

#[derive(Deserialize)]
struct MapQuery {
    q: String,
}

/// Resolve a free-text address and send the visitor to Google Maps
async fn map_redirect(State(state): State<Arc<AppState>>, Query(q): Query<MapQuery>) -> Redirect {
    let link = resolve_map_link(state.locator.as_ref(), &q.q).await;
    Redirect::to(&link.url)
}
