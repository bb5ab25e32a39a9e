use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::listings::{ListingQuery, RawListingQuery};
use crate::maps::{resolve_map_link, MapLink};
use crate::models::Listing;
use crate::state::AppState;
use crate::web::listings::visible_listings;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/api/listings", get(listings))
        .route("/api/map-link", get(map_link))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    mode: &'static str,
    timestamp: String,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        mode: if state.is_mock() { "mock" } else { "google" },
        timestamp: Utc::now().to_rfc3339(),
    })
}

#[derive(Serialize)]
struct ListingsResponse {
    count: usize,
    stored_count: usize,
    listings: Vec<Listing>,
}

async fn listings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(raw): Query<RawListingQuery>,
) -> Json<ListingsResponse> {
    let query = ListingQuery::from(raw);
    let (listings, stored_count) = visible_listings(&state, &headers, &query).await;

    Json(ListingsResponse {
        count: listings.len(),
        stored_count,
        listings,
    })
}

#[derive(Deserialize)]
struct MapLinkQuery {
    q: Option<String>,
}

async fn map_link(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MapLinkQuery>,
) -> Result<Json<MapLink>, AppError> {
    let q = query
        .q
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing query parameter q".to_string()))?;

    Ok(Json(resolve_map_link(state.locator.as_ref(), &q).await))
}
