use std::sync::Arc;

use askama::Template;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use tracing::info;

use crate::error::AppError;
use crate::models::Listing;
use crate::state::AppState;
use crate::web::{render, Nav, PageResult};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/property/:id", get(details))
        .route("/property/:id/book", post(book))
}

/// Booking request form; nothing is sent anywhere
#[derive(Debug, Deserialize)]
pub struct BookingForm {
    pub move_in: String,
    pub duration: Option<String>,
    pub guests: Option<String>,
}

#[derive(Template)]
#[template(path = "property.html")]
struct PropertyTemplate {
    nav: Nav,
    listing: Listing,
    booked: bool,
    move_in: String,
}

async fn load(state: &AppState, headers: &HeaderMap, id: &str) -> Result<Listing, AppError> {
    let session = state.session(headers).await;
    state
        .find_listing(session.as_ref(), id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Listing {}", id)))
}

async fn details(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> PageResult {
    let listing = load(&state, &headers, &id).await?;

    render(&PropertyTemplate {
        nav: Nav::for_request(&state, &headers).await,
        listing,
        booked: false,
        move_in: String::new(),
    })
}

async fn book(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Form(form): Form<BookingForm>,
) -> PageResult {
    let listing = load(&state, &headers, &id).await?;

    if form.move_in.trim().is_empty() {
        return Err(AppError::BadRequest("Pick a move-in date".to_string()).into());
    }

    info!(
        "Booking request for {} from {} ({:?}, {:?})",
        listing.id, form.move_in, form.duration, form.guests
    );

    render(&PropertyTemplate {
        nav: Nav::for_request(&state, &headers).await,
        listing,
        booked: true,
        move_in: form.move_in,
    })
}
