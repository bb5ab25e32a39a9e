use std::sync::Arc;

use askama::Template;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Redirect;
use axum::routing::{get, post};
use axum::{Form, Router};

use crate::listings::{ListingQuery, RawListingQuery};
use crate::models::Listing;
use crate::state::AppState;
use crate::web::{render, Nav, PageResult};

const FEATURED_COUNT: usize = 3;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(home))
        .route("/search", post(search))
        .route("/about", get(about))
}

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    nav: Nav,
    featured: Vec<Listing>,
    guest_options: Vec<(u32, &'static str)>,
}

async fn home(State(state): State<Arc<AppState>>, headers: HeaderMap) -> PageResult {
    render(&HomeTemplate {
        nav: Nav::for_request(&state, &headers).await,
        featured: state.catalog.iter().take(FEATURED_COUNT).cloned().collect(),
        guest_options: vec![
            (1, "1 Guest"),
            (2, "2 Guests"),
            (3, "3 Guests"),
            (4, "4+ Guests"),
        ],
    })
}

/// Home page search box: drop whatever was left empty and go to the results
async fn search(Form(raw): Form<RawListingQuery>) -> Redirect {
    let query = ListingQuery::from(raw);
    Redirect::to(&query.search.listings_url())
}

#[derive(Template)]
#[template(path = "about.html")]
struct AboutTemplate {
    nav: Nav,
}

async fn about(State(state): State<Arc<AppState>>, headers: HeaderMap) -> PageResult {
    render(&AboutTemplate {
        nav: Nav::for_request(&state, &headers).await,
    })
}
