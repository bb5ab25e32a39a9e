use std::sync::Arc;

use askama::Template;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use tracing::{error, warn};

use crate::error::AppError;
use crate::models::{Category, District, StoredListing};
use crate::state::AppState;
use crate::store::admin::image_url;
use crate::store::{create_listing, delete_listing, AdminListingInput};
use crate::web::{format_vnd, render, Nav, PageError, PageResult};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin", get(dashboard))
        .route("/admin/new", get(new_listing))
        .route("/admin/listings", post(create))
        .route("/admin/listings/:id/delete", post(delete))
}

#[derive(Debug, Default, Deserialize)]
struct DashboardQuery {
    error: Option<String>,
    notice: Option<String>,
}

struct AdminRow {
    id: String,
    title: String,
    category: String,
    district: String,
    price: String,
    thumbnail: Option<String>,
}

impl From<&StoredListing> for AdminRow {
    fn from(listing: &StoredListing) -> Self {
        let vnd = listing
            .price_vnd
            .filter(|v| *v != 0)
            .unwrap_or(listing.price_per_night);

        Self {
            id: listing.id.clone(),
            title: listing.title.clone(),
            category: listing.category_label().to_string(),
            district: listing.district.clone(),
            price: format_vnd(vnd),
            thumbnail: listing.media_urls().first().map(|u| u.to_string()),
        }
    }
}

#[derive(Template)]
#[template(path = "admin_signin.html")]
struct SignInTemplate {
    nav: Nav,
    error: Option<String>,
}

#[derive(Template)]
#[template(path = "admin.html")]
struct DashboardTemplate {
    nav: Nav,
    email: String,
    rows: Vec<AdminRow>,
    notice: Option<String>,
    error: Option<String>,
}

fn sign_in_error(code: &str) -> String {
    match code {
        "profile" => "Login succeeded but user info could not be fetched.".to_string(),
        _ => "Google Sign In failed. Please try again.".to_string(),
    }
}

fn notice_text(code: &str) -> Option<String> {
    match code {
        "created" => Some("Property created successfully!".to_string()),
        "deleted" => Some("Property deleted.".to_string()),
        _ => None,
    }
}

async fn dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<DashboardQuery>,
) -> PageResult {
    let nav = Nav::for_request(&state, &headers).await;

    let Some(admin) = state.admin(&headers).await else {
        return render(&SignInTemplate {
            nav,
            error: query.error.as_deref().map(sign_in_error),
        });
    };

    let (rows, error) = match admin.store.fetch_all().await {
        Ok(listings) => (listings.iter().map(AdminRow::from).collect(), None),
        Err(e) => {
            error!("Failed to load listings for {}: {:#}", admin.user.email, e);
            (Vec::new(), Some("Could not load your listings.".to_string()))
        }
    };

    render(&DashboardTemplate {
        nav,
        email: admin.user.email,
        rows,
        notice: query.notice.as_deref().and_then(notice_text),
        error,
    })
}

/// New listing form as posted by the browser
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminListingForm {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price_vnd: String,
    pub address: String,
    pub district: String,
    pub category: String,
    #[serde(default)]
    pub latitude: String,
    #[serde(default)]
    pub longitude: String,
    /// Image URLs or Drive file ids, one per line
    #[serde(default)]
    pub images: String,
}

fn optional_coordinate(name: &str, raw: &str) -> Result<Option<f64>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|_| format!("{} must be a number", name))
}

impl AdminListingForm {
    /// Parse the submitted strings into a listing input and image URLs
    pub fn parse(&self) -> Result<(AdminListingInput, Vec<String>), String> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err("Title is required".to_string());
        }
        let address = self.address.trim();
        if address.is_empty() {
            return Err("Address is required".to_string());
        }

        let price_vnd: i64 = self
            .price_vnd
            .trim()
            .replace(['.', ','], "")
            .parse()
            .map_err(|_| "Price must be a whole number of VND".to_string())?;
        if price_vnd < 0 {
            return Err("Price cannot be negative".to_string());
        }

        let input = AdminListingInput {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            price_vnd,
            address: address.to_string(),
            district: self.district.parse::<District>()?,
            category: self.category.parse::<Category>()?,
            latitude: optional_coordinate("Latitude", &self.latitude)?,
            longitude: optional_coordinate("Longitude", &self.longitude)?,
        };

        let images = self.images.lines().filter_map(image_url).collect();
        Ok((input, images))
    }
}

/// One `<option>` of a select box
struct Choice {
    value: &'static str,
    selected: bool,
}

fn choices(values: impl IntoIterator<Item = &'static str>, current: &str) -> Vec<Choice> {
    values
        .into_iter()
        .map(|value| Choice {
            value,
            selected: value.eq_ignore_ascii_case(current.trim()),
        })
        .collect()
}

#[derive(Template)]
#[template(path = "admin_form.html")]
struct FormTemplate {
    nav: Nav,
    form: AdminListingForm,
    districts: Vec<Choice>,
    categories: Vec<Choice>,
    error: Option<String>,
}

impl FormTemplate {
    fn new(nav: Nav, form: AdminListingForm, error: Option<String>) -> Self {
        Self {
            nav,
            districts: choices(District::ALL.iter().map(District::as_str), &form.district),
            categories: choices(Category::ALL.iter().map(Category::as_str), &form.category),
            form,
            error,
        }
    }
}

fn blank_form() -> AdminListingForm {
    let defaults = AdminListingInput::default();
    AdminListingForm {
        price_vnd: defaults.price_vnd.to_string(),
        district: defaults.district.to_string(),
        category: defaults.category.to_string(),
        ..Default::default()
    }
}

async fn new_listing(State(state): State<Arc<AppState>>, headers: HeaderMap) -> PageResult {
    if state.admin(&headers).await.is_none() {
        return Err(AppError::Unauthorized.into());
    }

    let nav = Nav::for_request(&state, &headers).await;
    render(&FormTemplate::new(nav, blank_form(), None))
}

async fn create(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<AdminListingForm>,
) -> Result<Response, PageError> {
    let admin = state.admin(&headers).await.ok_or(AppError::Unauthorized)?;
    let nav = Nav::for_request(&state, &headers).await;

    let (input, images) = match form.parse() {
        Ok(parsed) => parsed,
        Err(message) => {
            return Ok(render(&FormTemplate::new(nav, form, Some(message)))?.into_response());
        }
    };

    match create_listing(admin.store.as_ref(), &admin.user, input, &images).await {
        Ok(_) => Ok(Redirect::to("/admin?notice=created").into_response()),
        Err(e) => {
            warn!("Failed to create listing for {}: {:#}", admin.user.email, e);
            let message = "Error: could not save the listing. Please try again.".to_string();
            Ok(render(&FormTemplate::new(nav, form, Some(message)))?.into_response())
        }
    }
}

async fn delete(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Redirect, PageError> {
    let admin = state.admin(&headers).await.ok_or(AppError::Unauthorized)?;
    delete_listing(admin.store.as_ref(), &id).await?;
    Ok(Redirect::to("/admin?notice=deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> AdminListingForm {
        AdminListingForm {
            title: " Riverside flat ".to_string(),
            description: "Two desks".to_string(),
            price_vnd: "18.000.000".to_string(),
            address: "5 Bach Dang".to_string(),
            district: "Hai Chau".to_string(),
            category: "apartment".to_string(),
            latitude: "16.07".to_string(),
            longitude: String::new(),
            images: "https://img/a.jpg\n\n1DriveId\n".to_string(),
        }
    }

    #[test]
    fn parses_a_complete_form() {
        let (input, images) = form().parse().unwrap();
        assert_eq!(input.title, "Riverside flat");
        assert_eq!(input.price_vnd, 18_000_000);
        assert_eq!(input.district, District::HaiChau);
        assert_eq!(input.category, Category::Apartment);
        assert_eq!(input.latitude, Some(16.07));
        assert_eq!(input.longitude, None);
        assert_eq!(
            images,
            vec![
                "https://img/a.jpg".to_string(),
                "https://lh3.googleusercontent.com/d/1DriveId".to_string()
            ]
        );
    }

    #[test]
    fn rejects_bad_values() {
        let mut bad = form();
        bad.district = "Hoi An".to_string();
        assert!(bad.parse().is_err());

        let mut bad = form();
        bad.price_vnd = "cheap".to_string();
        assert!(bad.parse().is_err());

        let mut bad = form();
        bad.latitude = "north".to_string();
        assert_eq!(bad.parse().unwrap_err(), "Latitude must be a number");
    }

    #[test]
    fn admin_rows_prefer_vnd_price() {
        let (input, _) = form().parse().unwrap();
        let listing = StoredListing {
            id: "1".to_string(),
            owner_id: "o".to_string(),
            title: input.title,
            description: None,
            price_per_night: 720,
            price_vnd: Some(input.price_vnd),
            address: input.address,
            district: input.district.to_string(),
            category: None,
            latitude: None,
            longitude: None,
            created_at: chrono::Utc::now(),
            property_media: vec![],
        };

        let row = AdminRow::from(&listing);
        assert_eq!(row.price, "18.000.000 ₫");
        assert_eq!(row.category, "Apartment");
        assert_eq!(row.district, "Hai Chau");
        assert_eq!(row.thumbnail, None);
    }
}
