pub mod admin;
pub mod api;
pub mod auth;
pub mod listings;
pub mod pages;
pub mod property;

use std::sync::Arc;

use askama::Template;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

/// The whole site: pages, sign-in, JSON API and static assets
pub fn router(state: Arc<AppState>) -> Router {
    let static_dir = ServeDir::new(&state.config.static_dir);

    Router::new()
        .merge(pages::router())
        .merge(listings::router())
        .merge(property::router())
        .merge(admin::router())
        .merge(auth::router())
        .merge(api::router())
        .nest_service("/static", static_dir)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Header state shared by every page
#[derive(Debug, Clone, Default)]
pub struct Nav {
    pub signed_in: bool,
    pub mock: bool,
}

impl Nav {
    pub async fn for_request(state: &AppState, headers: &HeaderMap) -> Self {
        Self {
            signed_in: state.session(headers).await.is_some(),
            mock: state.is_mock(),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    nav: Nav,
    code: u16,
    message: String,
}

/// Error rendered as a page instead of JSON
#[derive(Debug)]
pub struct PageError(pub AppError);

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        PageError(err)
    }
}

impl From<askama::Error> for PageError {
    fn from(err: askama::Error) -> Self {
        PageError(AppError::Template(err))
    }
}

impl From<anyhow::Error> for PageError {
    fn from(err: anyhow::Error) -> Self {
        PageError(AppError::Upstream(err))
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        if status.is_server_error() {
            tracing::error!("{}", self.0);
        }

        let page = ErrorTemplate {
            nav: Nav::default(),
            code: status.as_u16(),
            message: self.0.public_message(),
        };

        match page.render() {
            Ok(body) => (status, Html(body)).into_response(),
            Err(_) => (status, page.message).into_response(),
        }
    }
}

pub type PageResult = Result<Html<String>, PageError>;

pub fn render<T: Template>(template: &T) -> PageResult {
    Ok(Html(template.render()?))
}

async fn not_found() -> impl IntoResponse {
    PageError(AppError::NotFound("Page".to_string())).into_response()
}

/// VND amount the way Vietnamese locales print it, e.g. `15.000.000 ₫`
pub fn format_vnd(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0 { "-" } else { "" };
    format!("{}{} ₫", sign, grouped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vnd_grouping() {
        assert_eq!(format_vnd(15_000_000), "15.000.000 ₫");
        assert_eq!(format_vnd(950), "950 ₫");
        assert_eq!(format_vnd(0), "0 ₫");
        assert_eq!(format_vnd(-1234), "-1.234 ₫");
    }
}
