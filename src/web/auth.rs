use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap};
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use tracing::{info, warn};

use crate::auth::{
    clear_login_state_cookie, clear_session_cookie, login_state, login_state_cookie,
    session_cookie, session_id, Session,
};
use crate::error::AppError;
use crate::state::{AppState, Backend};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", get(login))
        .route("/auth/callback", get(callback))
        .route("/auth/logout", post(logout))
}

fn signed_in(session_id: &str) -> Response {
    (
        [(header::SET_COOKIE, session_cookie(session_id))],
        Redirect::to("/admin"),
    )
        .into_response()
}

async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    match &state.backend {
        Backend::Mock { .. } => {
            if state.sessions.from_headers(&headers).await.is_some() {
                return Ok(Redirect::to("/admin").into_response());
            }

            let user = AppState::demo_user();
            info!("Mock sign-in as {}", user.email);
            let id = state
                .sessions
                .create(Session {
                    access_token: "mock-token".to_string(),
                    user: Some(user),
                })
                .await;
            Ok(signed_in(&id))
        }
        Backend::Google { oauth, .. } => {
            let oauth_state = state.sessions.begin_login().await;
            let url = oauth.authorize_url(&oauth_state)?;
            Ok((
                [(header::SET_COOKIE, login_state_cookie(&oauth_state))],
                Redirect::to(&url),
            )
                .into_response())
        }
    }
}

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// Redirect that also drops the login state cookie
fn finish(location: &str, session: Option<&str>) -> Response {
    let mut cookies = vec![(header::SET_COOKIE, clear_login_state_cookie())];
    if let Some(id) = session {
        cookies.push((header::SET_COOKIE, session_cookie(id)));
    }
    (AppendHeaders(cookies), Redirect::to(location)).into_response()
}

async fn callback(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let Backend::Google { oauth, drive } = &state.backend else {
        return Redirect::to("/admin").into_response();
    };

    if let Some(error) = &query.error {
        warn!("Google sign-in refused: {}", error);
        return finish("/admin?error=signin", None);
    }

    let (Some(code), Some(returned_state)) = (query.code, query.state) else {
        return finish("/admin?error=signin", None);
    };

    // the state must come back to the same browser that was sent off
    if login_state(&headers).as_deref() != Some(returned_state.as_str()) {
        warn!("Sign-in callback state does not match this browser");
        return finish("/admin?error=signin", None);
    }

    if !state.sessions.finish_login(&returned_state).await {
        warn!("Sign-in callback with unknown or expired state");
        return finish("/admin?error=signin", None);
    }

    let token = match oauth.exchange_code(&code).await {
        Ok(token) => token,
        Err(e) => {
            warn!("Google sign-in failed: {:#}", e);
            return finish("/admin?error=signin", None);
        }
    };

    let user = match drive.about(&token).await {
        Ok(user) => Some(user),
        Err(e) => {
            warn!("Signed in but could not fetch user info: {:#}", e);
            None
        }
    };
    let location = if user.is_some() {
        "/admin"
    } else {
        "/admin?error=profile"
    };

    let id = state
        .sessions
        .create(Session {
            access_token: token,
            user,
        })
        .await;

    finish(location, Some(&id))
}

async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(id) = session_id(&headers) {
        if let Some(session) = state.sessions.remove(&id).await {
            if let Backend::Google { oauth, .. } = &state.backend {
                oauth.revoke(&session.access_token).await;
            }
            info!("Signed out");
        }
    }

    (
        [(header::SET_COOKIE, clear_session_cookie())],
        Redirect::to("/"),
    )
        .into_response()
}
