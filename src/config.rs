use std::{env, fmt::Display, str::FromStr};

use anyhow::{Context, Result};
use tracing::{debug, info};

/// Google OAuth client registration
#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Externally visible origin, used for the OAuth redirect
    pub public_url: String,
    /// `None` runs the site in mock mode with an in-memory store
    pub oauth: Option<OAuthCredentials>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub db_filename: String,
    pub drive_api_url: String,
    pub drive_upload_url: String,
    pub oauth_authorize_url: String,
    pub oauth_token_url: String,
    pub oauth_revoke_url: String,
    pub gemini_api_url: String,
    pub static_dir: String,
}

impl Config {
    /// Load configuration from the environment, reading `.env` first if present
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            info!("Loaded environment from {}", path.display());
        }

        let port: u16 = try_load("ENSPIRED_PORT", "3000")?;

        let oauth = match (var("GOOGLE_CLIENT_ID"), var("GOOGLE_CLIENT_SECRET")) {
            (Some(client_id), Some(client_secret)) => Some(OAuthCredentials {
                client_id,
                client_secret,
            }),
            _ => {
                info!("Google OAuth credentials not set, running in mock mode");
                None
            }
        };

        let gemini_api_key = var("GEMINI_API_KEY");
        if gemini_api_key.is_none() {
            info!("GEMINI_API_KEY not set, map links will use plain search URLs");
        }

        Ok(Self {
            host: try_load("ENSPIRED_HOST", "0.0.0.0")?,
            port,
            public_url: try_load("ENSPIRED_PUBLIC_URL", &format!("http://localhost:{port}"))?,
            oauth,
            gemini_api_key,
            gemini_model: try_load("GEMINI_MODEL", "gemini-2.5-flash")?,
            db_filename: try_load("ENSPIRED_DB_FILENAME", "enspired_db.json")?,
            drive_api_url: try_load("DRIVE_API_URL", "https://www.googleapis.com")?,
            drive_upload_url: try_load("DRIVE_UPLOAD_URL", "https://www.googleapis.com")?,
            oauth_authorize_url: try_load(
                "OAUTH_AUTHORIZE_URL",
                "https://accounts.google.com/o/oauth2/v2/auth",
            )?,
            oauth_token_url: try_load("OAUTH_TOKEN_URL", "https://oauth2.googleapis.com/token")?,
            oauth_revoke_url: try_load("OAUTH_REVOKE_URL", "https://oauth2.googleapis.com/revoke")?,
            gemini_api_url: try_load(
                "GEMINI_API_URL",
                "https://generativelanguage.googleapis.com",
            )?,
            static_dir: try_load("ENSPIRED_STATIC_DIR", "static")?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn redirect_url(&self) -> String {
        format!("{}/auth/callback", self.public_url.trim_end_matches('/'))
    }

    pub fn is_mock(&self) -> bool {
        self.oauth.is_none()
    }
}

impl Default for Config {
    /// Mock-mode configuration with Google's public endpoints
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            public_url: "http://localhost:3000".to_string(),
            oauth: None,
            gemini_api_key: None,
            gemini_model: "gemini-2.5-flash".to_string(),
            db_filename: "enspired_db.json".to_string(),
            drive_api_url: "https://www.googleapis.com".to_string(),
            drive_upload_url: "https://www.googleapis.com".to_string(),
            oauth_authorize_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            oauth_token_url: "https://oauth2.googleapis.com/token".to_string(),
            oauth_revoke_url: "https://oauth2.googleapis.com/revoke".to_string(),
            gemini_api_url: "https://generativelanguage.googleapis.com".to_string(),
            static_dir: "static".to_string(),
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|| {
        debug!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse::<T>()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Invalid {key} value: {raw}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_url_ignores_trailing_slash() {
        let config = Config {
            public_url: "https://stays.example/".to_string(),
            ..Config::default()
        };
        assert_eq!(config.redirect_url(), "https://stays.example/auth/callback");
        assert!(config.is_mock());
    }

    #[test]
    fn invalid_numbers_are_reported() {
        env::set_var("ENSPIRED_TEST_BAD_PORT", "eighty");
        let err = try_load::<u16>("ENSPIRED_TEST_BAD_PORT", "3000").unwrap_err();
        assert!(err.to_string().contains("ENSPIRED_TEST_BAD_PORT"));

        let port: u16 = try_load("ENSPIRED_TEST_UNSET_PORT", "3000").unwrap();
        assert_eq!(port, 3000);
    }
}
