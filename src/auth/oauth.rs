use crate::config::{Config, OAuthCredentials};
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Drive access limited to files this application created or opened
pub const DRIVE_FILE_SCOPE: &str = "https://www.googleapis.com/auth/drive.file";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Google OAuth authorization-code client
#[derive(Debug, Clone)]
pub struct GoogleOAuth {
    client: Client,
    credentials: OAuthCredentials,
    authorize_url: String,
    token_url: String,
    revoke_url: String,
    redirect_url: String,
}

impl GoogleOAuth {
    pub fn new(config: &Config, credentials: OAuthCredentials) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            credentials,
            authorize_url: config.oauth_authorize_url.clone(),
            token_url: config.oauth_token_url.clone(),
            revoke_url: config.oauth_revoke_url.clone(),
            redirect_url: config.redirect_url(),
        })
    }

    /// Consent screen URL; `state` comes back on the callback
    pub fn authorize_url(&self, state: &str) -> Result<String> {
        let url = Url::parse_with_params(
            &self.authorize_url,
            &[
                ("client_id", self.credentials.client_id.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("response_type", "code"),
                ("scope", DRIVE_FILE_SCOPE),
                ("prompt", "consent"),
                ("state", state),
            ],
        )
        .context("Invalid OAuth authorize URL")?;

        Ok(url.into())
    }

    /// Trade the callback code for an access token
    pub async fn exchange_code(&self, code: &str) -> Result<String> {
        debug!("Exchanging authorization code");

        let token: TokenResponse = self
            .client
            .post(&self.token_url)
            .form(&[
                ("code", code),
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .context("Failed to reach the token endpoint")?
            .error_for_status()
            .context("Token exchange rejected")?
            .json()
            .await
            .context("Failed to parse token response")?;

        Ok(token.access_token)
    }

    /// Revoke a token on sign-out; failures are only logged
    pub async fn revoke(&self, token: &str) {
        let result = self
            .client
            .post(&self.revoke_url)
            .form(&[("token", token)])
            .send()
            .await
            .and_then(|r| r.error_for_status());

        if let Err(e) = result {
            warn!("Failed to revoke token: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorize_url_carries_scope_and_state() {
        let config = Config {
            public_url: "https://stays.example".to_string(),
            ..Config::default()
        };
        let credentials = OAuthCredentials {
            client_id: "client-1".to_string(),
            client_secret: "secret".to_string(),
        };
        let oauth = GoogleOAuth::new(&config, credentials).unwrap();

        let url = Url::parse(&oauth.authorize_url("xyz").unwrap()).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        assert!(pairs.contains(&("client_id".to_string(), "client-1".to_string())));
        assert!(pairs.contains(&("scope".to_string(), DRIVE_FILE_SCOPE.to_string())));
        assert!(pairs.contains(&("state".to_string(), "xyz".to_string())));
        assert!(pairs.contains(&(
            "redirect_uri".to_string(),
            "https://stays.example/auth/callback".to_string()
        )));
    }
}
