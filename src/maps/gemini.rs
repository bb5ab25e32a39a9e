use crate::config::Config;
use crate::maps::traits::{MapLocation, MapLocator};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    maps: Option<MapsChunk>,
}

#[derive(Debug, Deserialize)]
struct MapsChunk {
    uri: Option<String>,
    title: Option<String>,
}

/// Gemini `generateContent` with Google Maps grounding
pub struct GeminiLocator {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl GeminiLocator {
    pub fn new(config: &Config, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_url: config.gemini_api_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.gemini_model.clone(),
        })
    }
}

#[async_trait]
impl MapLocator for GeminiLocator {
    async fn locate(&self, query: &str) -> Result<Option<MapLocation>> {
        debug!("Grounding map location for {:?}", query);

        let body = json!({
            "contents": [{
                "parts": [{ "text": format!("Find the specific location for: {}.", query) }]
            }],
            "tools": [{ "googleMaps": {} }]
        });

        let response: GenerateContentResponse = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.api_url, self.model
            ))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .context("Failed to call Gemini")?
            .error_for_status()
            .context("Gemini rejected the request")?
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        // First chunk that carries a maps URI wins
        let location = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.grounding_metadata)
            .into_iter()
            .flat_map(|m| m.grounding_chunks)
            .filter_map(|chunk| chunk.maps)
            .find_map(|maps| {
                maps.uri.map(|uri| MapLocation {
                    uri,
                    title: maps.title.unwrap_or_default(),
                })
            });

        Ok(location)
    }

    fn locator_name(&self) -> &'static str {
        "gemini"
    }
}
