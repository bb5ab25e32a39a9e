use crate::config::Config;
use crate::models::{DriveUser, StoredListing};
use crate::store::traits::ListingStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

const JSON_MIME: &str = "application/json";

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DriveFile {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct About {
    user: AboutUser,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AboutUser {
    email_address: String,
    permission_id: String,
}

/// Google Drive v3 REST client, shared by every session
#[derive(Debug, Clone)]
pub struct DriveClient {
    client: Client,
    api_url: String,
    upload_url: String,
    db_filename: String,
}

impl DriveClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("enspired-stays/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_url: config.drive_api_url.trim_end_matches('/').to_string(),
            upload_url: config.drive_upload_url.trim_end_matches('/').to_string(),
            db_filename: config.db_filename.clone(),
        })
    }

    /// Store acting on behalf of one signed-in user
    pub fn store(&self, access_token: &str) -> DriveStore {
        DriveStore {
            drive: self.clone(),
            token: access_token.to_string(),
        }
    }

    /// Profile of the account that owns the token
    pub async fn about(&self, token: &str) -> Result<DriveUser> {
        let about: About = self
            .client
            .get(format!("{}/drive/v3/about", self.api_url))
            .query(&[("fields", "user")])
            .bearer_auth(token)
            .send()
            .await
            .context("Failed to fetch Drive user")?
            .error_for_status()
            .context("Drive rejected the user lookup")?
            .json()
            .await
            .context("Failed to parse Drive user")?;

        Ok(DriveUser {
            email: about.user.email_address,
            id: about.user.permission_id,
        })
    }

    /// Locate the listings file by name; the first match wins
    pub async fn find_db_file(&self, token: &str) -> Result<Option<DriveFile>> {
        let q = format!(
            "name = '{}' and mimeType = '{}' and trashed = false",
            self.db_filename, JSON_MIME
        );

        let list: FileList = self
            .client
            .get(format!("{}/drive/v3/files", self.api_url))
            .query(&[("q", q.as_str()), ("fields", "files(id, name)")])
            .bearer_auth(token)
            .send()
            .await
            .context("Failed to search Drive files")?
            .error_for_status()
            .context("Drive rejected the file search")?
            .json()
            .await
            .context("Failed to parse Drive file list")?;

        Ok(list.files.into_iter().next())
    }

    async fn download(&self, token: &str, file: &DriveFile) -> Result<String> {
        debug!("Downloading {} ({})", file.name, file.id);

        self.client
            .get(format!("{}/drive/v3/files/{}", self.api_url, file.id))
            .query(&[("alt", "media")])
            .bearer_auth(token)
            .send()
            .await
            .context("Failed to download listings file")?
            .error_for_status()
            .context("Drive rejected the download")?
            .text()
            .await
            .context("Failed to read listings file")
    }

    async fn upload(&self, token: &str, existing: Option<&DriveFile>, body: String) -> Result<()> {
        let metadata = json!({ "name": self.db_filename, "mimeType": JSON_MIME });
        let form = Form::new()
            .part("metadata", Part::text(metadata.to_string()).mime_str(JSON_MIME)?)
            .part("file", Part::text(body).mime_str(JSON_MIME)?);

        let request = match existing {
            Some(file) => self.client.patch(format!(
                "{}/upload/drive/v3/files/{}",
                self.upload_url, file.id
            )),
            None => {
                info!("Creating {} in Drive", self.db_filename);
                self.client
                    .post(format!("{}/upload/drive/v3/files", self.upload_url))
            }
        };

        request
            .query(&[("uploadType", "multipart")])
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .context("Failed to upload listings file")?
            .error_for_status()
            .context("Drive rejected the upload")?;

        Ok(())
    }
}

/// Parse the listings file leniently: anything but an array reads as empty,
/// and records that do not fit the schema are skipped
pub fn parse_listings(body: &str) -> Vec<StoredListing> {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            warn!("Listings file is not valid JSON: {}", e);
            return Vec::new();
        }
    };

    let Value::Array(items) = value else {
        warn!("Listings file does not hold an array");
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<StoredListing>(item) {
            Ok(listing) => Some(listing),
            Err(e) => {
                warn!("Skipping malformed listing: {}", e);
                None
            }
        })
        .collect()
}

/// The listings file inside one user's Drive
pub struct DriveStore {
    drive: DriveClient,
    token: String,
}

#[async_trait]
impl ListingStore for DriveStore {
    async fn fetch_all(&self) -> Result<Vec<StoredListing>> {
        let Some(file) = self.drive.find_db_file(&self.token).await? else {
            debug!("No listings file in Drive yet");
            return Ok(Vec::new());
        };

        let body = self.drive.download(&self.token, &file).await?;
        let listings = parse_listings(&body);
        debug!("Read {} listings from Drive", listings.len());
        Ok(listings)
    }

    async fn save_all(&self, listings: &[StoredListing]) -> Result<()> {
        let existing = self.drive.find_db_file(&self.token).await?;
        let body = serde_json::to_string(listings).context("Failed to encode listings")?;
        self.drive.upload(&self.token, existing.as_ref(), body).await?;
        info!("Saved {} listings to Drive", listings.len());
        Ok(())
    }

    fn store_name(&self) -> &'static str {
        "Google Drive"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_array_files_read_as_empty() {
        assert!(parse_listings("").is_empty());
        assert!(parse_listings("{\"id\": 1}").is_empty());
        assert!(parse_listings("[]").is_empty());
    }

    #[test]
    fn malformed_records_are_skipped() {
        let body = r#"[
            {"title": "missing everything"},
            {
                "id": "ok",
                "owner_id": "o",
                "title": "Valid",
                "description": "Nice",
                "price_per_night": 30,
                "address": "1 Bach Dang",
                "district": "Hai Chau",
                "latitude": 16.07,
                "longitude": 108.22,
                "created_at": "2024-02-02T10:00:00Z",
                "property_media": []
            }
        ]"#;

        let listings = parse_listings(body);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].id, "ok");
    }
}
