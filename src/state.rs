use std::sync::Arc;

use anyhow::Result;
use axum::http::HeaderMap;
use tracing::{info, warn};

use crate::auth::{GoogleOAuth, Session, SessionStore};
use crate::config::Config;
use crate::listings::PUBLIC_DISTRICTS;
use crate::maps::{GeminiLocator, MapLocator, OfflineLocator};
use crate::models::{catalog, DriveUser, Listing};
use crate::store::{DriveClient, ListingStore, MemoryStore};

/// Where listings are persisted and how visitors sign in
pub enum Backend {
    /// Each signed-in user's own Drive, via Google OAuth
    Google { drive: DriveClient, oauth: GoogleOAuth },
    /// One shared in-memory store and a demo account
    Mock { store: Arc<MemoryStore> },
}

/// A visitor allowed into the admin dashboard
pub struct Admin {
    pub user: DriveUser,
    pub store: Arc<dyn ListingStore>,
}

pub struct AppState {
    pub config: Config,
    pub backend: Backend,
    pub sessions: SessionStore,
    pub locator: Arc<dyn MapLocator>,
    pub catalog: Vec<Listing>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Arc<Self>> {
        let backend = match config.oauth.clone() {
            Some(credentials) => {
                info!("Persisting listings to Google Drive ({})", config.db_filename);
                Backend::Google {
                    drive: DriveClient::new(&config)?,
                    oauth: GoogleOAuth::new(&config, credentials)?,
                }
            }
            None => {
                info!("Persisting listings in memory");
                Backend::Mock {
                    store: Arc::new(MemoryStore::new()),
                }
            }
        };

        let locator: Arc<dyn MapLocator> = match config.gemini_api_key.clone() {
            Some(key) => Arc::new(GeminiLocator::new(&config, key)?),
            None => Arc::new(OfflineLocator),
        };

        Ok(Self::with_parts(config, backend, locator))
    }

    pub fn with_parts(config: Config, backend: Backend, locator: Arc<dyn MapLocator>) -> Arc<Self> {
        Arc::new(Self {
            config,
            backend,
            sessions: SessionStore::new(),
            locator,
            catalog: catalog(),
        })
    }

    /// Account used for every sign-in in mock mode
    pub fn demo_user() -> DriveUser {
        DriveUser {
            email: "demo@enspired.local".to_string(),
            id: "demo".to_string(),
        }
    }

    pub fn is_mock(&self) -> bool {
        matches!(self.backend, Backend::Mock { .. })
    }

    /// Store visible to this visitor, if any
    pub fn store_for(&self, session: Option<&Session>) -> Option<Arc<dyn ListingStore>> {
        match &self.backend {
            Backend::Mock { store } => Some(store.clone()),
            Backend::Google { drive, .. } => {
                session.map(|s| Arc::new(drive.store(&s.access_token)) as Arc<dyn ListingStore>)
            }
        }
    }

    pub async fn session(&self, headers: &HeaderMap) -> Option<Session> {
        self.sessions.from_headers(headers).await.map(|(_, s)| s)
    }

    /// The signed-in admin, looking up and caching their profile on first use
    pub async fn admin(&self, headers: &HeaderMap) -> Option<Admin> {
        let (session_id, session) = self.sessions.from_headers(headers).await?;
        let store = self.store_for(Some(&session))?;

        let user = match (&session.user, &self.backend) {
            (Some(user), _) => user.clone(),
            (None, Backend::Mock { .. }) => return None,
            (None, Backend::Google { drive, .. }) => match drive.about(&session.access_token).await {
                Ok(user) => {
                    self.sessions.set_user(&session_id, user.clone()).await;
                    user
                }
                Err(e) => {
                    warn!("Failed to get user info: {:#}", e);
                    return None;
                }
            },
        };

        Some(Admin { user, store })
    }

    /// Stored listings for the public pages.
    ///
    /// Anything that goes wrong leaves the visitor with the catalog only.
    pub async fn public_stored_listings(&self, session: Option<&Session>) -> Vec<Listing> {
        let Some(store) = self.store_for(session) else {
            return Vec::new();
        };

        match store.fetch_in_districts(&PUBLIC_DISTRICTS).await {
            Ok(stored) => stored.iter().map(|l| l.to_listing()).collect(),
            Err(e) => {
                warn!("Could not load listings from {}: {:#}", store.store_name(), e);
                Vec::new()
            }
        }
    }

    /// Find a listing by id among the catalog and the visitor's store
    pub async fn find_listing(&self, session: Option<&Session>, id: &str) -> Option<Listing> {
        if let Some(listing) = self.catalog.iter().find(|l| l.id == id) {
            return Some(listing.clone());
        }

        let store = self.store_for(session)?;
        match store.fetch_all().await {
            Ok(stored) => stored.into_iter().find(|l| l.id == id).map(|l| l.to_listing()),
            Err(e) => {
                warn!("Could not look up listing {}: {:#}", id, e);
                None
            }
        }
    }
}
