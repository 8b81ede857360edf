//! Favorites persistence backends.
//!
//! Each user has one document shaped `{ "cities": [...] }`. A missing
//! document is an empty list, never an error.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::instrument;

use crate::favorites::{FavoritesDocument, FavoritesList};

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Errors that can occur while loading or saving favorites.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store answered with a non-success status.
    #[error("Store rejected request: {status} - {body}")]
    Rejected { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// User id can't be used as a document key.
    #[error("Invalid user id: {0:?}")]
    InvalidUserId(String),
}

/// Result type for favorites store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Per-user favorites persistence.
#[async_trait]
pub trait FavoritesStore: Send + Sync {
    /// Load a user's favorites. Empty if the user has none stored.
    async fn load(&self, user_id: &str) -> StoreResult<FavoritesList>;

    /// Replace a user's favorites.
    async fn save(&self, user_id: &str, favorites: &FavoritesList) -> StoreResult<()>;
}

fn check_user_id(user_id: &str) -> StoreResult<()> {
    let invalid = user_id.is_empty()
        || user_id == "."
        || user_id == ".."
        || user_id.contains(['/', '\\']);
    if invalid {
        return Err(StoreError::InvalidUserId(user_id.to_string()));
    }
    Ok(())
}

/// Remote document store: `GET`/`PUT {base_url}/favorites/{user_id}`.
pub struct DocumentFavoritesStore {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl DocumentFavoritesStore {
    pub fn new(base_url: &str, auth_token: Option<String>) -> StoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
        })
    }

    fn document_url(&self, user_id: &str) -> String {
        format!("{}/favorites/{}", self.base_url, urlencoding::encode(user_id))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl FavoritesStore for DocumentFavoritesStore {
    #[instrument(skip(self), level = "info")]
    async fn load(&self, user_id: &str) -> StoreResult<FavoritesList> {
        check_user_id(user_id)?;

        let response = self
            .authorize(self.client.get(self.document_url(user_id)))
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!("No favorites document for {}", user_id);
            return Ok(FavoritesList::new());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let doc: FavoritesDocument = serde_json::from_str(&body)?;
        Ok(doc.cities)
    }

    #[instrument(skip(self, favorites), level = "info")]
    async fn save(&self, user_id: &str, favorites: &FavoritesList) -> StoreResult<()> {
        check_user_id(user_id)?;

        let doc = FavoritesDocument {
            cities: favorites.clone(),
        };
        let response = self
            .authorize(self.client.put(self.document_url(user_id)))
            .json(&doc)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::info!("Saved {} favorites for {}", favorites.len(), user_id);
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(StoreError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// One JSON file per user under a directory.
pub struct FileFavoritesStore {
    directory: PathBuf,
}

impl FileFavoritesStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn document_path(&self, user_id: &str) -> StoreResult<PathBuf> {
        check_user_id(user_id)?;
        Ok(self.directory.join(format!("{}.json", user_id)))
    }
}

#[async_trait]
impl FavoritesStore for FileFavoritesStore {
    async fn load(&self, user_id: &str) -> StoreResult<FavoritesList> {
        let path = self.document_path(user_id)?;

        let json = match tokio::fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(FavoritesList::new());
            }
            Err(e) => return Err(e.into()),
        };

        let doc: FavoritesDocument = serde_json::from_str(&json)?;
        tracing::debug!("Loaded favorites for {} from {:?}", user_id, path);
        Ok(doc.cities)
    }

    async fn save(&self, user_id: &str, favorites: &FavoritesList) -> StoreResult<()> {
        let path = self.document_path(user_id)?;

        tokio::fs::create_dir_all(&self.directory).await?;

        let doc = FavoritesDocument {
            cities: favorites.clone(),
        };
        let json = serde_json::to_string_pretty(&doc)?;
        tokio::fs::write(&path, json).await?;

        tracing::info!("Stored favorites for {} at {:?}", user_id, path);
        Ok(())
    }
}

/// In-process store, used offline and in tests.
#[derive(Debug, Default)]
pub struct MemoryFavoritesStore {
    documents: Mutex<HashMap<String, FavoritesList>>,
}

impl MemoryFavoritesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user's favorites.
    pub fn with_user(self, user_id: &str, favorites: FavoritesList) -> Self {
        self.documents.lock().insert(user_id.to_string(), favorites);
        self
    }

    /// What is currently stored for a user, if anything.
    pub fn stored(&self, user_id: &str) -> Option<FavoritesList> {
        self.documents.lock().get(user_id).cloned()
    }
}

#[async_trait]
impl FavoritesStore for MemoryFavoritesStore {
    async fn load(&self, user_id: &str) -> StoreResult<FavoritesList> {
        check_user_id(user_id)?;
        Ok(self.stored(user_id).unwrap_or_default())
    }

    async fn save(&self, user_id: &str, favorites: &FavoritesList) -> StoreResult<()> {
        check_user_id(user_id)?;
        self.documents
            .lock()
            .insert(user_id.to_string(), favorites.clone());
        Ok(())
    }
}
