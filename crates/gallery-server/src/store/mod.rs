//! Catalog stores behind the REST surface.
//!
//! [`CatalogStore`] is the one interface request handlers see. A process picks
//! exactly one implementation at startup from its configuration.

pub mod document;
pub mod file;

use std::future::Future;

use chrono::{DateTime, Utc};
use gallery_catalog::{ArtCategory, Artwork, ArtworkPatch, NewArtwork};
use serde::Serialize;

pub use document::DocumentStore;
pub use file::FileStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Duplicate artwork id: {0}")]
    DuplicateId(String),
}

/// Connectivity of the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    Connected,
    Disconnected,
}

/// Health report returned by `GET /api/health`.
#[derive(Debug, Clone, Serialize)]
pub struct StoreHealth {
    pub status: &'static str,
    pub database: Connectivity,
    pub timestamp: DateTime<Utc>,
}

impl StoreHealth {
    pub fn new(database: Connectivity) -> Self {
        Self {
            status: "ok",
            database,
            timestamp: Utc::now(),
        }
    }
}

/// Durable catalog storage.
///
/// Each mutation is atomic for the one record it touches. There is no
/// cross-record transaction and no conflict detection: concurrent updates to
/// the same record resolve last-write-wins.
pub trait CatalogStore: Send + Sync + 'static {
    /// All records, most recently created first, optionally within one category.
    fn list(
        &self,
        category: Option<ArtCategory>,
    ) -> impl Future<Output = Result<Vec<Artwork>, StoreError>> + Send;

    fn get(&self, id: &str) -> impl Future<Output = Result<Option<Artwork>, StoreError>> + Send;

    /// Mints an id and creation time for `new` and stores it.
    fn create(&self, new: NewArtwork) -> impl Future<Output = Result<Artwork, StoreError>> + Send;

    /// Merges `patch` into the record. Returns the stored result, or `None`
    /// when no record has this id.
    fn update(
        &self,
        id: &str,
        patch: ArtworkPatch,
    ) -> impl Future<Output = Result<Option<Artwork>, StoreError>> + Send;

    /// Removes the record. Returns false when no record has this id.
    fn delete(&self, id: &str) -> impl Future<Output = Result<bool, StoreError>> + Send;

    fn count(&self) -> impl Future<Output = Result<usize, StoreError>> + Send;

    /// Bulk import of complete records, keeping their ids. Used by migration.
    fn import(&self, artworks: Vec<Artwork>) -> impl Future<Output = Result<usize, StoreError>> + Send;

    /// Removes every record. Returns how many were removed.
    fn clear(&self) -> impl Future<Output = Result<usize, StoreError>> + Send;

    fn health(&self) -> impl Future<Output = StoreHealth> + Send;

    /// Releases the store's resources. Called once on shutdown.
    fn close(&self) -> impl Future<Output = ()> + Send;
}
