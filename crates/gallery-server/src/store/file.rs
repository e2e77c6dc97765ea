//! Flat-file store: the whole catalog as one pretty-printed JSON array.
//!
//! All operations are serialised through one mutex. A mutation is written to
//! disk (temp file, then rename) before it is committed to memory, so a failed
//! write leaves both the file and the served catalog unchanged.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use gallery_catalog::{ArtCategory, Artwork, ArtworkPatch, IdGenerator, NewArtwork};
use tokio::sync::Mutex;

use super::{CatalogStore, Connectivity, StoreError, StoreHealth};

pub struct FileStore {
    path: PathBuf,
    ids: Arc<dyn IdGenerator>,
    /// Physical order: oldest first, as appended.
    records: Mutex<Vec<Artwork>>,
}

impl FileStore {
    /// Opens the catalog file, starting empty if it does not exist yet.
    ///
    /// An unreadable or corrupt file is an error, never an empty catalog.
    pub async fn open(path: impl Into<PathBuf>, ids: Arc<dyn IdGenerator>) -> Result<Self, StoreError> {
        let path = path.into();
        let records = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<Vec<Artwork>>(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No catalog file at {}, starting empty", path.display());
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        let dir = parent_dir(&path);
        tokio::fs::create_dir_all(&dir).await?;

        Ok(Self {
            path,
            ids,
            records: Mutex::new(records),
        })
    }

    async fn persist(&self, records: &[Artwork]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

impl CatalogStore for FileStore {
    async fn list(&self, category: Option<ArtCategory>) -> Result<Vec<Artwork>, StoreError> {
        let records = self.records.lock().await;
        Ok(records
            .iter()
            .rev()
            .filter(|a| category.map_or(true, |c| a.category == c))
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Artwork>, StoreError> {
        let records = self.records.lock().await;
        Ok(records.iter().find(|a| a.id == id).cloned())
    }

    async fn create(&self, new: NewArtwork) -> Result<Artwork, StoreError> {
        let mut records = self.records.lock().await;
        let artwork = new.into_artwork(self.ids.next_id(), Some(Utc::now()));
        if records.iter().any(|a| a.id == artwork.id) {
            return Err(StoreError::DuplicateId(artwork.id));
        }

        let mut next = records.clone();
        next.push(artwork.clone());
        self.persist(&next).await?;
        *records = next;

        Ok(artwork)
    }

    async fn update(&self, id: &str, patch: ArtworkPatch) -> Result<Option<Artwork>, StoreError> {
        let mut records = self.records.lock().await;
        let Some(pos) = records.iter().position(|a| a.id == id) else {
            return Ok(None);
        };

        let mut next = records.clone();
        next[pos].apply(&patch);
        let updated = next[pos].clone();
        self.persist(&next).await?;
        *records = next;

        Ok(Some(updated))
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut records = self.records.lock().await;
        let Some(pos) = records.iter().position(|a| a.id == id) else {
            return Ok(false);
        };

        let mut next = records.clone();
        next.remove(pos);
        self.persist(&next).await?;
        *records = next;

        Ok(true)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.records.lock().await.len())
    }

    async fn import(&self, artworks: Vec<Artwork>) -> Result<usize, StoreError> {
        let mut records = self.records.lock().await;
        let mut next = records.clone();

        for artwork in artworks.into_iter().rev() {
            if next.iter().any(|a| a.id == artwork.id) {
                return Err(StoreError::DuplicateId(artwork.id));
            }
            next.push(artwork);
        }

        let inserted = next.len() - records.len();
        self.persist(&next).await?;
        *records = next;

        Ok(inserted)
    }

    async fn clear(&self) -> Result<usize, StoreError> {
        let mut records = self.records.lock().await;
        let removed = records.len();
        self.persist(&[]).await?;
        records.clear();
        Ok(removed)
    }

    async fn health(&self) -> StoreHealth {
        let reachable = tokio::fs::metadata(parent_dir(&self.path))
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);

        StoreHealth::new(if reachable {
            Connectivity::Connected
        } else {
            Connectivity::Disconnected
        })
    }

    async fn close(&self) {
        tracing::info!("Closing catalog file {}", self.path.display());
    }
}
