//! Local catalog variant: the whole catalog kept as one JSON blob in a
//! device-local key-value slot.
//!
//! Durability here is best-effort. Slot failures are logged and published as
//! [`PersistenceEvent`]s but never fail the caller; the in-memory working set
//! stays the record of truth for the session.

use std::collections::HashMap;
use std::convert::Infallible;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;

use crate::contract::{Catalog, SaveAction};
use crate::id::{IdGenerator, TimestampIds};
use crate::model::{ArtCategory, Artwork, ArtworkDraft, ArtworkPatch, NewArtwork};
use crate::reconcile::{SessionError, WorkingSet};
use crate::seed::default_catalog;

/// Slot key under which the catalog blob is stored.
pub const STORAGE_KEY: &str = "sketchy_gallery_artworks";

#[derive(Debug, thiserror::Error)]
pub enum LocalStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Quota exceeded: {needed} bytes (quota: {quota} bytes)")]
    QuotaExceeded { needed: usize, quota: usize },
}

/// A device-local string key-value persistence slot.
pub trait KvSlot {
    fn get(&self, key: &str) -> Result<Option<String>, LocalStoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), LocalStoreError>;
    fn remove(&self, key: &str) -> Result<(), LocalStoreError>;
}

/// Slot backed by a directory, one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KvSlot for FileSlot {
    fn get(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), LocalStoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process slot with an optional byte quota per value.
#[derive(Debug, Default)]
pub struct MemorySlot {
    values: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects any value longer than `quota` bytes, like a full browser store.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            values: Mutex::default(),
            quota: Some(quota),
        }
    }

    fn values(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KvSlot for MemorySlot {
    fn get(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
        Ok(self.values().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
        if let Some(quota) = self.quota {
            if value.len() > quota {
                return Err(LocalStoreError::QuotaExceeded {
                    needed: value.len(),
                    quota,
                });
            }
        }
        self.values().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), LocalStoreError> {
        self.values().remove(key);
        Ok(())
    }
}

/// Outcome of a local persistence call, published to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistenceEvent {
    Loaded { count: usize },
    FellBackToSeed { reason: String },
    Saved { count: usize },
    SaveFailed { error: String },
    Reset,
    ResetFailed { error: String },
}

/// Full-snapshot persistence of the catalog into one slot key.
pub struct LocalStore<S: KvSlot> {
    slot: S,
    key: String,
    subscribers: Mutex<Vec<Sender<PersistenceEvent>>>,
}

impl<S: KvSlot> LocalStore<S> {
    pub fn new(slot: S) -> Self {
        Self::with_key(slot, STORAGE_KEY)
    }

    pub fn with_key(slot: S, key: impl Into<String>) -> Self {
        Self {
            slot,
            key: key.into(),
            subscribers: Mutex::default(),
        }
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// Returns a receiver for every event published from now on.
    pub fn subscribe(&self) -> Receiver<PersistenceEvent> {
        let (tx, rx) = channel();
        self.subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(tx);
        rx
    }

    /// The persisted catalog, or the seed catalog when nothing usable is stored.
    pub fn load_all(&self) -> Vec<Artwork> {
        let blob = match self.slot.get(&self.key) {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                self.publish(PersistenceEvent::FellBackToSeed {
                    reason: "nothing persisted".to_string(),
                });
                return default_catalog();
            }
            Err(e) => {
                tracing::warn!("Error loading artworks: {}", e);
                self.publish(PersistenceEvent::FellBackToSeed {
                    reason: e.to_string(),
                });
                return default_catalog();
            }
        };

        match serde_json::from_str::<Vec<Artwork>>(&blob) {
            Ok(items) => {
                self.publish(PersistenceEvent::Loaded { count: items.len() });
                items
            }
            Err(e) => {
                tracing::warn!("Stored catalog is unreadable, using seed catalog: {}", e);
                self.publish(PersistenceEvent::FellBackToSeed {
                    reason: format!("corrupt catalog blob: {}", e),
                });
                default_catalog()
            }
        }
    }

    /// Replaces the stored blob with `records`. Returns false if the write failed.
    pub fn save_all(&self, records: &[Artwork]) -> bool {
        let result = serde_json::to_string(records)
            .map_err(LocalStoreError::from)
            .and_then(|blob| self.slot.set(&self.key, &blob));

        match result {
            Ok(()) => {
                self.publish(PersistenceEvent::Saved {
                    count: records.len(),
                });
                true
            }
            Err(e) => {
                tracing::warn!("Error saving artworks: {}", e);
                self.publish(PersistenceEvent::SaveFailed {
                    error: e.to_string(),
                });
                false
            }
        }
    }

    /// Clears the stored blob and returns the seed catalog.
    pub fn reset(&self) -> Vec<Artwork> {
        match self.slot.remove(&self.key) {
            Ok(()) => self.publish(PersistenceEvent::Reset),
            Err(e) => {
                tracing::warn!("Error resetting artworks: {}", e);
                self.publish(PersistenceEvent::ResetFailed {
                    error: e.to_string(),
                });
            }
        }
        default_catalog()
    }

    fn publish(&self, event: PersistenceEvent) {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

/// Catalog whose working set is authoritative for the session.
///
/// Every mutation is applied to memory first and then snapshotted to the slot;
/// a failed snapshot never reverts the in-memory change.
pub struct LocalCatalog<S: KvSlot> {
    store: LocalStore<S>,
    working: WorkingSet,
    ids: TimestampIds,
}

impl<S: KvSlot> LocalCatalog<S> {
    pub fn open(store: LocalStore<S>) -> Self {
        let items = store.load_all();
        let floor = items
            .iter()
            .filter_map(|a| a.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            store,
            working: WorkingSet::new(items),
            ids: TimestampIds::starting_after(floor),
        }
    }

    pub fn store(&self) -> &LocalStore<S> {
        &self.store
    }

    pub fn items(&self) -> &[Artwork] {
        self.working.items()
    }

    pub fn by_category(&self, category: Option<ArtCategory>) -> Vec<&Artwork> {
        self.working.by_category(category)
    }

    /// Creates or updates `candidate` depending on whether its id is present.
    pub fn save(&mut self, candidate: ArtworkDraft) -> Result<Artwork, SessionError<Infallible>> {
        match SaveAction::plan(candidate, |id| self.working.contains(id))? {
            SaveAction::Create(new) => Ok(self.insert(new)),
            SaveAction::Update { id, patch } => self
                .merge(&id, &patch)
                .ok_or(SessionError::NotFound(id)),
        }
    }

    /// Removes the record with this id. Returns false when nothing matched.
    pub fn remove(&mut self, id: &str) -> bool {
        let removed = self.working.apply_deleted(id);
        if removed {
            self.store.save_all(self.working.items());
        }
        removed
    }

    /// Drops everything persisted and returns to the seed catalog.
    pub fn reset(&mut self) -> &[Artwork] {
        self.working.replace_all(self.store.reset());
        self.working.items()
    }

    fn insert(&mut self, new: NewArtwork) -> Artwork {
        let artwork = new.into_artwork(self.ids.next_id(), None);
        self.working.apply_created(artwork.clone());
        self.store.save_all(self.working.items());
        artwork
    }

    fn merge(&mut self, id: &str, patch: &ArtworkPatch) -> Option<Artwork> {
        let mut updated = self.working.get(id)?.clone();
        updated.apply(patch);
        self.working.apply_updated(updated.clone());
        self.store.save_all(self.working.items());
        Some(updated)
    }
}

impl<S: KvSlot> Catalog for LocalCatalog<S> {
    type Error = Infallible;

    fn list(&mut self, category: Option<ArtCategory>) -> Result<Vec<Artwork>, Infallible> {
        Ok(self.by_category(category).into_iter().cloned().collect())
    }

    fn get(&mut self, id: &str) -> Result<Option<Artwork>, Infallible> {
        Ok(self.working.get(id).cloned())
    }

    fn create(&mut self, new: NewArtwork) -> Result<Artwork, Infallible> {
        Ok(self.insert(new))
    }

    fn update(&mut self, id: &str, patch: ArtworkPatch) -> Result<Option<Artwork>, Infallible> {
        Ok(self.merge(id, &patch))
    }

    fn delete(&mut self, id: &str) -> Result<bool, Infallible> {
        Ok(self.remove(id))
    }
}
