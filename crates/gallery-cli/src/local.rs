// Device-local catalog under the gallery data directory

use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

use anyhow::Result;
use gallery_catalog::{FileSlot, LocalCatalog, LocalStore, PersistenceEvent};

/// A local catalog plus the persistence events it has published.
pub struct LocalWorkspace {
    pub catalog: LocalCatalog<FileSlot>,
    events: Receiver<PersistenceEvent>,
}

impl LocalWorkspace {
    /// Opens the catalog stored in `dir`, falling back to the seed catalog.
    pub fn open(dir: &Path) -> Self {
        let store = LocalStore::new(FileSlot::new(dir));
        let events = store.subscribe();
        Self {
            catalog: LocalCatalog::open(store),
            events,
        }
    }

    /// Drains pending events and returns those worth telling the user about.
    pub fn warnings(&self) -> Vec<String> {
        self.events
            .try_iter()
            .filter_map(|event| match event {
                PersistenceEvent::FellBackToSeed { reason } if reason != "nothing persisted" => {
                    Some(format!("Stored catalog unusable, showing seed catalog ({})", reason))
                }
                PersistenceEvent::SaveFailed { error } => Some(format!(
                    "Change kept for this run only, could not save: {}",
                    error
                )),
                PersistenceEvent::ResetFailed { error } => {
                    Some(format!("Could not clear stored catalog: {}", error))
                }
                _ => None,
            })
            .collect()
    }
}

/// Default data directory (~/.gallery)
pub fn default_data_dir() -> Result<PathBuf> {
    #[cfg(unix)]
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;

    #[cfg(windows)]
    let home = std::env::var("USERPROFILE")
        .map_err(|_| anyhow::anyhow!("USERPROFILE environment variable not set"))?;

    Ok(PathBuf::from(home).join(".gallery"))
}
