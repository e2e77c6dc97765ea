//! Client-side reconciliation of a cached working set against a catalog.
//!
//! [`WorkingSet`] is the in-memory list a presentation layer renders. It is a
//! cache: it only ever changes by applying the result of a store operation.
//! [`Session`] drives the confirmed-write strategy on top of any
//! [`Catalog`]: the working set is touched only after the backend reports
//! success, so a failure leaves it exactly as it was.

use crate::contract::{Catalog, SaveAction};
use crate::model::{ArtCategory, Artwork, ArtworkDraft};
use crate::validate::ValidationError;

/// Ordered cache of artwork records, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkingSet {
    items: Vec<Artwork>,
}

impl WorkingSet {
    pub fn new(items: Vec<Artwork>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Artwork] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&Artwork> {
        self.items.iter().find(|a| a.id == id)
    }

    /// Records in `category`, or all records when `None`.
    pub fn by_category(&self, category: Option<ArtCategory>) -> Vec<&Artwork> {
        self.items
            .iter()
            .filter(|a| category.map_or(true, |c| a.category == c))
            .collect()
    }

    /// Replaces the whole cache with a freshly listed set.
    pub fn replace_all(&mut self, items: Vec<Artwork>) {
        self.items = items;
    }

    /// Puts a newly created record at the head of the list.
    pub fn apply_created(&mut self, artwork: Artwork) {
        if let Some(pos) = self.position(&artwork.id) {
            self.items.remove(pos);
        }
        self.items.insert(0, artwork);
    }

    /// Replaces the record with the same id in place. Returns false when the
    /// id is not cached.
    pub fn apply_updated(&mut self, artwork: Artwork) -> bool {
        match self.position(&artwork.id) {
            Some(pos) => {
                self.items[pos] = artwork;
                true
            }
            None => false,
        }
    }

    /// Removes exactly the record with this id. Returns false when absent.
    pub fn apply_deleted(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(pos) => {
                self.items.remove(pos);
                true
            }
            None => false,
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|a| a.id == id)
    }
}

/// Failure of a session operation. The working set is unchanged in every case.
#[derive(Debug, thiserror::Error)]
pub enum SessionError<E> {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Artwork not found: {0}")]
    NotFound(String),

    #[error("Catalog operation failed: {0}")]
    Backend(E),
}

/// A working set bound to the catalog it caches, using confirmed writes.
pub struct Session<C: Catalog> {
    catalog: C,
    working: WorkingSet,
}

impl<C: Catalog> Session<C> {
    /// Starts with an empty working set; call [`Session::refresh`] to load.
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            working: WorkingSet::default(),
        }
    }

    pub fn working(&self) -> &WorkingSet {
        &self.working
    }

    pub fn catalog_mut(&mut self) -> &mut C {
        &mut self.catalog
    }

    /// Reloads the working set. On failure the last-known set is kept.
    pub fn refresh(&mut self) -> Result<&WorkingSet, SessionError<C::Error>> {
        let items = self.catalog.list(None).map_err(SessionError::Backend)?;
        self.working.replace_all(items);
        Ok(&self.working)
    }

    /// Fetches one record from the catalog (detail view). Does not touch the cache.
    pub fn fetch(&mut self, id: &str) -> Result<Artwork, SessionError<C::Error>> {
        self.catalog
            .get(id)
            .map_err(SessionError::Backend)?
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    /// Creates or updates `candidate`, depending on whether its id is cached.
    pub fn save(&mut self, candidate: ArtworkDraft) -> Result<Artwork, SessionError<C::Error>> {
        let action = SaveAction::plan(candidate, |id| self.working.contains(id))?;
        match action {
            SaveAction::Create(new) => {
                let created = self.catalog.create(new).map_err(SessionError::Backend)?;
                self.working.apply_created(created.clone());
                Ok(created)
            }
            SaveAction::Update { id, patch } => {
                let updated = self
                    .catalog
                    .update(&id, patch)
                    .map_err(SessionError::Backend)?
                    .ok_or_else(|| SessionError::NotFound(id.clone()))?;
                self.working.apply_updated(updated.clone());
                Ok(updated)
            }
        }
    }

    /// Deletes the record with this id from the catalog, then from the cache.
    pub fn delete(&mut self, id: &str) -> Result<(), SessionError<C::Error>> {
        if !self.catalog.delete(id).map_err(SessionError::Backend)? {
            return Err(SessionError::NotFound(id.to_string()));
        }
        self.working.apply_deleted(id);
        Ok(())
    }
}
