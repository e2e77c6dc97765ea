//! The synchronization contract shared by every catalog backend.

use crate::model::{ArtCategory, Artwork, ArtworkDraft, ArtworkPatch, NewArtwork};
use crate::validate::{validate, validate_patch, ValidationError};

/// Operations every catalog backend implements with the same shapes.
///
/// Backends differ only in their error type: the local slot never fails a
/// caller, the remote service can.
pub trait Catalog {
    type Error;

    /// All records, most recently created first.
    fn list(&mut self, category: Option<ArtCategory>) -> Result<Vec<Artwork>, Self::Error>;

    /// The record with this id, or `None` when absent.
    fn get(&mut self, id: &str) -> Result<Option<Artwork>, Self::Error>;

    /// Mints an id for `new` and stores it.
    fn create(&mut self, new: NewArtwork) -> Result<Artwork, Self::Error>;

    /// Merges `patch` into the record with this id. `None` when absent.
    fn update(&mut self, id: &str, patch: ArtworkPatch) -> Result<Option<Artwork>, Self::Error>;

    /// Removes the record with this id. `false` when nothing matched.
    fn delete(&mut self, id: &str) -> Result<bool, Self::Error>;
}

/// What saving a candidate means against the currently known records.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveAction {
    Create(NewArtwork),
    Update { id: String, patch: ArtworkPatch },
}

impl SaveAction {
    /// Decides create vs update for `candidate`.
    ///
    /// A candidate whose id names a known record is an update; anything else
    /// (no id, or an id the caller has never seen) is a create and the store
    /// mints a fresh id.
    pub fn plan<F>(candidate: ArtworkDraft, is_known: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> bool,
    {
        match candidate.id.clone() {
            Some(id) if is_known(&id) => Ok(SaveAction::Update {
                id,
                patch: validate_patch(candidate)?,
            }),
            _ => Ok(SaveAction::Create(validate(candidate)?)),
        }
    }
}
