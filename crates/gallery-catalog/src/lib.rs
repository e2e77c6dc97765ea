// Gallery Catalog - Artwork records and the catalog synchronization contract

pub mod advisor;
pub mod contract;
pub mod id;
pub mod inquiry;
pub mod local;
pub mod model;
pub mod reconcile;
pub mod seed;
pub mod validate;

pub use contract::{Catalog, SaveAction};
pub use id::{IdGenerator, IdStrategy, RandomIds, TimestampIds};
pub use inquiry::inquiry_link;
pub use local::{
    FileSlot, KvSlot, LocalCatalog, LocalStore, LocalStoreError, MemorySlot, PersistenceEvent,
    STORAGE_KEY,
};
pub use model::{ArtCategory, Artwork, ArtworkDraft, ArtworkPatch, NewArtwork, GALLERY_ARTIST};
pub use reconcile::{Session, SessionError, WorkingSet};
pub use seed::default_catalog;
pub use validate::{validate, validate_patch, ValidationError, MAX_IMAGE_URL_LEN};
