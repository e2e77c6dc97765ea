//! One-shot import of a JSON catalog file into the configured store.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use gallery_catalog::{validate, Artwork};

use crate::store::CatalogStore;

/// What an import did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    /// Records read from the source file.
    pub found: usize,
    /// Records already in the store before the import.
    pub existing: usize,
    /// Records removed because `force` was set.
    pub cleared: usize,
    pub inserted: usize,
    /// True when the store already had data and `force` was not set.
    pub skipped: bool,
    /// Records in the store afterwards.
    pub total: usize,
}

/// Reads `path` (a JSON array of artworks, newest first) and checks every record.
pub fn read_catalog_file(path: &Path) -> Result<Vec<Artwork>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    let artworks: Vec<Artwork> = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse '{}' as an artwork array", path.display()))?;

    let mut seen = HashSet::new();
    for (index, artwork) in artworks.iter().enumerate() {
        if !seen.insert(artwork.id.as_str()) {
            bail!("Duplicate id '{}' at index {}", artwork.id, index);
        }
        validate(artwork.to_draft())
            .with_context(|| format!("Invalid artwork '{}' at index {}", artwork.id, index))?;
    }

    Ok(artworks)
}

/// Imports `artworks` into `store`, keeping their ids.
///
/// A non-empty store is left untouched unless `force` is set, in which case
/// it is cleared first.
pub async fn import_catalog<S: CatalogStore>(
    store: &S,
    artworks: Vec<Artwork>,
    force: bool,
) -> Result<MigrationReport> {
    let found = artworks.len();
    let existing = store.count().await.context("Failed to count existing artworks")?;

    if existing > 0 && !force {
        tracing::warn!(
            "Store already has {} artworks; skipping import (use --force to replace)",
            existing
        );
        return Ok(MigrationReport {
            found,
            existing,
            cleared: 0,
            inserted: 0,
            skipped: true,
            total: existing,
        });
    }

    let cleared = if existing > 0 {
        let cleared = store.clear().await.context("Failed to clear existing artworks")?;
        tracing::info!("Cleared {} existing artworks", cleared);
        cleared
    } else {
        0
    };

    let inserted = store.import(artworks).await.context("Failed to insert artworks")?;
    let total = store.count().await.context("Failed to verify import")?;
    tracing::info!("Inserted {} artworks ({} total)", inserted, total);

    Ok(MigrationReport {
        found,
        existing,
        cleared,
        inserted,
        skipped: false,
        total,
    })
}
