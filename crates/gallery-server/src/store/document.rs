//! PostgreSQL document store.
//!
//! Each artwork is one JSONB document in the `artworks` table. The row's
//! `seq` column is storage-internal and never selected into a response; the
//! document's own `id` field is the application-level identity, backed by a
//! unique index. `category` is mirrored into a column for indexed filtering.

use std::sync::Arc;

use chrono::Utc;
use gallery_catalog::{ArtCategory, Artwork, ArtworkPatch, IdGenerator, NewArtwork};
use sqlx::types::Json;
use sqlx::PgPool;

use super::{CatalogStore, Connectivity, StoreError, StoreHealth};
use crate::db;

pub struct DocumentStore {
    pool: PgPool,
    ids: Arc<dyn IdGenerator>,
}

impl DocumentStore {
    pub fn new(pool: PgPool, ids: Arc<dyn IdGenerator>) -> Self {
        Self { pool, ids }
    }

    /// Runs pending migrations (table and indexes).
    pub async fn migrate(&self) -> Result<(), StoreError> {
        db::run_migrations(&self.pool).await?;
        Ok(())
    }
}

fn map_insert_error(id: &str, e: sqlx::Error) -> StoreError {
    match e.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => StoreError::DuplicateId(id.to_string()),
        _ => StoreError::Database(e),
    }
}

impl CatalogStore for DocumentStore {
    async fn list(&self, category: Option<ArtCategory>) -> Result<Vec<Artwork>, StoreError> {
        let rows: Vec<(Json<Artwork>,)> = sqlx::query_as(
            r#"
            SELECT doc
            FROM artworks
            WHERE ($1::TEXT IS NULL OR category = $1)
            ORDER BY seq DESC
            "#,
        )
        .bind(category.map(|c| c.as_str()))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(Json(doc),)| doc).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Artwork>, StoreError> {
        let row: Option<(Json<Artwork>,)> =
            sqlx::query_as("SELECT doc FROM artworks WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(Json(doc),)| doc))
    }

    async fn create(&self, new: NewArtwork) -> Result<Artwork, StoreError> {
        let now = Utc::now();
        let artwork = new.into_artwork(self.ids.next_id(), Some(now));

        sqlx::query(
            r#"
            INSERT INTO artworks (id, category, doc, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&artwork.id)
        .bind(artwork.category.as_str())
        .bind(Json(&artwork))
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(&artwork.id, e))?;

        Ok(artwork)
    }

    async fn update(&self, id: &str, patch: ArtworkPatch) -> Result<Option<Artwork>, StoreError> {
        // Single statement: the merge is atomic for this document.
        let row: Option<(Json<Artwork>,)> = sqlx::query_as(
            r#"
            UPDATE artworks
            SET doc = doc || $2,
                category = COALESCE($3, category)
            WHERE id = $1
            RETURNING doc
            "#,
        )
        .bind(id)
        .bind(Json(patch.to_document()))
        .bind(patch.category.map(|c| c.as_str()))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(Json(doc),)| doc))
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM artworks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM artworks")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.max(0) as usize)
    }

    async fn import(&self, artworks: Vec<Artwork>) -> Result<usize, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        // Oldest first, so that `seq` order matches creation order.
        for artwork in artworks.iter().rev() {
            let created_at = artwork.created_at.unwrap_or_else(Utc::now);
            sqlx::query(
                r#"
                INSERT INTO artworks (id, category, doc, created_at)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(&artwork.id)
            .bind(artwork.category.as_str())
            .bind(Json(artwork))
            .bind(created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_insert_error(&artwork.id, e))?;
            inserted += 1;
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn clear(&self) -> Result<usize, StoreError> {
        let result = sqlx::query("DELETE FROM artworks")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() as usize)
    }

    async fn health(&self) -> StoreHealth {
        let reachable = !self.pool.is_closed()
            && sqlx::query("SELECT 1").execute(&self.pool).await.is_ok();

        StoreHealth::new(if reachable {
            Connectivity::Connected
        } else {
            Connectivity::Disconnected
        })
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
