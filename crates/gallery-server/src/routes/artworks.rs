//! Artwork catalog endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use gallery_catalog::{inquiry_link, validate, validate_patch, ArtCategory, Artwork, ArtworkDraft};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::AppError;
use crate::store::CatalogStore;

/// Creates the artworks router.
pub fn router<S: CatalogStore>(state: AppState<S>) -> Router {
    Router::new()
        .route("/", get(list_artworks::<S>).post(create_artwork::<S>))
        .route(
            "/{id}",
            get(get_artwork::<S>)
                .put(update_artwork::<S>)
                .delete(delete_artwork::<S>),
        )
        .route("/{id}/inquiry", get(artwork_inquiry::<S>))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InquiryResponse {
    pub url: String,
}

/// Parses the `category` filter. Absent or "All" means no filter.
fn parse_category_filter(raw: Option<&str>) -> Result<Option<ArtCategory>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(all) if all.eq_ignore_ascii_case("all") => Ok(None),
        Some(value) => value
            .parse::<ArtCategory>()
            .map(Some)
            .map_err(|v| AppError::BadRequest(format!("Unknown category: '{}'", v))),
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Artwork not found".to_string())
}

/// GET /api/artworks
///
/// Lists the catalog, newest first. Accepts `?category=`.
async fn list_artworks<S: CatalogStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Artwork>>, AppError> {
    let category = parse_category_filter(query.category.as_deref())?;
    let artworks = state.store.list(category).await?;
    Ok(Json(artworks))
}

/// GET /api/artworks/{id}
async fn get_artwork<S: CatalogStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Artwork>, AppError> {
    state
        .store
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

/// POST /api/artworks
///
/// Validates the body, mints `id` and `createdAt`, and stores the record.
/// Any `id` in the body is ignored.
async fn create_artwork<S: CatalogStore>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    payload: Result<Json<ArtworkDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Artwork>), AppError> {
    state.admin.authorize(&headers)?;
    let Json(draft) = payload?;

    let new = validate(draft)?;
    let created = state.store.create(new).await?;

    tracing::info!(id = %created.id, title = %created.title, "Artwork created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/artworks/{id}
///
/// Partial update: only supplied fields change. An `id` in the body is stripped.
async fn update_artwork<S: CatalogStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<ArtworkDraft>, JsonRejection>,
) -> Result<Json<Artwork>, AppError> {
    state.admin.authorize(&headers)?;
    let Json(draft) = payload?;

    let patch = validate_patch(draft)?;
    let updated = state
        .store
        .update(&id, patch)
        .await?
        .ok_or_else(not_found)?;

    tracing::info!(id = %updated.id, "Artwork updated");
    Ok(Json(updated))
}

/// DELETE /api/artworks/{id}
async fn delete_artwork<S: CatalogStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, AppError> {
    state.admin.authorize(&headers)?;

    if !state.store.delete(&id).await? {
        return Err(not_found());
    }

    tracing::info!(id = %id, "Artwork deleted");
    Ok(Json(MessageResponse {
        message: "Artwork deleted successfully".to_string(),
    }))
}

/// GET /api/artworks/{id}/inquiry
///
/// Returns the messaging link a shopper follows to ask about this artwork.
async fn artwork_inquiry<S: CatalogStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<InquiryResponse>, AppError> {
    let artwork = state.store.get(&id).await?.ok_or_else(not_found)?;
    Ok(Json(InquiryResponse {
        url: inquiry_link(&artwork, &state.whatsapp_number),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_filter_absent_or_all() {
        assert_eq!(parse_category_filter(None).unwrap(), None);
        assert_eq!(parse_category_filter(Some("All")).unwrap(), None);
        assert_eq!(parse_category_filter(Some("")).unwrap(), None);
    }

    #[test]
    fn test_category_filter_values() {
        assert_eq!(
            parse_category_filter(Some("Pencil Work")).unwrap(),
            Some(ArtCategory::PencilWork)
        );
        let err = parse_category_filter(Some("Sculpture")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("Sculpture")));
    }
}
