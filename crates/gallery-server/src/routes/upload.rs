//! Image upload endpoint.
//!
//! Images travel as `data:image/...;base64,...` URIs and are stored inline in
//! the artwork record, so "uploading" validates the URI and echoes it back.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use gallery_catalog::validate::is_data_image_uri;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::AppError;
use crate::store::CatalogStore;

/// Creates the upload router.
pub fn router<S: CatalogStore>(state: AppState<S>) -> Router {
    Router::new()
        .route("/", post(upload_image::<S>))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub image: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub image_url: String,
}

/// Checks that `image` is a data-URI image whose base64 payload decodes.
pub fn validate_image_data_uri(image: &str) -> Result<(), AppError> {
    if !is_data_image_uri(image) {
        return Err(AppError::BadRequest(
            "Invalid image format. Must be base64 encoded.".to_string(),
        ));
    }

    let (header, payload) = image
        .split_once(',')
        .ok_or_else(|| AppError::BadRequest("Malformed data URI: missing ','".to_string()))?;

    if header.ends_with(";base64") {
        BASE64_STANDARD
            .decode(payload.trim())
            .map_err(|e| AppError::BadRequest(format!("Invalid base64 image data: {}", e)))?;
    }

    Ok(())
}

/// POST /api/upload
async fn upload_image<S: CatalogStore>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    payload: Result<Json<UploadRequest>, JsonRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    state.admin.authorize(&headers)?;
    let Json(request) = payload?;

    let image = match request.image {
        Some(image) if !image.trim().is_empty() => image,
        _ => return Err(AppError::BadRequest("No image data provided".to_string())),
    };

    validate_image_data_uri(&image)?;

    Ok(Json(UploadResponse { image_url: image }))
}
