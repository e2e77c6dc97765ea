//! Advisor context endpoint.
//!
//! Exposes the read-only catalog context the shopper advisor is grounded in.

use axum::{extract::State, routing::get, Json, Router};
use gallery_catalog::advisor::system_instruction;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::AppError;
use crate::store::CatalogStore;

/// Creates the advisor router.
pub fn router<S: CatalogStore>(state: AppState<S>) -> Router {
    Router::new()
        .route("/context", get(advisor_context::<S>))
        .with_state(state)
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorContext {
    pub system_instruction: String,
    pub artwork_count: usize,
}

/// GET /api/advisor/context
async fn advisor_context<S: CatalogStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<AdvisorContext>, AppError> {
    let artworks = state.store.list(None).await?;
    Ok(Json(AdvisorContext {
        system_instruction: system_instruction(&artworks),
        artwork_count: artworks.len(),
    }))
}
