//! Health check endpoint.

use axum::{extract::State, routing::get, Json, Router};

use super::AppState;
use crate::store::{CatalogStore, StoreHealth};

/// Creates the health router.
pub fn router<S: CatalogStore>(state: AppState<S>) -> Router {
    Router::new()
        .route("/", get(health::<S>))
        .with_state(state)
}

/// GET /api/health
///
/// Always 200; `database` reports whether the store is reachable.
async fn health<S: CatalogStore>(State(state): State<AppState<S>>) -> Json<StoreHealth> {
    Json(state.store.health().await)
}
