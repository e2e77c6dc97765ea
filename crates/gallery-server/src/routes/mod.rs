//! API routes for the gallery server.

pub mod advisor;
pub mod artworks;
pub mod health;
pub mod upload;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::Router;
use gallery_catalog::inquiry::DEFAULT_WHATSAPP_NUMBER;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::AdminGuard;
use crate::store::CatalogStore;

/// Request body cap (10MB), sized for embedded data-URI images.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Shared state injected into every handler.
pub struct AppState<S> {
    pub store: Arc<S>,
    pub admin: AdminGuard,
    pub whatsapp_number: Arc<str>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            admin: self.admin.clone(),
            whatsapp_number: Arc::clone(&self.whatsapp_number),
        }
    }
}

impl<S: CatalogStore> AppState<S> {
    /// State with an open admin guard and the default inquiry number.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            admin: AdminGuard::open(),
            whatsapp_number: Arc::from(DEFAULT_WHATSAPP_NUMBER),
        }
    }

    pub fn with_admin(mut self, admin: AdminGuard) -> Self {
        self.admin = admin;
        self
    }

    pub fn with_whatsapp_number(mut self, number: &str) -> Self {
        self.whatsapp_number = Arc::from(number);
        self
    }
}

/// Creates the main API router with all routes mounted.
pub fn create_router<S: CatalogStore>(state: AppState<S>) -> Router {
    Router::new()
        .nest("/api", api_routes(state))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Answers 408 for any request still running after `timeout`.
pub fn with_request_timeout(router: Router, timeout: Duration) -> Router {
    router.layer(TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        timeout,
    ))
}

fn api_routes<S: CatalogStore>(state: AppState<S>) -> Router {
    Router::new()
        .nest("/artworks", artworks::router(state.clone()))
        .nest("/upload", upload::router(state.clone()))
        .nest("/health", health::router(state.clone()))
        .nest("/advisor", advisor::router(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use tower::ServiceExt;

    fn slow_router() -> Router {
        Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                "done"
            }),
        )
    }

    #[tokio::test]
    async fn test_slow_request_times_out() {
        let app = with_request_timeout(slow_router(), Duration::from_millis(10));
        let response = app
            .oneshot(Request::get("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[tokio::test]
    async fn test_fast_request_passes_through() {
        let app = with_request_timeout(slow_router(), Duration::from_secs(5));
        let response = app
            .oneshot(Request::get("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
