//! End-to-end tests of the REST surface over a file-backed store.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use gallery_catalog::{default_catalog, TimestampIds};
use gallery_server::auth::AdminGuard;
use gallery_server::store::{CatalogStore, FileStore};
use gallery_server::{create_router, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    _dir: TempDir,
    store: Arc<FileStore>,
    router: Router,
}

async fn test_app_with(admin: AdminGuard) -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = FileStore::open(dir.path().join("artworks.json"), Arc::new(TimestampIds::new()))
        .await
        .expect("Failed to open file store");
    let store = Arc::new(store);
    let router = create_router(AppState::new(Arc::clone(&store)).with_admin(admin));
    TestApp {
        _dir: dir,
        store,
        router,
    }
}

async fn test_app() -> TestApp {
    test_app_with(AdminGuard::open()).await
}

/// Helper to parse JSON response body.
async fn json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&body).expect("Failed to parse JSON response")
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn nocturne() -> Value {
    json!({
        "title": "Nocturne",
        "category": "Painting",
        "price": 1200,
        "year": 2023,
        "dimensions": "24x36",
        "imageUrl": "data:image/png;base64,AAAA",
        "available": true
    })
}

async fn create(app: &TestApp, body: Value) -> Value {
    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/api/artworks", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await
}

#[tokio::test]
async fn test_create_returns_minted_record() {
    let app = test_app().await;
    let created = create(&app, nocturne()).await;

    assert!(!created["id"].as_str().unwrap().is_empty());
    assert!(created["createdAt"].is_string());
    assert_eq!(created["title"], "Nocturne");
    assert_eq!(created["category"], "Painting");
    assert_eq!(created["price"], 1200.0);
    assert_eq!(created["year"], 2023);
    assert_eq!(created["dimensions"], "24x36");
    assert_eq!(created["imageUrl"], "data:image/png;base64,AAAA");
    assert_eq!(created["available"], true);
    assert_eq!(created["artist"], "Benard Mugambi");
}

#[tokio::test]
async fn test_create_ignores_client_id() {
    let app = test_app().await;
    let mut body = nocturne();
    body["id"] = json!("client-chosen");

    let created = create(&app, body).await;
    assert_ne!(created["id"], "client-chosen");
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let app = test_app().await;
    let created = create(&app, nocturne()).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .router
        .clone()
        .oneshot(get_request(&format!("/api/artworks/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, created);
}

#[tokio::test]
async fn test_create_rejects_invalid_payloads() {
    let app = test_app().await;

    let mut missing_title = nocturne();
    missing_title.as_object_mut().unwrap().remove("title");
    let mut bad_category = nocturne();
    bad_category["category"] = json!("Sculpture");
    let mut negative_price = nocturne();
    negative_price["price"] = json!(-1);

    for body in [missing_title, bad_category, negative_price] {
        let response = app
            .router
            .clone()
            .oneshot(json_request("POST", "/api/artworks", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["error"].is_string());
    }

    assert_eq!(app.store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = test_app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/artworks")
        .header("Content-Type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_newest_first_and_filtered() {
    let app = test_app().await;
    let a = create(&app, nocturne()).await;
    let mut sketch = nocturne();
    sketch["title"] = json!("Study");
    sketch["category"] = json!("Pencil Work");
    let b = create(&app, sketch).await;

    let response = app
        .router
        .clone()
        .oneshot(get_request("/api/artworks"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let all = json_body(response).await;
    let ids: Vec<&Value> = all.as_array().unwrap().iter().map(|r| &r["id"]).collect();
    assert_eq!(ids, vec![&b["id"], &a["id"]]);
    assert!(all[0].get("seq").is_none());
    assert!(all[0].get("_id").is_none());

    let response = app
        .router
        .clone()
        .oneshot(get_request("/api/artworks?category=Pencil%20Work"))
        .await
        .unwrap();
    let pencil = json_body(response).await;
    assert_eq!(pencil.as_array().unwrap().len(), 1);
    assert_eq!(pencil[0]["id"], b["id"]);

    let response = app
        .router
        .clone()
        .oneshot(get_request("/api/artworks?category=All"))
        .await
        .unwrap();
    assert_eq!(json_body(response).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_preserves_identity() {
    let app = test_app().await;
    let created = create(&app, nocturne()).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/artworks/{}", id),
            json!({ "id": "hijacked", "price": 950, "available": false }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated = json_body(response).await;
    assert_eq!(updated["id"], id);
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert_eq!(updated["price"], 950.0);
    assert_eq!(updated["available"], false);
    assert_eq!(updated["title"], "Nocturne");

    assert!(app.store.get("hijacked").await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_missing_id_is_not_found() {
    let app = test_app().await;
    create(&app, nocturne()).await;
    let before = app.store.list(None).await.unwrap();

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/artworks/does-not-exist",
            json!({ "price": 500 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"], "Artwork not found");

    assert_eq!(app.store.list(None).await.unwrap(), before);
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let app = test_app().await;
    let created = create(&app, nocturne()).await;
    let uri = format!("/api/artworks/{}", created["id"].as_str().unwrap());

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(&uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await["message"],
        "Artwork deleted successfully"
    );

    let response = app.router.clone().oneshot(get_request(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_missing_id_leaves_catalog_unchanged() {
    let app = test_app().await;
    create(&app, nocturne()).await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/artworks/does-not-exist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_store_failure_is_opaque_and_server_keeps_serving() {
    let app = test_app().await;
    // A directory where the temp file goes makes every write fail.
    std::fs::create_dir(app._dir.path().join("artworks.json.tmp")).unwrap();

    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/api/artworks", nocturne()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await, json!({ "error": "Internal server error" }));

    let response = app
        .router
        .clone()
        .oneshot(get_request("/api/artworks"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!([]));
    assert_eq!(app.store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_upload_echoes_data_uri() {
    let app = test_app().await;
    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/upload",
            json!({ "image": "data:image/png;base64,AAAA" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await["imageUrl"],
        "data:image/png;base64,AAAA"
    );
}

#[tokio::test]
async fn test_upload_rejects_non_data_uri() {
    let app = test_app().await;

    for body in [json!({ "image": "not-a-data-uri" }), json!({})] {
        let response = app
            .router
            .clone()
            .oneshot(json_request("POST", "/api/upload", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    assert_eq!(app.store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_health_reports_store() {
    let app = test_app().await;
    let response = app
        .router
        .clone()
        .oneshot(get_request("/api/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let health = json_body(response).await;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["database"], "connected");
    assert!(health["timestamp"].is_string());
}

#[tokio::test]
async fn test_mutations_require_admin_token() {
    let app = test_app_with(AdminGuard::from_token("letmein")).await;

    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/api/artworks", nocturne()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let mut request = json_request("POST", "/api/artworks", nocturne());
    request
        .headers_mut()
        .insert("Authorization", "Bearer wrong".parse().unwrap());
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.store.count().await.unwrap(), 0);

    let mut request = json_request("POST", "/api/artworks", nocturne());
    request
        .headers_mut()
        .insert("Authorization", "Bearer letmein".parse().unwrap());
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Reads stay public.
    let response = app
        .router
        .clone()
        .oneshot(get_request("/api/artworks"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_inquiry_link() {
    let app = test_app().await;
    let created = create(&app, nocturne()).await;

    let response = app
        .router
        .clone()
        .oneshot(get_request(&format!(
            "/api/artworks/{}/inquiry",
            created["id"].as_str().unwrap()
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let url = json_body(response).await["url"].as_str().unwrap().to_string();
    assert!(url.starts_with("https://wa.me/254711874765?text="));
    assert!(url.contains("Nocturne"));

    let response = app
        .router
        .clone()
        .oneshot(get_request("/api/artworks/does-not-exist/inquiry"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_advisor_context_lists_inventory() {
    let app = test_app().await;
    app.store.import(default_catalog()).await.unwrap();

    let response = app
        .router
        .clone()
        .oneshot(get_request("/api/advisor/context"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let context = json_body(response).await;
    assert_eq!(context["artworkCount"], default_catalog().len());
    let instruction = context["systemInstruction"].as_str().unwrap();
    for artwork in default_catalog() {
        assert!(instruction.contains(&artwork.title));
    }
}
