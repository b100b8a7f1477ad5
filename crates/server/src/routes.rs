use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::metrics;
use crate::openapi::ApiDoc;
use crate::state::ServerState;

pub mod items;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics_text() -> (axum::http::StatusCode, String) {
    metrics::encode_metrics()
}

/// Item routes relative to their mount point.
fn item_routes() -> Router<ServerState> {
    Router::new()
        .route("/items", get(items::list).post(items::create))
        .route(
            "/items/:id",
            get(items::get).put(items::update).delete(items::delete),
        )
}

/// Build the full application router: item CRUD under both `/items` and
/// `/api/items`, docs at `/swagger`, and the landing page as fallback.
pub fn build_router(state: ServerState, cors: CorsLayer, frontend_dir: &str) -> Router {
    let index = format!("{}/index.html", frontend_dir.trim_end_matches('/'));
    let static_dir = ServeDir::new(frontend_dir).fallback(ServeFile::new(index));

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_text))
        .merge(item_routes())
        .nest("/api", item_routes())
        .merge(SwaggerUi::new("/swagger").url("/swagger.json", ApiDoc::openapi()))
        .fallback_service(static_dir)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时记录状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::{Request, StatusCode}};
    use service::{items::ItemService, storage::MemoryDocumentStore};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let state = ServerState::new(ItemService::new(Arc::new(MemoryDocumentStore::new())));
        build_router(state, CorsLayer::very_permissive(), "frontend")
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null))
    }

    #[tokio::test]
    async fn create_then_fetch_under_both_prefixes() {
        let app = app();
        let (status, body) = send(
            &app,
            Request::post("/items")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"name":"a"}"#))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, serde_json::json!({"id": 1, "name": "a"}));

        for uri in ["/items/1", "/api/items/1"] {
            let (status, body) = send(&app, Request::get(uri).body(Body::empty()).unwrap()).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(body["name"], "a");
        }
    }

    #[tokio::test]
    async fn create_without_content_type_still_parses_body() {
        let app = app();
        let (status, body) = send(
            &app,
            Request::post("/api/items").body(Body::from(r#"{"name":"plain"}"#)).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 1);
    }

    #[tokio::test]
    async fn update_with_bad_body_is_invalid() {
        let app = app();
        let _ = send(
            &app,
            Request::post("/api/items").body(Body::from(r#"{"name":"a"}"#)).unwrap(),
        )
        .await;
        let (status, body) = send(
            &app,
            Request::put("/api/items/1").body(Body::from("nope")).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({"message": "Invalid item data"}));
    }
}
