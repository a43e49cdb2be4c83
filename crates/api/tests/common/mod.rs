#![allow(dead_code)]

//! Shared fixtures for API integration tests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use rankqueue_api::auth::jwt::{generate_access_token, JwtConfig};
use rankqueue_api::config::ServerConfig;
use rankqueue_api::router::build_app_router;
use rankqueue_api::state::AppState;
use rankqueue_core::config::ConsensusConfig;
use rankqueue_core::types::DbId;
use rankqueue_db::repositories::{MapsetRepo, QueueItemRepo, ReviewerRepo};
use rankqueue_engine::{ConsensusEngine, ProductionEffects};
use rankqueue_events::EventBus;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
        system_actor_id: 1,
    }
}

/// Build the full application router with production wiring over the test
/// pool, using the default thresholds (3 votes, 2 denials).
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, 3, 2)
}

/// Like [`build_test_app`] with explicit quorum thresholds.
pub fn build_test_app_with(pool: PgPool, votes_required: i64, denials_required: i64) -> Router {
    let config = test_config();
    let event_bus = Arc::new(EventBus::default());

    let consensus = ConsensusConfig::new(votes_required, denials_required, 7).unwrap();
    let effects = Arc::new(ProductionEffects::new(pool.clone(), event_bus));
    let engine = Arc::new(ConsensusEngine::new(pool.clone(), consensus, effects).unwrap());

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        engine,
    };

    build_app_router(state, &config)
}

/// Mint a valid access token for the given user id.
pub fn token_for(user_id: DbId) -> String {
    generate_access_token(user_id, "reviewer", &test_config().jwt).unwrap()
}

/// Send an unauthenticated GET request.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send an authenticated GET request.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send an authenticated POST request with a JSON body.
pub async fn post_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert status and return the parsed body, printing it on mismatch.
pub async fn expect_status(response: Response<Body>, expected: StatusCode) -> serde_json::Value {
    let status = response.status();
    let json = body_json(response).await;
    assert_eq!(status, expected, "unexpected status, body: {json}");
    json
}

/// Create a full (non-trial) reviewer with approval privileges.
pub async fn seed_reviewer(pool: &PgPool, username: &str) -> DbId {
    ReviewerRepo::create(pool, username, true, false)
        .await
        .unwrap()
        .id
}

/// Create a submitter, their mapset, and a pending queue item.
///
/// Returns `(queue_item_id, mapset_id, submitter_id)`.
pub async fn seed_item(pool: &PgPool) -> (DbId, DbId, DbId) {
    let submitter = ReviewerRepo::create(pool, "submitter", false, false)
        .await
        .unwrap();
    let mapset = MapsetRepo::create(pool, submitter.id, "Test Mapset", 1)
        .await
        .unwrap();
    let item = QueueItemRepo::create(pool, mapset.id).await.unwrap();
    (item.id, mapset.id, submitter.id)
}
