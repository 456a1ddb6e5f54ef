//! HTTP surface of the website backend.
//!
//! `GET /api/stars` serves the `RepoStats` snapshot of the tracked repository,
//! `GET /api/health` answers without touching the upstream API.

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use log::debug;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::Aggregator;

/// Sent with every response, whatever the outcome.
pub const SECURITY_HEADERS: [(HeaderName, &str); 4] = [
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "DENY"),
    (header::X_XSS_PROTECTION, "1; mode=block"),
    (header::REFERRER_POLICY, "strict-origin-when-cross-origin"),
];

#[derive(Clone)]
pub struct AppState {
    aggregator: Aggregator,
    cache_control: HeaderValue,
}

impl AppState {
    /// `cache_max_age` is how long shared caches may keep, and then serve stale, a successful snapshot.
    pub fn new(aggregator: Aggregator, cache_max_age: u32) -> anyhow::Result<Self> {
        let cache_control = HeaderValue::from_str(&format!(
            "public, s-maxage={0}, stale-while-revalidate={0}",
            cache_max_age
        ))?;
        Ok(AppState {
            aggregator,
            cache_control,
        })
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/stars", get(stars))
        .route("/health", get(health));

    let mut router = Router::new().nest("/api", api_routes).layer(cors).with_state(state);
    for (name, value) in SECURITY_HEADERS {
        router = router.layer(SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value)));
    }
    router
}

async fn stars(State(state): State<AppState>) -> Response {
    let stats = state.aggregator.stats().await;
    let (status, cache_control) = if stats.is_failure() {
        (StatusCode::INTERNAL_SERVER_ERROR, HeaderValue::from_static("no-store"))
    } else {
        (StatusCode::OK, state.cache_control.clone())
    };
    debug!("GET /api/stars -> {}", status);
    (status, [(header::CACHE_CONTROL, cache_control)], Json(stats)).into_response()
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
