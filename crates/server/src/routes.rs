use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use service::school::{repository::SchoolRepository, SchoolService};

use crate::openapi::ApiDoc;

pub mod schools;

/// Shared handler state. Holds the storage handle injected by the composition root.
#[derive(Clone)]
pub struct AppState {
    pub schools: Arc<SchoolService>,
}

impl AppState {
    pub fn new(repo: Arc<dyn SchoolRepository>) -> Self {
        Self { schools: Arc::new(SchoolService::new(repo)) }
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the application router. `request_timeout` bounds each request when set.
pub fn build_router(state: AppState, cors: CorsLayer, request_timeout: Option<Duration>) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/addSchool", post(schools::add_school))
        .route("/listSchools", get(schools::list_schools))
        .with_state(state);

    // 超时返回 408，连接池等待也包含在内
    let router = match request_timeout {
        Some(timeout) => router.layer(TimeoutLayer::new(timeout)),
        None => router,
    };

    router.layer(cors).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
            .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
    )
}
