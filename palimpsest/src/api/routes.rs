use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, StatusCode};
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::error::PalimpsestError;

use super::handlers;
use super::openapi;
use super::AppState;

/// Multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

/// Headroom above `max_upload_bytes` for multipart boundaries and part headers.
pub const MULTIPART_ALLOWANCE: usize = 64 * 1024;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Requests declaring a larger Content-Length get a 413 here, before any
    // handler runs. Streamed bodies are cut off at the same limit.
    let max_upload_bytes = state.config.server.max_upload_bytes;
    let body_limit = max_upload_bytes.saturating_add(MULTIPART_ALLOWANCE);

    let api = Router::new()
        .route("/ocr", post(handlers::recognize_image))
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(openapi::openapi_json))
        .merge(openapi::redoc_router());

    Router::new()
        .nest("/api", api)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(middleware::map_response_with_state(
            max_upload_bytes,
            json_payload_too_large,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The transport limit answers in plain text; rewrite that into the same JSON
/// body the handler produces.
async fn json_payload_too_large(State(limit): State<usize>, response: Response) -> Response {
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));

    if response.status() == StatusCode::PAYLOAD_TOO_LARGE && !is_json {
        return PalimpsestError::PayloadTooLarge { limit }.into_response();
    }
    response
}
