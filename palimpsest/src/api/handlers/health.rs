use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// `GET /api/health`
///
/// Reports 503 with `worker: false` while the recognition engine is still
/// initializing, then 200 `{ "status": "ok", "worker": true }`.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Recognition engine ready", body = HealthResponse),
        (status = 503, description = "Recognition engine still initializing", body = HealthResponse),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    if state.ocr.is_ready() {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                worker: true,
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "initializing".to_string(),
                worker: false,
            }),
        )
    }
}
