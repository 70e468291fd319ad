use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Palimpsest API",
        version = "1.0.0",
        description = "OCR for classical Greek and Latin page images, with reference transcription lookup.",
    ),
    paths(
        handlers::health::health_check,
        handlers::ocr::recognize_image,
    ),
    components(schemas(
        response::ErrorBody,
        dto::OcrResponse,
        dto::HealthResponse,
    )),
    tags(
        (name = "health", description = "Recognition engine readiness"),
        (name = "ocr", description = "Image upload and text recognition"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
