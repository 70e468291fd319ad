//! `POST /api/ocr`: one image in, recognized text plus reference and
//! translation out.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::debug;

use crate::api::dto::OcrResponse;
use crate::api::response::ErrorBody;
use crate::api::routes::IMAGE_FIELD;
use crate::api::state::AppState;
use crate::error::{PalimpsestError, Result};
use crate::models::UploadedImage;

/// `POST /api/ocr`
///
/// Validation (presence, size, declared MIME type) happens before the
/// recognition engine is touched.
#[utoipa::path(
    post,
    path = "/api/ocr",
    tag = "ocr",
    operation_id = "ocr.recognize",
    request_body(
        content_type = "multipart/form-data",
        content = String,
        description = "Single image file in the `image` field"
    ),
    responses(
        (status = 200, description = "Text recognized", body = OcrResponse),
        (status = 400, description = "No image file provided", body = ErrorBody),
        (status = 413, description = "Image exceeds upload limit", body = ErrorBody),
        (status = 415, description = "Declared type is not image/*", body = ErrorBody),
        (status = 500, description = "Failed to process image", body = ErrorBody),
        (status = 503, description = "Recognition engine is not ready", body = ErrorBody),
        (status = 504, description = "Recognition timed out", body = ErrorBody),
    )
)]
pub async fn recognize_image(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<OcrResponse>> {
    let max_bytes = state.config.server.max_upload_bytes;

    let multipart = multipart.map_err(|rejection| {
        debug!(%rejection, "Request is not multipart");
        PalimpsestError::NoFileProvided
    })?;

    let image = read_image_field(multipart, max_bytes).await?;
    image.validate(max_bytes)?;

    let result = state.pipeline.process(&image).await?;
    Ok(Json(OcrResponse::from(result)))
}

/// Pull exactly one file from the `image` field. Other fields are skipped,
/// as is an `image` part without a filename (a plain text field).
async fn read_image_field(mut multipart: Multipart, max_bytes: usize) -> Result<UploadedImage> {
    let mut image: Option<UploadedImage> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(map_multipart_error(e, max_bytes)),
        };

        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let filename = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };
        if image.is_some() {
            return Err(PalimpsestError::Validation(
                "Only one image file may be provided".to_string(),
            ));
        }

        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_default();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| map_multipart_error(e, max_bytes))?;

        image = Some(UploadedImage::new(bytes.to_vec(), filename, content_type));
    }

    image.ok_or(PalimpsestError::NoFileProvided)
}

fn map_multipart_error(err: MultipartError, max_bytes: usize) -> PalimpsestError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        PalimpsestError::PayloadTooLarge { limit: max_bytes }
    } else {
        PalimpsestError::Validation(format!("Malformed multipart body: {}", err.body_text()))
    }
}
