//! Wire types for the HTTP API. Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::models::OcrResult;

/// `groundTruth` value when no reference transcription matched the upload.
pub const NO_GROUND_TRUTH: &str = "No matching ground truth found";

/// `POST /api/ocr` success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OcrResponse {
    /// Recognized text. May be empty, never null.
    pub original_text: String,
    /// Reference transcription, or the literal "No matching ground truth found".
    pub ground_truth: String,
    pub translation: String,
}

impl From<OcrResult> for OcrResponse {
    fn from(result: OcrResult) -> Self {
        Self {
            original_text: result.recognized_text,
            ground_truth: result
                .reference_text
                .unwrap_or_else(|| NO_GROUND_TRUTH.to_string()),
            translation: result.translated_text,
        }
    }
}

impl From<OcrResponse> for OcrResult {
    fn from(response: OcrResponse) -> Self {
        let reference_text = if response.ground_truth == NO_GROUND_TRUTH {
            None
        } else {
            Some(response.ground_truth)
        };

        Self {
            recognized_text: response.original_text,
            reference_text,
            translated_text: response.translation,
        }
    }
}

/// `GET /api/health` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    /// `ok` once the engine is ready, `initializing` before.
    pub status: String,
    /// Whether the recognition engine is ready.
    pub worker: bool,
}
