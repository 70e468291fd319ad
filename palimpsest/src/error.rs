use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::response::ErrorBody;

#[derive(Error, Debug)]
pub enum PalimpsestError {
    #[error("No image file provided")]
    NoFileProvided,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Image exceeds the {limit} byte upload limit")]
    PayloadTooLarge { limit: usize },

    #[error("Expected an image/* upload, got '{0}'")]
    UnsupportedMediaType(String),

    #[error("Recognition error: {0}")]
    Recognition(String),

    #[error("Recognition timed out after {0} seconds")]
    RecognitionTimeout(u64),

    #[error("Recognition engine is not ready")]
    EngineNotReady,

    #[error("Recognition engine initialization failed: {0}")]
    EngineInit(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server rejected request ({status}): {error}")]
    ServerRejected {
        status: u16,
        error: String,
        details: Option<String>,
    },

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PalimpsestError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NoFileProvided | Self::Validation(_) | Self::Json(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::RecognitionTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::EngineNotReady => StatusCode::SERVICE_UNAVAILABLE,
            Self::Http(_) => StatusCode::BAD_GATEWAY,
            Self::ServerRejected { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Recognition(_)
            | Self::EngineInit(_)
            | Self::Translation(_)
            | Self::Clipboard(_)
            | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Wire body for this error. `details` carries display text only, never
    /// a debug representation or backtrace.
    pub fn body(&self) -> ErrorBody {
        match self {
            Self::NoFileProvided => ErrorBody::new("No image file provided"),
            Self::Validation(msg) => ErrorBody::new(msg.clone()),
            Self::PayloadTooLarge { .. } => {
                ErrorBody::with_details("Image exceeds upload limit", self.to_string())
            }
            Self::UnsupportedMediaType(_) => {
                ErrorBody::with_details("Unsupported media type", self.to_string())
            }
            Self::EngineNotReady => ErrorBody::new("Recognition engine is not ready"),
            Self::RecognitionTimeout(_) => {
                ErrorBody::with_details("Recognition timed out", self.to_string())
            }
            Self::Recognition(msg) | Self::Translation(msg) | Self::EngineInit(msg) => {
                ErrorBody::with_details("Failed to process image", msg.clone())
            }
            Self::ServerRejected { error, details, .. } => ErrorBody {
                error: error.clone(),
                details: details.clone(),
            },
            Self::Http(_) | Self::Json(_) | Self::Io(_) | Self::Clipboard(_) => {
                ErrorBody::with_details("Failed to process image", self.to_string())
            }
        }
    }
}

impl IntoResponse for PalimpsestError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, self.body()).into_response()
    }
}

pub type Result<T> = std::result::Result<T, PalimpsestError>;
