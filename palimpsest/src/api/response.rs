//! Error body shared by every endpoint.
//!
//! ```json
//! { "error": "Failed to process image", "details": "Failed to set image: ..." }
//! ```
//!
//! `details` is omitted when there is nothing to add, so the missing-file
//! response is exactly `{ "error": "No image file provided" }`.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Stable, human-readable summary.
    pub error: String,
    /// Message from the underlying failure. Never a backtrace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

impl IntoResponse for ErrorBody {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
