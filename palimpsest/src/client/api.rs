use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::debug;

use crate::api::dto::{HealthResponse, OcrResponse};
use crate::api::response::ErrorBody;
use crate::api::IMAGE_FIELD;
use crate::error::{PalimpsestError, Result};
use crate::models::{OcrResult, UploadedImage};

/// Anything that can turn an uploaded image into an [`OcrResult`].
#[async_trait]
pub trait RecognitionBackend: Send + Sync {
    async fn recognize(&self, image: &UploadedImage) -> Result<OcrResult>;
}

/// HTTP client for a running Palimpsest server.
#[derive(Clone, Debug)]
pub struct OcrClient {
    client: Client,
    base_url: String,
}

impl OcrClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/health`. A 503 while the engine initializes still carries a
    /// health body and is returned as `Ok`.
    pub async fn health(&self) -> Result<HealthResponse> {
        let response = self
            .client
            .get(format!("{}/api/health", self.base_url))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        match serde_json::from_str::<HealthResponse>(&body) {
            Ok(health) => Ok(health),
            Err(_) => Err(rejection(status.as_u16(), &body)),
        }
    }

    /// `POST /api/ocr` with the image in the `image` field.
    pub async fn recognize(&self, image: &UploadedImage) -> Result<OcrResult> {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.filename.clone())
            .mime_str(&image.content_type)
            .map_err(|e| {
                PalimpsestError::Validation(format!(
                    "Invalid content type '{}': {e}",
                    image.content_type
                ))
            })?;
        let form = Form::new().part(IMAGE_FIELD, part);

        debug!(filename = %image.filename, bytes = image.size(), "Submitting image");

        let response = self
            .client
            .post(format!("{}/api/ocr", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body: OcrResponse = response.json().await?;
            Ok(body.into())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(rejection(status.as_u16(), &body))
        }
    }
}

#[async_trait]
impl RecognitionBackend for OcrClient {
    async fn recognize(&self, image: &UploadedImage) -> Result<OcrResult> {
        OcrClient::recognize(self, image).await
    }
}

/// Error bodies are JSON from the handlers, but the transport-level limit
/// answers with plain text, so fall back to the raw body.
fn rejection(status: u16, body: &str) -> PalimpsestError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => PalimpsestError::ServerRejected {
            status,
            error: parsed.error,
            details: parsed.details,
        },
        Err(_) => PalimpsestError::ServerRejected {
            status,
            error: if body.trim().is_empty() {
                format!("HTTP {status}")
            } else {
                body.trim().to_string()
            },
            details: None,
        },
    }
}
