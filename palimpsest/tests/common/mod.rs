#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;

use palimpsest::api::{create_router, AppState};
use palimpsest::config::{
    Config, OcrConfig, ReferenceConfig, ServerConfig, TranslationConfig, DEFAULT_MAX_UPLOAD_BYTES,
};
use palimpsest::error::{PalimpsestError, Result};
use palimpsest::ocr::{OcrProvider, RecognitionEngine};
use palimpsest::translation::PlaceholderTranslator;

pub const BOUNDARY: &str = "palimpsest-test-boundary";

/// One part of a hand-built multipart body.
pub struct Part<'a> {
    pub name: &'a str,
    pub filename: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub data: &'a [u8],
}

impl<'a> Part<'a> {
    pub fn file(name: &'a str, filename: &'a str, content_type: &'a str, data: &'a [u8]) -> Self {
        Self {
            name,
            filename: Some(filename),
            content_type: Some(content_type),
            data,
        }
    }

    pub fn image(filename: &'a str, data: &'a [u8]) -> Self {
        Self::file("image", filename, "image/jpeg", data)
    }

    pub fn text(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            filename: None,
            content_type: None,
            data: value.as_bytes(),
        }
    }
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let disposition = match part.filename {
            Some(filename) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                part.name, filename
            ),
            None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name),
        };
        body.extend_from_slice(disposition.as_bytes());
        if let Some(content_type) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn ocr_request(parts: &[Part<'_>]) -> Request<Body> {
    let body = multipart_body(parts);
    Request::builder()
        .method("POST")
        .uri("/api/ocr")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn test_config(reference_dir: &Path) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        },
        ocr: OcrConfig {
            timeout_secs: 5,
            ..OcrConfig::default()
        },
        reference: ReferenceConfig {
            dir: reference_dir.display().to_string(),
        },
        translation: TranslationConfig {
            source_language: "grc".to_string(),
        },
    }
}

pub fn router(config: Config, ocr: OcrProvider) -> Router {
    create_router(AppState::new(config, ocr, Arc::new(PlaceholderTranslator)))
}

pub fn ready_router<E: RecognitionEngine>(config: Config, engine: E) -> Router {
    let ocr = OcrProvider::with_engine(config.ocr.clone(), engine);
    router(config, ocr)
}

/// Returns a fixed text and counts calls.
#[derive(Clone)]
pub struct ScriptedEngine {
    pub text: &'static str,
    pub calls: Arc<AtomicUsize>,
}

impl ScriptedEngine {
    pub fn new(text: &'static str) -> Self {
        Self {
            text,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RecognitionEngine for ScriptedEngine {
    fn recognize(&mut self, _image: &[u8]) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.to_string())
    }
}

/// Reads the image bytes back as text.
pub struct EchoEngine;

impl RecognitionEngine for EchoEngine {
    fn recognize(&mut self, image: &[u8]) -> Result<String> {
        Ok(String::from_utf8_lossy(image).into_owned())
    }
}

pub struct FailingEngine(pub &'static str);

impl RecognitionEngine for FailingEngine {
    fn recognize(&mut self, _image: &[u8]) -> Result<String> {
        Err(PalimpsestError::Recognition(self.0.to_string()))
    }
}

pub struct SlowEngine(pub Duration);

impl RecognitionEngine for SlowEngine {
    fn recognize(&mut self, _image: &[u8]) -> Result<String> {
        std::thread::sleep(self.0);
        Ok("late".to_string())
    }
}
