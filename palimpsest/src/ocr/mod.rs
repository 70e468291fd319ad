//! OCR (Optical Character Recognition) Module
//!
//! Text extraction for uploaded page images.
//!
//! # Architecture
//!
//! - `RecognitionEngine` is the seam around a stateful OCR handle
//! - `TesseractEngine` implements it with leptess, configured for one script
//! - `OcrProvider` owns the single process-wide handle and serializes calls
//!
//! # Configuration
//!
//! Engine behavior is fixed at startup by `OcrConfig` (see `config.rs`):
//! - `languages`: Tesseract language codes (`grc`, `lat`, ...)
//! - `whitelist`: allowed glyphs, empty for no restriction
//! - `preserve_interword_spaces`: keep runs of spaces between words
//! - `tessdata_dir`: optional traineddata location
//! - `timeout_secs`: bound on each recognition call
//!
//! # Usage
//!
//! ```rust,ignore
//! let ocr = OcrProvider::new(config.ocr.clone());
//! ocr.initialize(TesseractEngine::open).await?;
//! let text = ocr.recognize(&image_bytes).await?;
//! ```

mod engine;
mod provider;

pub use engine::{RecognitionEngine, TesseractEngine};
pub use provider::OcrProvider;
