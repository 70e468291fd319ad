use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::error::Result;
use crate::models::{OcrResult, UploadedImage};
use crate::ocr::OcrProvider;
use crate::reference::ReferenceLibrary;
use crate::translation::Translator;

/// Recognize → reference lookup → translate, for one already-validated image.
///
/// Each call makes exactly one engine call and at most one directory scan.
/// Nothing is written anywhere.
#[derive(Clone)]
pub struct OcrPipeline {
    ocr: OcrProvider,
    references: ReferenceLibrary,
    translator: Arc<dyn Translator>,
    source_language: String,
}

impl OcrPipeline {
    pub fn new(
        ocr: OcrProvider,
        references: ReferenceLibrary,
        translator: Arc<dyn Translator>,
        source_language: impl Into<String>,
    ) -> Self {
        Self {
            ocr,
            references,
            translator,
            source_language: source_language.into(),
        }
    }

    pub async fn process(&self, image: &UploadedImage) -> Result<OcrResult> {
        let started = Instant::now();

        let recognized_text = self.ocr.recognize(&image.bytes).await?;
        let reference_text = self.references.lookup(&image.filename).await;
        let translated_text = self
            .translator
            .translate(&recognized_text, &self.source_language)
            .await?;

        info!(
            filename = %image.filename,
            bytes = image.size(),
            chars = recognized_text.chars().count(),
            reference = reference_text.is_some(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Image processed"
        );

        Ok(OcrResult {
            recognized_text,
            reference_text,
            translated_text,
        })
    }
}
