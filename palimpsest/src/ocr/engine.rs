use leptess::{LepTess, Variable};
use tracing::info;

use crate::config::OcrConfig;
use crate::error::{PalimpsestError, Result};

/// A stateful OCR handle.
///
/// Implementations may keep per-call state inside the handle (Tesseract keeps
/// the current image), so `recognize` takes `&mut self` and callers must not
/// share one handle between threads without serializing access. `OcrProvider`
/// is the only owner in the service.
pub trait RecognitionEngine: Send + 'static {
    /// Recognize text in `image`. The bytes are not validated up front; a
    /// decode failure is reported as [`PalimpsestError::Recognition`].
    fn recognize(&mut self, image: &[u8]) -> Result<String>;
}

impl<E: RecognitionEngine + ?Sized> RecognitionEngine for Box<E> {
    fn recognize(&mut self, image: &[u8]) -> Result<String> {
        (**self).recognize(image)
    }
}

/// Tesseract via leptess, configured once for a script and glyph whitelist.
pub struct TesseractEngine {
    inner: LepTess,
}

impl TesseractEngine {
    /// Load the language model and apply the whitelist and spacing options.
    ///
    /// Blocking: model loading reads traineddata from disk.
    pub fn open(config: &OcrConfig) -> Result<Self> {
        let mut inner = LepTess::new(config.tessdata_dir.as_deref(), &config.languages)
            .map_err(|e| {
                PalimpsestError::EngineInit(format!(
                    "Tesseract could not load '{}': {e}",
                    config.languages
                ))
            })?;

        if !config.whitelist.is_empty() {
            inner
                .set_variable(Variable::TesseditCharWhitelist, &config.whitelist)
                .map_err(|e| {
                    PalimpsestError::EngineInit(format!("Failed to set character whitelist: {e}"))
                })?;
        }

        let spacing = if config.preserve_interword_spaces { "1" } else { "0" };
        inner
            .set_variable(Variable::PreserveInterwordSpaces, spacing)
            .map_err(|e| {
                PalimpsestError::EngineInit(format!("Failed to set interword spacing: {e}"))
            })?;

        info!(
            languages = %config.languages,
            whitelist_len = config.whitelist.chars().count(),
            preserve_interword_spaces = config.preserve_interword_spaces,
            "Tesseract OCR initialized"
        );

        Ok(Self { inner })
    }
}

impl RecognitionEngine for TesseractEngine {
    fn recognize(&mut self, image: &[u8]) -> Result<String> {
        self.inner
            .set_image_from_mem(image)
            .map_err(|e| PalimpsestError::Recognition(format!("Failed to set image: {e}")))?;
        self.inner
            .get_utf8_text()
            .map_err(|e| PalimpsestError::Recognition(format!("Failed to extract text: {e}")))
    }
}
