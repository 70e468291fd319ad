//! Translation of recognized text.
//!
//! Only a placeholder ships today. The trait is the boundary a real
//! translator plugs into without changing the request pipeline.

use async_trait::async_trait;

use crate::error::Result;

#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text`, written in `source_language` (a Tesseract-style
    /// code such as `grc` or `lat`), into English.
    async fn translate(&self, text: &str, source_language: &str) -> Result<String>;
}

/// Deterministic stand-in that wraps the input instead of translating it.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderTranslator;

#[async_trait]
impl Translator for PlaceholderTranslator {
    async fn translate(&self, text: &str, _source_language: &str) -> Result<String> {
        Ok(format!("[Translation of: {text}]"))
    }
}
