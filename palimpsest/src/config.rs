use serde::Deserialize;
use std::env;

/// Upload ceiling for a single image (5 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Upper and lower case letters of the Greek alphabet, without diacritics.
pub const DEFAULT_GREEK_WHITELIST: &str =
    "ΑΒΓΔΕΖΗΘΙΚΛΜΝΞΟΠΡΣΤΥΦΧΨΩαβγδεζηθικλμνξοπρστυφχψω";

/// Bound on a single recognition call, in seconds.
pub const DEFAULT_OCR_TIMEOUT_SECS: u64 = 60;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub ocr: OcrConfig,
    pub reference: ReferenceConfig,
    pub translation: TranslationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted image, in bytes. The transport limit adds a small
    /// allowance on top of this for multipart framing.
    pub max_upload_bytes: usize,
}

/// Recognition engine settings. Fixed for the lifetime of the process.
#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    /// Tesseract language code(s), `+`-separated (e.g. `grc`, `lat`, `grc+lat`).
    pub languages: String,
    /// Restricts recognizable glyphs. Empty means unrestricted.
    pub whitelist: String,
    pub preserve_interword_spaces: bool,
    pub tessdata_dir: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceConfig {
    pub dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslationConfig {
    pub source_language: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            languages: "grc".to_string(),
            whitelist: DEFAULT_GREEK_WHITELIST.to_string(),
            preserve_interword_spaces: true,
            tessdata_dir: None,
            timeout_secs: DEFAULT_OCR_TIMEOUT_SECS,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("PALIMPSEST_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("PALIMPSEST_PORT", 8081),
                max_upload_bytes: parse_env_or(
                    "PALIMPSEST_MAX_UPLOAD_BYTES",
                    DEFAULT_MAX_UPLOAD_BYTES,
                ),
            },
            ocr: OcrConfig {
                languages: env::var("OCR_LANGUAGES").unwrap_or_else(|_| "grc".to_string()),
                whitelist: env::var("OCR_WHITELIST")
                    .unwrap_or_else(|_| DEFAULT_GREEK_WHITELIST.to_string()),
                preserve_interword_spaces: parse_env_or("OCR_PRESERVE_INTERWORD_SPACES", true),
                tessdata_dir: env::var("OCR_TESSDATA_DIR").ok(),
                timeout_secs: ocr_timeout_from_env(),
            },
            reference: ReferenceConfig {
                dir: env::var("REFERENCE_DIR").unwrap_or_else(|_| "ground_truth".to_string()),
            },
            translation: TranslationConfig {
                source_language: env::var("TRANSLATION_SOURCE_LANGUAGE")
                    .unwrap_or_else(|_| "grc".to_string()),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

/// A zero timeout would fail every request, so it is treated as invalid.
fn ocr_timeout_from_env() -> u64 {
    match parse_env_or("OCR_TIMEOUT", DEFAULT_OCR_TIMEOUT_SECS) {
        0 => {
            tracing::warn!(
                "Invalid value '0' for OCR_TIMEOUT: must be at least 1 second. Using default."
            );
            DEFAULT_OCR_TIMEOUT_SECS
        }
        secs => secs,
    }
}
