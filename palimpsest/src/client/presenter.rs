use std::fmt::Write;

use tracing::warn;

use crate::api::dto::NO_GROUND_TRUTH;
use crate::models::OcrResult;

use super::clipboard::Clipboard;

const EMPTY_PLACEHOLDER: &str = "Translation will appear here...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
}

/// A non-fatal, user-facing message (the CLI prints it; a UI would toast it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
}

/// Renders the current result, if any. Holds no state of its own.
pub struct ResultPresenter<'a> {
    result: Option<&'a OcrResult>,
}

impl<'a> ResultPresenter<'a> {
    pub fn new(result: Option<&'a OcrResult>) -> Self {
        Self { result }
    }

    pub fn render(&self) -> String {
        let Some(result) = self.result else {
            return EMPTY_PLACEHOLDER.to_string();
        };

        let mut out = String::new();
        section(&mut out, "Recognized Text", &result.recognized_text);
        section(
            &mut out,
            "Ground Truth",
            result.reference_text.as_deref().unwrap_or(NO_GROUND_TRUTH),
        );
        section(&mut out, "English Translation", &result.translated_text);
        out.truncate(out.trim_end().len());
        out
    }

    pub fn copy_translation(&self, clipboard: &mut dyn Clipboard) -> Notice {
        let text = self.result.map(|r| r.translated_text.as_str());
        copy_text(clipboard, text, "translated text")
    }

    pub fn copy_recognized(&self, clipboard: &mut dyn Clipboard) -> Notice {
        let text = self.result.map(|r| r.recognized_text.as_str());
        copy_text(clipboard, text, "recognized text")
    }
}

/// Best effort: a clipboard failure is reported as a warning notice and never
/// propagates.
fn copy_text(clipboard: &mut dyn Clipboard, text: Option<&str>, what: &str) -> Notice {
    let Some(text) = text else {
        return Notice {
            kind: NoticeKind::Warning,
            title: "Nothing to copy".to_string(),
            description: "Process an image first.".to_string(),
        };
    };

    match clipboard.set_text(text) {
        Ok(()) => Notice {
            kind: NoticeKind::Info,
            title: "Copied to clipboard".to_string(),
            description: format!("The {what} has been copied successfully."),
        },
        Err(e) => {
            warn!(error = %e, "Clipboard copy failed");
            Notice {
                kind: NoticeKind::Warning,
                title: "Failed to copy".to_string(),
                description: "Please try copying the text manually.".to_string(),
            }
        }
    }
}

fn section(out: &mut String, title: &str, body: &str) {
    let body = if body.is_empty() { "(no text recognized)" } else { body };
    // Writing to a String cannot fail.
    let _ = writeln!(out, "== {title} ==\n{body}\n");
}
