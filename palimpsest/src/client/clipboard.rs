use crate::error::{PalimpsestError, Result};

/// Destination for copy actions.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The OS clipboard via arboard. Opened on first use, so constructing one on
/// a headless machine never fails.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        if self.inner.is_none() {
            let clipboard = arboard::Clipboard::new().map_err(|e| {
                PalimpsestError::Clipboard(format!("Failed to initialize clipboard: {e}"))
            })?;
            self.inner = Some(clipboard);
        }

        let Some(clipboard) = self.inner.as_mut() else {
            return Err(PalimpsestError::Clipboard("Clipboard unavailable".to_string()));
        };
        clipboard
            .set_text(text.to_string())
            .map_err(|e| PalimpsestError::Clipboard(format!("Failed to copy text: {e}")))
    }
}
