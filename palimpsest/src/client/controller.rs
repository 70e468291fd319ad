use tracing::debug;

use crate::error::{PalimpsestError, Result};
use crate::models::{OcrResult, UploadedImage};

use super::api::RecognitionBackend;

/// Where the single upload slot currently stands.
///
/// ```text
/// Empty ──select──▶ Selected ──begin_submit──▶ Submitting ──▶ Succeeded | Failed
///   ▲                                                            │
///   └──────────────────────── clear (from any state) ────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    Empty,
    Selected {
        image: UploadedImage,
    },
    Submitting {
        image: UploadedImage,
    },
    Succeeded {
        image: UploadedImage,
        result: OcrResult,
    },
    /// The image stays selected so the user can resubmit.
    Failed {
        image: UploadedImage,
        message: String,
    },
}

/// Permission to run one request, tied to the selection it was issued for.
#[derive(Debug)]
pub struct SubmitTicket {
    generation: u64,
    image: UploadedImage,
}

impl SubmitTicket {
    pub fn image(&self) -> &UploadedImage {
        &self.image
    }
}

/// Holds one image in memory and tracks its submission.
///
/// At most one request is in flight per controller. Selecting or clearing
/// bumps a generation counter; a response carrying an older generation is
/// dropped instead of overwriting the newer state.
#[derive(Debug)]
pub struct UploadController {
    state: UploadState,
    generation: u64,
}

impl Default for UploadController {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadController {
    pub fn new() -> Self {
        Self {
            state: UploadState::Empty,
            generation: 0,
        }
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn image(&self) -> Option<&UploadedImage> {
        match &self.state {
            UploadState::Empty => None,
            UploadState::Selected { image }
            | UploadState::Submitting { image }
            | UploadState::Succeeded { image, .. }
            | UploadState::Failed { image, .. } => Some(image),
        }
    }

    pub fn result(&self) -> Option<&OcrResult> {
        match &self.state {
            UploadState::Succeeded { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            UploadState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, UploadState::Submitting { .. })
    }

    pub fn can_submit(&self) -> bool {
        matches!(
            self.state,
            UploadState::Selected { .. } | UploadState::Succeeded { .. } | UploadState::Failed { .. }
        )
    }

    /// Replace the current image (and any result) with `image`.
    ///
    /// Non-image types are rejected and the state is left untouched.
    pub fn select(&mut self, image: UploadedImage) -> Result<()> {
        if !image.is_image() {
            return Err(PalimpsestError::UnsupportedMediaType(image.content_type));
        }
        self.generation += 1;
        self.state = UploadState::Selected { image };
        Ok(())
    }

    pub fn clear(&mut self) {
        self.generation += 1;
        self.state = UploadState::Empty;
    }

    /// Enter `Submitting`. Returns `None`, and fires nothing, when there is
    /// no image or a request is already in flight.
    pub fn begin_submit(&mut self) -> Option<SubmitTicket> {
        let image = match std::mem::replace(&mut self.state, UploadState::Empty) {
            UploadState::Selected { image }
            | UploadState::Succeeded { image, .. }
            | UploadState::Failed { image, .. } => image,
            other => {
                self.state = other;
                return None;
            }
        };

        let ticket = SubmitTicket {
            generation: self.generation,
            image: image.clone(),
        };
        self.state = UploadState::Submitting { image };
        Some(ticket)
    }

    /// Apply the outcome of the request behind `ticket`. Returns `false` when
    /// the response is stale (the selection changed meanwhile) and was
    /// dropped.
    pub fn finish_submit(&mut self, ticket: SubmitTicket, outcome: Result<OcrResult>) -> bool {
        if ticket.generation != self.generation || !self.is_submitting() {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "Dropping stale response"
            );
            return false;
        }

        let image = ticket.image;
        self.state = match outcome {
            Ok(result) => UploadState::Succeeded { image, result },
            Err(e) => UploadState::Failed {
                image,
                message: user_message(&e),
            },
        };
        true
    }

    /// `begin_submit`, one backend call, `finish_submit`. Returns whether a
    /// request was made.
    pub async fn submit(&mut self, backend: &dyn RecognitionBackend) -> bool {
        let Some(ticket) = self.begin_submit() else {
            return false;
        };
        let outcome = backend.recognize(ticket.image()).await;
        self.finish_submit(ticket, outcome);
        true
    }
}

fn user_message(err: &PalimpsestError) -> String {
    match err {
        PalimpsestError::Http(_) => {
            "Could not reach the server. Check your connection and try again.".to_string()
        }
        PalimpsestError::ServerRejected {
            error,
            details: Some(details),
            ..
        } => format!("{error}: {details}"),
        PalimpsestError::ServerRejected { error, .. } => error.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn plate(name: &str) -> UploadedImage {
        UploadedImage::new(vec![1, 2, 3], name, "image/jpeg")
    }

    fn result(text: &str) -> OcrResult {
        OcrResult {
            recognized_text: text.to_string(),
            reference_text: None,
            translated_text: format!("[Translation of: {text}]"),
        }
    }

    struct CountingBackend {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl RecognitionBackend for CountingBackend {
        async fn recognize(&self, image: &UploadedImage) -> Result<OcrResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(PalimpsestError::ServerRejected {
                    status: 500,
                    error: "Failed to process image".to_string(),
                    details: Some("bad header".to_string()),
                })
            } else {
                Ok(result(&image.filename))
            }
        }
    }

    fn backend(fail: bool) -> CountingBackend {
        CountingBackend {
            calls: AtomicUsize::new(0),
            fail,
        }
    }

    #[test]
    fn test_select_moves_empty_to_selected() {
        let mut controller = UploadController::new();
        controller.select(plate("plate1.jpg")).unwrap();

        assert_eq!(
            controller.state(),
            &UploadState::Selected {
                image: plate("plate1.jpg")
            }
        );
    }

    #[test]
    fn test_select_rejects_non_image() {
        let mut controller = UploadController::new();
        let err = controller
            .select(UploadedImage::new(vec![0; 10], "plate1.jpg", "text/plain"))
            .unwrap_err();

        assert!(matches!(err, PalimpsestError::UnsupportedMediaType(_)));
        assert_eq!(controller.state(), &UploadState::Empty);
    }

    #[test]
    fn test_select_in_succeeded_clears_result() {
        let mut controller = UploadController::new();
        controller.select(plate("plate1.jpg")).unwrap();
        let ticket = controller.begin_submit().unwrap();
        assert!(controller.finish_submit(ticket, Ok(result("ΑΒΓ"))));
        assert!(controller.result().is_some());

        controller.select(plate("plate2.jpg")).unwrap();

        assert!(controller.result().is_none());
        assert_eq!(
            controller.state(),
            &UploadState::Selected {
                image: plate("plate2.jpg")
            }
        );
    }

    #[test]
    fn test_submit_while_submitting_is_noop() {
        let mut controller = UploadController::new();
        controller.select(plate("plate1.jpg")).unwrap();

        let first = controller.begin_submit();
        assert!(first.is_some());
        assert!(controller.is_submitting());
        assert!(!controller.can_submit());

        assert!(controller.begin_submit().is_none());
        assert!(controller.is_submitting());
    }

    #[test]
    fn test_submit_from_empty_is_noop() {
        let mut controller = UploadController::new();
        assert!(controller.begin_submit().is_none());
        assert_eq!(controller.state(), &UploadState::Empty);
    }

    #[test]
    fn test_failure_keeps_image() {
        let mut controller = UploadController::new();
        controller.select(plate("plate1.jpg")).unwrap();
        let ticket = controller.begin_submit().unwrap();

        controller.finish_submit(
            ticket,
            Err(PalimpsestError::ServerRejected {
                status: 500,
                error: "Failed to process image".to_string(),
                details: None,
            }),
        );

        assert_eq!(controller.image(), Some(&plate("plate1.jpg")));
        assert_eq!(controller.error_message(), Some("Failed to process image"));
        assert!(controller.can_submit());
    }

    #[test]
    fn test_stale_response_after_new_selection_is_dropped() {
        let mut controller = UploadController::new();
        controller.select(plate("plate1.jpg")).unwrap();
        let ticket = controller.begin_submit().unwrap();

        controller.select(plate("plate2.jpg")).unwrap();

        assert!(!controller.finish_submit(ticket, Ok(result("old"))));
        assert_eq!(
            controller.state(),
            &UploadState::Selected {
                image: plate("plate2.jpg")
            }
        );
    }

    #[test]
    fn test_stale_response_after_clear_is_dropped() {
        let mut controller = UploadController::new();
        controller.select(plate("plate1.jpg")).unwrap();
        let ticket = controller.begin_submit().unwrap();

        controller.clear();

        assert!(!controller.finish_submit(ticket, Ok(result("old"))));
        assert_eq!(controller.state(), &UploadState::Empty);
    }

    #[test]
    fn test_resubmit_after_success_uses_same_image() {
        let mut controller = UploadController::new();
        controller.select(plate("plate1.jpg")).unwrap();
        let ticket = controller.begin_submit().unwrap();
        controller.finish_submit(ticket, Ok(result("first")));

        let again = controller.begin_submit().unwrap();
        assert_eq!(again.image(), &plate("plate1.jpg"));
        assert!(controller.result().is_none());
    }

    #[tokio::test]
    async fn test_submit_success_with_backend() {
        let backend = backend(false);
        let mut controller = UploadController::new();
        controller.select(plate("plate1.jpg")).unwrap();

        assert!(controller.submit(&backend).await);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert_eq!(controller.result(), Some(&result("plate1.jpg")));
    }

    #[tokio::test]
    async fn test_submit_failure_with_backend() {
        let backend = backend(true);
        let mut controller = UploadController::new();
        controller.select(plate("plate1.jpg")).unwrap();

        assert!(controller.submit(&backend).await);
        assert_eq!(
            controller.error_message(),
            Some("Failed to process image: bad header")
        );
    }

    #[tokio::test]
    async fn test_submit_without_image_makes_no_request() {
        let backend = backend(false);
        let mut controller = UploadController::new();

        assert!(!controller.submit(&backend).await);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }
}
