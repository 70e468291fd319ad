//! Client side of the service: upload state machine, HTTP client and result
//! rendering. The `read` subcommand of the binary drives these.

mod api;
mod clipboard;
mod controller;
mod presenter;

pub use api::{OcrClient, RecognitionBackend};
pub use clipboard::{Clipboard, SystemClipboard};
pub use controller::{SubmitTicket, UploadController, UploadState};
pub use presenter::{Notice, NoticeKind, ResultPresenter};
