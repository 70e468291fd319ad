/// Outcome of one recognition request. Built per request, never retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrResult {
    pub recognized_text: String,
    /// Matching reference transcription, if one exists.
    pub reference_text: Option<String>,
    pub translated_text: String,
}
