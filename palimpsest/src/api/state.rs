use std::sync::Arc;

use crate::config::Config;
use crate::ocr::OcrProvider;
use crate::pipeline::OcrPipeline;
use crate::reference::ReferenceLibrary;
use crate::translation::Translator;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Shared with the pipeline; kept here for readiness checks.
    pub ocr: OcrProvider,
    pub pipeline: OcrPipeline,
}

impl AppState {
    pub fn new(config: Config, ocr: OcrProvider, translator: Arc<dyn Translator>) -> Self {
        let config = Arc::new(config);
        let references = ReferenceLibrary::new(&config.reference.dir);
        let pipeline = OcrPipeline::new(
            ocr.clone(),
            references,
            translator,
            config.translation.source_language.clone(),
        );

        Self {
            config,
            ocr,
            pipeline,
        }
    }
}
