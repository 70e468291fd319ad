use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info};

use crate::config::OcrConfig;
use crate::error::{PalimpsestError, Result};

use super::engine::RecognitionEngine;

type SharedEngine = Arc<Mutex<Box<dyn RecognitionEngine>>>;

/// Process-wide recognition service.
///
/// Owns the single engine handle. Every `recognize` call takes the handle's
/// lock for the full duration of the engine call, so calls are serialized in
/// arrival order and the engine never sees two images at once.
#[derive(Clone)]
pub struct OcrProvider {
    engine: Arc<OnceCell<SharedEngine>>,
    init_started: Arc<AtomicBool>,
    config: Arc<OcrConfig>,
}

impl OcrProvider {
    /// A provider with no engine yet. `recognize` fails with
    /// [`PalimpsestError::EngineNotReady`] until [`OcrProvider::initialize`]
    /// completes.
    pub fn new(config: OcrConfig) -> Self {
        Self {
            engine: Arc::new(OnceCell::new()),
            init_started: Arc::new(AtomicBool::new(false)),
            config: Arc::new(config),
        }
    }

    /// A ready provider around an already-built engine.
    pub fn with_engine<E: RecognitionEngine>(config: OcrConfig, engine: E) -> Self {
        let provider = Self::new(config);
        provider.init_started.store(true, Ordering::SeqCst);
        let shared: SharedEngine = Arc::new(Mutex::new(Box::new(engine)));
        // Freshly created cell, cannot already be set.
        let _ = provider.engine.set(shared);
        provider
    }

    /// Build the engine on a blocking worker. Runs at most once per provider;
    /// later calls fail without invoking `factory`.
    pub async fn initialize<E, F>(&self, factory: F) -> Result<()>
    where
        E: RecognitionEngine,
        F: FnOnce(&OcrConfig) -> Result<E> + Send + 'static,
    {
        if self.init_started.swap(true, Ordering::SeqCst) {
            return Err(PalimpsestError::EngineInit("engine already initialized".to_string()));
        }

        let config = Arc::clone(&self.config);
        let engine = tokio::task::spawn_blocking(move || factory(&config))
            .await
            .map_err(|e| PalimpsestError::EngineInit(format!("initialization panicked: {e}")))??;

        let shared: SharedEngine = Arc::new(Mutex::new(Box::new(engine)));
        self.engine
            .set(shared)
            .map_err(|_| PalimpsestError::EngineInit("engine already initialized".to_string()))?;

        info!(languages = %self.config.languages, "Recognition engine ready");
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.engine.initialized()
    }

    /// Recognize text in `image_bytes`, bounded by `timeout_secs`.
    ///
    /// The timeout covers queueing behind other calls as well as the engine
    /// call itself. A call that times out inside the engine cannot be
    /// aborted; it keeps the lock until the engine returns.
    pub async fn recognize(&self, image_bytes: &[u8]) -> Result<String> {
        let engine = self
            .engine
            .get()
            .cloned()
            .ok_or(PalimpsestError::EngineNotReady)?;

        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        let result = tokio::time::timeout(
            timeout_duration,
            Self::recognize_serialized(engine, image_bytes.to_vec()),
        )
        .await;

        match result {
            Ok(inner_result) => inner_result,
            Err(_) => Err(PalimpsestError::RecognitionTimeout(self.config.timeout_secs)),
        }
    }

    async fn recognize_serialized(engine: SharedEngine, bytes: Vec<u8>) -> Result<String> {
        let mut guard = engine.lock_owned().await;
        debug!(bytes = bytes.len(), "Engine acquired");

        let text = tokio::task::spawn_blocking(move || guard.recognize(&bytes))
            .await
            .map_err(|e| PalimpsestError::Recognition(format!("OCR task panicked: {e}")))??;

        Ok(text.trim().to_string())
    }
}
