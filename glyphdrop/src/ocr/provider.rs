use std::sync::Arc;

use async_trait::async_trait;
use leptess::LepTess;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::OcrConfig;
use crate::error::{GlyphError, Result};

/// Tesseract language model used for every recognition.
const OCR_LANGUAGE: &str = "eng";

/// Narrow seam around the recognition engine: image bytes in, text out.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    fn is_available(&self) -> bool {
        true
    }

    /// Why the engine cannot be used, if it cannot.
    fn unavailable_reason(&self) -> Option<String> {
        None
    }

    async fn recognize(&self, image_bytes: &[u8]) -> Result<String>;
}

enum OcrBackend {
    Local { tesseract: Arc<Mutex<LepTess>> },
    Unavailable { reason: String },
}

/// Tesseract-backed recognizer.
///
/// Initialisation never fails: a missing engine or language pack degrades the
/// provider to an unavailable backend that reports why on every call.
#[derive(Clone)]
pub struct OcrProvider {
    backend: Arc<OcrBackend>,
}

fn create_tesseract(config: &OcrConfig) -> std::result::Result<LepTess, String> {
    LepTess::new(config.tessdata_dir.as_deref(), OCR_LANGUAGE).map_err(|e| e.to_string())
}

impl OcrProvider {
    pub fn new(config: &OcrConfig) -> Self {
        let backend = match create_tesseract(config) {
            Ok(lt) => {
                info!(language = OCR_LANGUAGE, "Tesseract OCR initialized");
                OcrBackend::Local {
                    tesseract: Arc::new(Mutex::new(lt)),
                }
            }
            Err(e) => {
                let reason = format!("Tesseract not available: {e}");
                warn!("{}", reason);
                OcrBackend::Unavailable { reason }
            }
        };

        Self {
            backend: Arc::new(backend),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            backend: Arc::new(OcrBackend::Unavailable {
                reason: reason.into(),
            }),
        }
    }
}

#[async_trait]
impl TextRecognizer for OcrProvider {
    fn is_available(&self) -> bool {
        !matches!(*self.backend, OcrBackend::Unavailable { .. })
    }

    fn unavailable_reason(&self) -> Option<String> {
        match &*self.backend {
            OcrBackend::Unavailable { reason } => Some(reason.clone()),
            OcrBackend::Local { .. } => None,
        }
    }

    async fn recognize(&self, image_bytes: &[u8]) -> Result<String> {
        match &*self.backend {
            OcrBackend::Local { tesseract } => {
                let bytes = image_bytes.to_vec();
                let tesseract = Arc::clone(tesseract);

                let text = tokio::task::spawn_blocking(move || {
                    let mut lt = tesseract.blocking_lock();
                    lt.set_image_from_mem(&bytes)
                        .map_err(|e| GlyphError::Ocr(format!("Failed to set image: {e}")))?;
                    lt.get_utf8_text()
                        .map_err(|e| GlyphError::Ocr(format!("Failed to extract text: {e}")))
                })
                .await
                .map_err(|e| GlyphError::Ocr(format!("OCR task panicked: {e}")))??;

                Ok(text.trim().to_string())
            }
            OcrBackend::Unavailable { reason } => Err(GlyphError::OcrUnavailable(reason.clone())),
        }
    }
}
