use std::sync::Arc;

use crate::config::OcrConfig;
use crate::error::{GlyphError, Result};

use super::preprocessing::preprocess_image;
use super::provider::TextRecognizer;

/// Runs uploaded image bytes through a [`TextRecognizer`].
///
/// The adapter only ever sees the bytes of the request it serves, never a
/// file in the shared store, so concurrent uploads under one name cannot
/// read each other's images.
#[derive(Clone)]
pub struct RecognitionAdapter {
    recognizer: Arc<dyn TextRecognizer>,
    config: OcrConfig,
}

impl RecognitionAdapter {
    pub fn new(recognizer: Arc<dyn TextRecognizer>, config: OcrConfig) -> Self {
        Self { recognizer, config }
    }

    pub fn recognizer(&self) -> &Arc<dyn TextRecognizer> {
        &self.recognizer
    }

    /// Decode, normalise and recognise `bytes`.
    ///
    /// The returned text is trimmed and may be empty.
    pub async fn scan(&self, bytes: Vec<u8>) -> Result<String> {
        let config = self.config.clone();

        let processed = tokio::task::spawn_blocking(move || preprocess_image(&bytes, &config))
            .await
            .map_err(|e| GlyphError::Internal(format!("Image task panicked: {e}")))??;

        let text = self.recognizer.recognize(&processed).await?;
        Ok(text.trim().to_string())
    }

    /// Like [`scan`](Self::scan), but any failure comes back as its message in
    /// place of the text. Callers cannot tell an engine error from text that
    /// happens to read like one; an empty string means nothing was recognised.
    pub async fn scan_to_text(&self, bytes: Vec<u8>) -> String {
        match self.scan(bytes).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "Recognition failed");
                e.to_string()
            }
        }
    }
}
