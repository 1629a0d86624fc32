//! OCR (Optical Character Recognition) Module
//!
//! Turns an uploaded image into text.
//!
//! # Architecture
//!
//! - `TextRecognizer` trait is the seam around the engine (bytes in, text out)
//! - `OcrProvider` implements it with local Tesseract via leptess
//! - `RecognitionAdapter` normalises uploaded image bytes (decode, downscale,
//!   grayscale) and folds failures into the returned text
//!
//! # Usage
//!
//! ```rust,ignore
//! let provider: Arc<dyn TextRecognizer> = Arc::new(OcrProvider::new(&config.ocr));
//! let adapter = RecognitionAdapter::new(provider, config.ocr.clone());
//! let text = adapter.scan_to_text(image_bytes).await;
//! ```

mod preprocessing;
mod provider;
mod scan;

pub use provider::{OcrProvider, TextRecognizer};
pub use scan::RecognitionAdapter;
