//! Glyphdrop: upload a scanned image, read back the recognized text and
//! download it as plain text, DOCX or PDF.

pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod ocr;
pub mod store;
pub mod upload;
