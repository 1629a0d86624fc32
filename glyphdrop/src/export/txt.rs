use super::DocumentExporter;
use crate::error::Result;

/// Writes the text verbatim as UTF-8.
pub struct TxtExporter;

impl DocumentExporter for TxtExporter {
    fn render(&self, text: &str) -> Result<Vec<u8>> {
        Ok(text.as_bytes().to_vec())
    }
}
