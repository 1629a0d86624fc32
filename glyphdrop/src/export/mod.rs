//! Document exporters.
//!
//! Each exporter turns extracted text into the bytes of one container format.
//! [`export`] renders off the async runtime and writes `<base>.<ext>` into the
//! transient store.

mod docx;
mod pdf;
mod txt;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{GlyphError, Result};
use crate::store::TransientStore;

pub use self::docx::DocxExporter;
pub use self::pdf::PdfExporter;
pub use self::txt::TxtExporter;

pub trait DocumentExporter: Send + Sync {
    fn render(&self, text: &str) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Txt,
    Docx,
    Pdf,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Txt, ExportFormat::Docx, ExportFormat::Pdf];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Docx => "docx",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Txt => "text/plain; charset=utf-8",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Pdf => "application/pdf",
        }
    }

    pub fn exporter(self) -> &'static dyn DocumentExporter {
        match self {
            ExportFormat::Txt => &TxtExporter,
            ExportFormat::Docx => &DocxExporter,
            ExportFormat::Pdf => &PdfExporter,
        }
    }

    /// Output filename for a given base name.
    pub fn file_name(self, base: &str) -> String {
        format!("{base}.{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = GlyphError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "txt" => Ok(ExportFormat::Txt),
            "docx" => Ok(ExportFormat::Docx),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(GlyphError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A rendered document and where its copy was written.
#[derive(Debug)]
pub struct ExportedDocument {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// Render `text` as `format` and write a copy to the store as `<base>.<ext>`.
///
/// Callers serve `bytes`, not the stored file: another request with the same
/// base name may replace or remove that file at any time.
pub async fn export(
    store: &TransientStore,
    format: ExportFormat,
    text: &str,
    base: &str,
) -> Result<ExportedDocument> {
    let file_name = format.file_name(base);
    let owned = text.to_string();

    let bytes = tokio::task::spawn_blocking(move || format.exporter().render(&owned))
        .await
        .map_err(|e| GlyphError::Internal(format!("Export task panicked: {e}")))??;

    let path = store.write(&file_name, &bytes).await?;
    tracing::info!(format = %format, path = %path.display(), bytes = bytes.len(), "Exported document");
    Ok(ExportedDocument { path, bytes })
}
