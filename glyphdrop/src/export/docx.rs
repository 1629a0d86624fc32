use std::io::Cursor;

use docx_rs::{BreakType, Docx, Paragraph, Run};

use super::DocumentExporter;
use crate::error::{GlyphError, Result};

/// Word document holding the whole text in a single paragraph.
///
/// Newlines become line breaks and tabs become tab stops inside that one run,
/// so the paragraph count never depends on the input.
pub struct DocxExporter;

fn build_run(text: &str) -> Run {
    let mut run = Run::new();

    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        let line = line.strip_suffix('\r').unwrap_or(line);
        for (j, segment) in line.split('\t').enumerate() {
            if j > 0 {
                run = run.add_tab();
            }
            if !segment.is_empty() {
                run = run.add_text(segment);
            }
        }
    }

    run
}

impl DocumentExporter for DocxExporter {
    fn render(&self, text: &str) -> Result<Vec<u8>> {
        let docx = Docx::new().add_paragraph(Paragraph::new().add_run(build_run(text)));

        let mut buffer = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut buffer)
            .map_err(|e| GlyphError::Export(format!("Failed to pack DOCX: {e}")))?;

        Ok(buffer.into_inner())
    }
}
