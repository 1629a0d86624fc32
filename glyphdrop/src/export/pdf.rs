use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use super::DocumentExporter;
use crate::error::{GlyphError, Result};

// US Letter in points.
const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const MARGIN: i64 = 72;
const FONT_SIZE: i64 = 10;
const LEADING: i64 = 12;

const LINE_WIDTH: i64 = PAGE_WIDTH - 2 * MARGIN;
const LINES_PER_PAGE: usize = ((PAGE_HEIGHT - 2 * MARGIN) / LEADING) as usize;

/// Helvetica advance widths (1/1000 em) for WinAnsi 0x20..=0x7E.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];
const DEFAULT_WIDTH: u16 = 556;

/// Text flowed as a single paragraph over Letter pages.
///
/// Whitespace (newlines included) collapses to single spaces and lines are
/// filled greedily in Helvetica 10/12. Lines that do not fit on a page carry
/// over to the next one.
pub struct PdfExporter;

/// Map a char to its WinAnsiEncoding byte, `?` when it has none.
fn win_ansi_byte(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '\u{00A0}'..='\u{00FF}' => c as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        '„' => 0x84,
        '…' => 0x85,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '™' => 0x99,
        _ => b'?',
    }
}

fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn char_width(c: char) -> i64 {
    let width = match win_ansi_byte(c) {
        b @ 0x20..=0x7E => HELVETICA_WIDTHS[(b - 0x20) as usize],
        _ => DEFAULT_WIDTH,
    };
    i64::from(width)
}

/// Width in thousandths of a point at [`FONT_SIZE`].
fn text_width(text: &str) -> i64 {
    text.chars().map(char_width).sum::<i64>() * FONT_SIZE
}

/// Greedy word wrap. Words wider than a full line are split by characters.
fn wrap(text: &str) -> Vec<String> {
    let max = LINE_WIDTH * 1000;
    let space = text_width(" ");
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = text_width(word);

        if !current.is_empty() && current_width + space + word_width <= max {
            current.push(' ');
            current.push_str(word);
            current_width += space + word_width;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }

        if word_width <= max {
            current.push_str(word);
            current_width = word_width;
            continue;
        }

        for c in word.chars() {
            let w = char_width(c) * FONT_SIZE;
            if !current.is_empty() && current_width + w > max {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(c);
            current_width += w;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn page_content(lines: &[String]) -> Result<Vec<u8>> {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), Object::Integer(FONT_SIZE)]),
        Operation::new("TL", vec![Object::Integer(LEADING)]),
        Operation::new(
            "Td",
            vec![
                Object::Integer(MARGIN),
                Object::Integer(PAGE_HEIGHT - MARGIN - FONT_SIZE),
            ],
        ),
    ];

    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            operations.push(Operation::new("T*", vec![]));
        }
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode_win_ansi(line))],
        ));
    }
    operations.push(Operation::new("ET", vec![]));

    Content { operations }
        .encode()
        .map_err(|e| GlyphError::Export(format!("Failed to encode PDF content: {e}")))
}

impl DocumentExporter for PdfExporter {
    fn render(&self, text: &str) -> Result<Vec<u8>> {
        let lines = wrap(text);
        let chunks: Vec<&[String]> = if lines.is_empty() {
            vec![&lines[..]]
        } else {
            lines.chunks(LINES_PER_PAGE).collect()
        };

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            let content_id = doc.add_object(Stream::new(dictionary! {}, page_content(chunk)?));
            let page_id: ObjectId = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(page_count),
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(PAGE_WIDTH),
                Object::Integer(PAGE_HEIGHT),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| GlyphError::Export(format!("Failed to write PDF: {e}")))?;
        Ok(buffer)
    }
}
