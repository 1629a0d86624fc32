//! Admission checks for uploaded files.
//!
//! The extension check is purely syntactic: file contents are never sniffed
//! here, the recognition step is what finds out whether the bytes decode.

use regex::Regex;
use std::sync::OnceLock;

static UNSAFE_CHARS: OnceLock<Regex> = OnceLock::new();

fn unsafe_chars() -> &'static Regex {
    UNSAFE_CHARS.get_or_init(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("valid filename regex"))
}

/// Returns the extension after the final `.`, or `None` when there is no dot.
pub fn extension(filename: &str) -> Option<&str> {
    filename.rsplit_once('.').map(|(_, ext)| ext)
}

/// Whether `filename` carries one of the `allowed` extensions (case-insensitive).
pub fn allowed_file(filename: &str, allowed: &[String]) -> bool {
    match extension(filename) {
        Some(ext) => {
            let ext = ext.to_lowercase();
            allowed.iter().any(|a| a.eq_ignore_ascii_case(&ext))
        }
        None => false,
    }
}

/// Reduce a client-supplied filename to something safe to join onto the
/// scratch directory.
///
/// Path separators become whitespace, whitespace runs collapse to `_`, anything
/// outside `[A-Za-z0-9_.-]` (non-ASCII included) is dropped and leading or
/// trailing `.`/`_` are stripped. The result may be empty.
pub fn secure_filename(filename: &str) -> String {
    let ascii: String = filename
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    let stripped = unsafe_chars().replace_all(&joined, "");

    stripped.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Filename without its final extension.
///
/// Leading dots do not start an extension, so `.env` stays `.env`.
pub fn file_stem(filename: &str) -> &str {
    let body_start = filename.len() - filename.trim_start_matches('.').len();
    match filename[body_start..].rfind('.') {
        Some(idx) => &filename[..body_start + idx],
        None => filename,
    }
}
