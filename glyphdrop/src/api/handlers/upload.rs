//! Upload form and OCR.
//!
//! Every outcome of `POST /` is an HTML page: validation problems and
//! recognition failures are shown inline on the form rather than as HTTP
//! errors. Store I/O failures escape as JSON 500s and bodies over the size
//! limit as 413s.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::Html;

use crate::api::frontend::IndexPage;
use crate::api::AppState;
use crate::error::{GlyphError, Result};
use crate::upload::{allowed_file, secure_filename};

pub const NO_FILE_PART: &str = "No file part";
pub const NO_SELECTED_FILE: &str = "No selected file";
pub const INVALID_FILE_NAME: &str = "Invalid file name";
pub const EXTRACTION_FAILED: &str = "Failed to extract text";

struct UploadedImage {
    file_name: String,
    bytes: Vec<u8>,
}

/// `GET /`
pub async fn index(State(state): State<AppState>) -> Result<Html<String>> {
    IndexPage::new(&state.config.storage).render()
}

/// `POST /`
pub async fn upload(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Html<String>> {
    let page = IndexPage::new(&state.config.storage);

    let multipart = match multipart {
        Ok(m) => m,
        Err(rejection) => {
            tracing::debug!(%rejection, "Upload without a multipart body");
            return page.with_error(NO_FILE_PART).render();
        }
    };

    let upload = match read_file_field(multipart).await {
        Ok(Some(upload)) => upload,
        Ok(None) => return page.with_error(NO_FILE_PART).render(),
        Err(FieldError::TooLarge(e)) => return Err(GlyphError::from(e)),
        Err(FieldError::Unreadable(message)) => return page.with_error(message).render(),
    };

    let original_name = upload.file_name.as_str();
    if original_name.is_empty() {
        return page.with_error(NO_SELECTED_FILE).render();
    }

    let allowed = &state.config.storage.allowed_extensions;
    if !allowed_file(original_name, allowed) {
        tracing::info!(file_name = %original_name, "Rejected upload with unsupported extension");
        let message = format!("Unsupported file type. Allowed: {}", allowed.join(", "));
        return page.with_error(message).render();
    }

    let file_name = secure_filename(original_name);
    if file_name.is_empty() {
        return page.with_error(INVALID_FILE_NAME).render();
    }

    // The stored copy can be replaced by a concurrent upload of the same
    // name, so recognition runs on this request's bytes.
    state.store.write(&file_name, &upload.bytes).await?;
    tracing::info!(file_name = %file_name, bytes = upload.bytes.len(), "Stored upload");

    let text = state.scanner.scan_to_text(upload.bytes).await;
    if text.is_empty() {
        tracing::info!(file_name = %file_name, "No text recognized");
        return page.with_error(EXTRACTION_FAILED).render();
    }

    page.with_result(text, file_name).render()
}

enum FieldError {
    /// The body ran past the configured upload limit.
    TooLarge(MultipartError),
    Unreadable(String),
}

fn is_too_large(e: &MultipartError) -> bool {
    e.status() == StatusCode::PAYLOAD_TOO_LARGE
}

/// Pull the `file` part out of the form, skipping any other fields.
///
/// A `file` part without a `filename` attribute is a plain form value, not an
/// upload, and is skipped as well.
async fn read_file_field(
    mut multipart: Multipart,
) -> std::result::Result<Option<UploadedImage>, FieldError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(None),
            Err(e) if is_too_large(&e) => return Err(FieldError::TooLarge(e)),
            Err(e) => {
                tracing::debug!(error = %e, "Malformed multipart body");
                return Ok(None);
            }
        };

        if field.name() != Some("file") {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        let bytes = field.bytes().await.map_err(|e| {
            if is_too_large(&e) {
                FieldError::TooLarge(e)
            } else {
                FieldError::Unreadable(format!("Failed to read file: {e}"))
            }
        })?;

        return Ok(Some(UploadedImage {
            file_name,
            bytes: bytes.to_vec(),
        }));
    }
}
