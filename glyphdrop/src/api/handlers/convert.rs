use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Form;
use axum_extra::extract::Query;
use serde::Deserialize;

use crate::api::AppState;
use crate::error::{GlyphError, Result};
use crate::export::{export, ExportFormat};
use crate::upload::{file_stem, secure_filename};

#[derive(Debug, Default, Deserialize)]
pub struct ConvertParams {
    pub text: Option<String>,
}

/// `GET /convert/{filename}/{format_type}?text=...`
pub async fn convert(
    State(state): State<AppState>,
    Path((filename, format_type)): Path<(String, String)>,
    Query(params): Query<ConvertParams>,
) -> Result<Response> {
    convert_text(&state, &filename, &format_type, params.text).await
}

/// `POST /convert/{filename}/{format_type}` with an urlencoded `text` field.
///
/// A body the form extractor refuses keeps the extractor's status; only a
/// missing or empty `text` field is reported as "No text provided".
pub async fn convert_form(
    State(state): State<AppState>,
    Path((filename, format_type)): Path<(String, String)>,
    form: std::result::Result<Form<ConvertParams>, FormRejection>,
) -> Result<Response> {
    let Form(params) = form?;
    convert_text(&state, &filename, &format_type, params.text).await
}

async fn convert_text(
    state: &AppState,
    filename: &str,
    format_type: &str,
    text: Option<String>,
) -> Result<Response> {
    let text = match text {
        Some(t) if !t.is_empty() => t,
        _ => return Err(GlyphError::Validation("No text provided".to_string())),
    };

    let format: ExportFormat = format_type.parse()?;

    let safe_name = secure_filename(filename);
    if safe_name.is_empty() {
        return Err(GlyphError::Validation("Invalid file name".to_string()));
    }
    let base = file_stem(&safe_name);

    let exported = export(&state.store, format, &text, base).await?;

    if state.config.storage.cleanup_outputs {
        state.store.remove(&exported.path).await?;
    }

    Ok(attachment(format, &format.file_name(base), exported.bytes))
}

fn attachment(format: ExportFormat, download_name: &str, bytes: Vec<u8>) -> Response {
    let mut response = bytes.into_response();
    let headers = response.headers_mut();

    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(format.mime_type()),
    );
    // download_name is already reduced to [A-Za-z0-9_.-], so it is a valid header value.
    if let Ok(value) = HeaderValue::from_str(&format!("attachment; filename=\"{download_name}\"")) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    response
}
