use axum::{
    extract::{multipart::MultipartError, rejection::FormRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GlyphError {
    #[error("{0}")]
    Validation(String),

    #[error("Unsupported format")]
    UnsupportedFormat(String),

    /// A request body an extractor refused, with the status it chose.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("OCR unavailable: {0}")]
    OcrUnavailable(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl GlyphError {
    pub fn status(&self) -> StatusCode {
        match self {
            GlyphError::Validation(_) | GlyphError::UnsupportedFormat(_) => {
                StatusCode::BAD_REQUEST
            }
            GlyphError::Rejected { status, .. } => *status,
            GlyphError::OcrUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            GlyphError::Ocr(_)
            | GlyphError::Image(_)
            | GlyphError::Export(_)
            | GlyphError::Template(_)
            | GlyphError::Io(_)
            | GlyphError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GlyphError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<FormRejection> for GlyphError {
    fn from(rejection: FormRejection) -> Self {
        GlyphError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<MultipartError> for GlyphError {
    fn from(err: MultipartError) -> Self {
        GlyphError::Rejected {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GlyphError>;
