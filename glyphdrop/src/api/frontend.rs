use std::sync::OnceLock;

use axum::body::Body;
use axum::extract::Path;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use minijinja::Environment;
use rust_embed::RustEmbed;
use serde::Serialize;

use crate::config::StorageConfig;
use crate::error::Result;
use crate::export::ExportFormat;

#[derive(RustEmbed)]
#[folder = "static"]
struct StaticAssets;

static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

fn templates() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(|| {
        let mut env = Environment::new();
        env.add_template("index.html", include_str!("../../templates/index.html"))
            .expect("Failed to add index template");
        env
    })
}

/// Context for the upload form, with or without a result.
#[derive(Debug, Clone, Serialize)]
pub struct IndexPage {
    pub allowed: String,
    pub allowed_extensions: Vec<String>,
    pub formats: Vec<&'static str>,
    pub error: Option<String>,
    pub text: Option<String>,
    pub filename: Option<String>,
}

impl IndexPage {
    pub fn new(storage: &StorageConfig) -> Self {
        Self {
            allowed: storage.allowed_extensions.join(", "),
            allowed_extensions: storage.allowed_extensions.clone(),
            formats: ExportFormat::ALL.iter().map(|f| f.extension()).collect(),
            error: None,
            text: None,
            filename: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_result(mut self, text: String, filename: String) -> Self {
        self.text = Some(text);
        self.filename = Some(filename);
        self
    }

    pub fn render(&self) -> Result<Html<String>> {
        let template = templates().get_template("index.html")?;
        Ok(Html(template.render(self)?))
    }
}

pub async fn serve_static(Path(path): Path<String>) -> Response {
    let requested = path.trim_start_matches('/');

    if requested.contains("..") {
        return StatusCode::BAD_REQUEST.into_response();
    }

    response_for_file(requested).unwrap_or_else(|| StatusCode::NOT_FOUND.into_response())
}

fn response_for_file(path: &str) -> Option<Response> {
    let file = StaticAssets::get(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    let mut response = Response::new(Body::from(file.data.into_owned()));
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(mime.as_ref()).ok()?,
    );
    Some(response)
}
