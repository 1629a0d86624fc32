// Shared helpers for the HTTP-level tests
#![allow(dead_code)]

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use tempfile::TempDir;
use tower::ServiceExt;

use glyphdrop::api::{create_router, AppState};
use glyphdrop::config::Config;
use glyphdrop::error::{GlyphError, Result};
use glyphdrop::ocr::TextRecognizer;

pub use serial_test::serial;

static INIT: Once = Once::new();

pub const BOUNDARY: &str = "glyphdrop-test-boundary";

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Recognizer that returns canned text and counts how often it ran.
pub struct FakeRecognizer {
    reply: std::result::Result<String, String>,
    pub calls: AtomicUsize,
}

impl FakeRecognizer {
    pub fn text(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextRecognizer for FakeRecognizer {
    async fn recognize(&self, _image_bytes: &[u8]) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(GlyphError::Ocr(message.clone())),
        }
    }
}

/// Recognizer that "reads" the pixel width of the image it was given, so a
/// response can be traced back to the upload that produced it.
pub struct WidthRecognizer;

#[async_trait]
impl TextRecognizer for WidthRecognizer {
    async fn recognize(&self, image_bytes: &[u8]) -> Result<String> {
        // Hand the runtime back so concurrent requests interleave.
        tokio::task::yield_now().await;
        let img = image::load_from_memory(image_bytes)?;
        Ok(format!("width {}", img.width()))
    }
}

/// A running router over a throwaway upload directory.
pub struct TestApp {
    pub router: Router,
    pub dir: TempDir,
}

impl TestApp {
    pub fn new(recognizer: Arc<dyn TextRecognizer>) -> Self {
        Self::with_config(recognizer, |_| {})
    }

    pub fn with_config(recognizer: Arc<dyn TextRecognizer>, tweak: impl FnOnce(&mut Config)) -> Self {
        init_test_logger();

        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut config = Config::with_upload_dir(dir.path());
        tweak(&mut config);

        let router = create_router(AppState::new(config, recognizer));
        Self { router, dir }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible")
    }

    /// Names of every file currently in the upload directory, sorted.
    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.dir.path())
            .expect("Failed to list upload dir")
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body")
        .to_vec()
}

pub async fn body_string(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).expect("Body is not UTF-8")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("Body is not JSON")
}

/// A small decodable PNG.
pub fn sample_png() -> Vec<u8> {
    png_with_width(32)
}

pub fn png_with_width(width: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, 16, Rgb([255, 255, 255]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("Failed to encode PNG");
    bytes
}

/// One part of a multipart body.
pub struct Part<'a> {
    pub name: &'a str,
    pub file_name: Option<&'a str>,
    pub bytes: &'a [u8],
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let disposition = match part.file_name {
            Some(file_name) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                part.name, file_name
            ),
            None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name),
        };
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(part.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn upload_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

pub fn upload_file(file_name: &str, bytes: &[u8]) -> Request<Body> {
    upload_request(&[Part {
        name: "file",
        file_name: Some(file_name),
        bytes,
    }])
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}
