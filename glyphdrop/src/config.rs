use serde::Deserialize;
use std::env;
use std::path::PathBuf;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

/// Parse `ALLOWED_EXTENSIONS`.
/// Format: comma-separated extensions without the dot, e.g. `png,jpg,jpeg`
fn parse_extensions() -> Vec<String> {
    match env::var("ALLOWED_EXTENSIONS") {
        Ok(val) if !val.trim().is_empty() => val
            .split(',')
            .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect(),
        _ => default_extensions(),
    }
}

fn default_extensions() -> Vec<String> {
    DEFAULT_ALLOWED_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Flat scratch directory for uploaded images and generated documents.
    pub upload_dir: PathBuf,
    /// Lowercase extensions accepted by the upload endpoint.
    pub allowed_extensions: Vec<String>,
    pub max_upload_bytes: usize,
    /// Delete generated documents once they have been read for download.
    pub cleanup_outputs: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    pub tessdata_dir: Option<String>,
    pub max_image_dimension: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("/tmp/uploads"),
            allowed_extensions: default_extensions(),
            max_upload_bytes: 16 * 1024 * 1024,
            cleanup_outputs: false,
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tessdata_dir: None,
            max_image_dimension: 4096,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let port = env::var("GLYPHDROP_PORT")
            .ok()
            .map(|_| parse_env_or("GLYPHDROP_PORT", 5000))
            .unwrap_or_else(|| parse_env_or("PORT", 5000));

        Self {
            server: ServerConfig {
                host: env::var("GLYPHDROP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port,
            },
            storage: StorageConfig {
                upload_dir: env::var("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("/tmp/uploads")),
                allowed_extensions: parse_extensions(),
                max_upload_bytes: parse_env_or("MAX_UPLOAD_SIZE", 16 * 1024 * 1024),
                cleanup_outputs: parse_env_or("CLEANUP_OUTPUTS", false),
            },
            ocr: OcrConfig {
                tessdata_dir: env::var("TESSDATA_DIR").ok().filter(|s| !s.is_empty()),
                max_image_dimension: parse_env_or("OCR_MAX_DIMENSION", 4096),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Configuration rooted at `upload_dir` with every other value at its default.
    pub fn with_upload_dir(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
            },
            storage: StorageConfig {
                upload_dir: upload_dir.into(),
                ..StorageConfig::default()
            },
            ocr: OcrConfig::default(),
        }
    }
}
