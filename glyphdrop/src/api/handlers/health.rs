use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub ocr: OcrStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct OcrStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// `GET /health`
pub async fn health_check(State(state): State<AppState>) -> Json<HealthData> {
    let recognizer = state.scanner.recognizer();

    let ocr = if recognizer.is_available() {
        OcrStatus {
            status: "available".to_string(),
            reason: None,
        }
    } else {
        OcrStatus {
            status: "unavailable".to_string(),
            reason: recognizer.unavailable_reason(),
        }
    };

    Json(HealthData {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ocr,
    })
}
