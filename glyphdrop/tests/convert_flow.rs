use axum::http::{header, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{body_bytes, body_json, body_string, get, post_form, FakeRecognizer, TestApp};

fn app() -> TestApp {
    TestApp::new(FakeRecognizer::text("unused"))
}

#[tokio::test]
async fn test_convert_txt_downloads_exact_text() {
    let app = app();

    let response = app
        .send(get("/convert/receipt.PNG/txt?text=Hello%20World"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"receipt.txt\""
    );
    assert_eq!(body_string(response).await, "Hello World");

    let written = std::fs::read_to_string(app.dir.path().join("receipt.txt")).unwrap();
    assert_eq!(written, "Hello World");
}

#[tokio::test]
async fn test_convert_txt_keeps_unicode_and_newlines() {
    let app = app();

    let response = app
        .send(get("/convert/card.jpg/txt?text=Gr%C3%BC%C3%9Fe%0Azweite+Zeile"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "Grüße\nzweite Zeile");
}

#[tokio::test]
async fn test_convert_docx() {
    let app = app();

    let response = app
        .send(get("/convert/receipt.png/docx?text=TOTAL%2012.99"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"receipt.docx\""
    );

    let bytes = body_bytes(response).await;
    assert!(bytes.starts_with(b"PK"), "DOCX should be a zip container");
    assert!(docx_rs::read_docx(&bytes).is_ok());
    assert_eq!(app.stored_files(), vec!["receipt.docx"]);
}

#[tokio::test]
async fn test_convert_pdf() {
    let app = app();

    let response = app
        .send(get("/convert/receipt.png/pdf?text=TOTAL%2012.99"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");

    let bytes = body_bytes(response).await;
    assert!(bytes.starts_with(b"%PDF"));
    let doc = lopdf::Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}

#[tokio::test]
async fn test_convert_unsupported_format() {
    let app = app();

    let response = app.send(get("/convert/receipt.png/bmp?text=hi")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"error": "Unsupported format"}));
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_convert_format_is_case_sensitive() {
    let app = app();

    let response = app.send(get("/convert/receipt.png/PDF?text=hi")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"error": "Unsupported format"}));
}

#[tokio::test]
async fn test_convert_requires_text() {
    let app = app();

    for uri in [
        "/convert/receipt.png/txt",
        "/convert/receipt.png/txt?text=",
        "/convert/receipt.png/bmp",
    ] {
        let response = app.send(get(uri)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_json(response).await, json!({"error": "No text provided"}));
    }
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_convert_sanitizes_path_filename() {
    let app = app();

    let response = app
        .send(get("/convert/..%2F..%2Fsecret.png/txt?text=hidden"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"secret.txt\""
    );
    assert_eq!(app.stored_files(), vec!["secret.txt"]);
}

#[tokio::test]
async fn test_convert_rejects_filename_that_sanitizes_to_nothing() {
    let app = app();

    let response = app.send(get("/convert/%E4%B8%AD/txt?text=hi")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"error": "Invalid file name"}));
}

#[tokio::test]
async fn test_convert_overwrites_previous_output() {
    let app = app();

    app.send(get("/convert/receipt.png/txt?text=first")).await;
    let response = app.send(get("/convert/receipt.png/txt?text=second")).await;
    assert_eq!(body_string(response).await, "second");
    assert_eq!(
        std::fs::read_to_string(app.dir.path().join("receipt.txt")).unwrap(),
        "second"
    );
}

#[tokio::test]
async fn test_convert_form_post() {
    let app = app();

    let response = app
        .send(post_form(
            "/convert/receipt.png/txt",
            "text=Line+one%0ALine+two",
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "Line one\nLine two");
}

#[tokio::test]
async fn test_convert_form_post_without_text() {
    let app = app();

    let response = app.send(post_form("/convert/receipt.png/pdf", "")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"error": "No text provided"}));
}

#[tokio::test]
async fn test_convert_cleanup_removes_output() {
    let app = TestApp::with_config(FakeRecognizer::text("unused"), |config| {
        config.storage.cleanup_outputs = true;
    });

    let response = app.send(get("/convert/receipt.png/txt?text=bye")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "bye");
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_convert_form_post_with_wrong_content_type() {
    let app = app();

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/convert/receipt.png/txt")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(axum::body::Body::from("text=hello"))
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let body = body_json(response).await;
    assert_ne!(body["error"], "No text provided");
    assert!(app.stored_files().is_empty());
}

/// Fire `requests` same-name conversions at once, each with its own text.
async fn convert_concurrently(
    app: &TestApp,
    requests: u32,
) -> Vec<(String, StatusCode, String)> {
    let handles: Vec<_> = (0..requests)
        .map(|i| {
            let router = app.router.clone();
            tokio::spawn(async move {
                let expected = format!("user{i}");
                let uri = format!("/convert/receipt.png/txt?text={expected}");
                let response = router.oneshot(get(&uri)).await.unwrap();
                let status = response.status();
                (expected, status, body_string(response).await)
            })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }
    results
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_conversions_with_same_name_get_their_own_text() {
    let app = app();

    for (expected, status, body) in convert_concurrently(&app, 100).await {
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, expected);
    }
    assert_eq!(app.stored_files(), vec!["receipt.txt"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_conversions_with_cleanup() {
    let app = TestApp::with_config(FakeRecognizer::text("unused"), |config| {
        config.storage.cleanup_outputs = true;
    });

    for (expected, status, body) in convert_concurrently(&app, 100).await {
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, expected);
    }
}
