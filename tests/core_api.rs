mod common;

use axum::http::StatusCode;

use crate::common::TestApp;

#[tokio::test]
async fn health_returns_ok() {
    let app = TestApp::new().await;

    let (status, body) = app.get_text("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn docs_and_openapi_are_available() {
    let app = TestApp::new().await;

    let (status, html) = app.get_text("/docs", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("SwaggerUIBundle"));
    assert!(html.contains("<title>NoteHub</title>"));
    assert!(html.contains(r#"url: "/api-docs/openapi.json""#));

    let (status, openapi_json) = app.get_json("/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        openapi_json
            .get("openapi")
            .and_then(serde_json::Value::as_str),
        Some("3.1.0")
    );
    assert!(openapi_json["paths"].get("/api/notes").is_some());
    assert!(openapi_json["paths"].get("/api/draft").is_some());
}

#[tokio::test]
async fn unknown_paths_render_the_not_found_page() {
    let app = TestApp::new().await;

    let (status, html) = app.get_text("/definitely/not/here", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("<title>NoteHub - Not found</title>"));
}

#[tokio::test]
async fn notes_root_redirects_to_all_notes() {
    let app = TestApp::new().await;

    let response = app.get("/notes", None).await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.location().as_deref(), Some("/notes/filter/All"));
}
