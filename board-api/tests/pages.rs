mod common;

use axum::http::StatusCode;
use common::test_server;
use serde_json::Value;

#[tokio::test]
async fn pages_are_html() {
    let server = test_server().await;

    for (path, marker) in [
        ("/", r#"id="login-form""#),
        ("/signup-page", r#"id="signup-form""#),
        ("/posts-page", r#"id="post-form""#),
    ] {
        let response = server.get(path).await;

        response.assert_status_ok();
        let content_type = response.header("content-type");
        assert!(content_type.to_str().unwrap().starts_with("text/html"));
        assert!(response.text().contains(marker), "{path} is missing {marker}");
    }
}

#[tokio::test]
async fn static_files_are_served() {
    let server = test_server().await;

    let response = server.get("/static/board.js").await;

    response.assert_status_ok();
    assert!(response.text().contains("bindPostsPage"));
    assert_eq!(
        server.get("/static/missing.js").await.status_code(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn unknown_routes_get_a_json_404() {
    let server = test_server().await;

    let response = server.get("/nowhere").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["status"], 404);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Unknown route requested"));
    assert!(detail.ends_with("/nowhere"));
}
