#![allow(dead_code)]

use axum::Router;
use axum_test::TestServer;
use board_api::server::{self, ServerState};
use board_db::client::DbClient;
use serde_json::{Value, json};
use std::{path::Path, sync::Arc};

/// The full application over a fresh in-memory store.
pub async fn test_app() -> Router {
    let db_client = DbClient::connect_in_memory().await.unwrap();
    db_client.create_schema().await.unwrap();

    let state = ServerState {
        db_client: Arc::new(db_client),
    };
    let static_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("static");

    server::app(state, &static_dir)
}

pub async fn test_server() -> TestServer {
    TestServer::new(test_app().await).unwrap()
}

pub async fn signup(server: &TestServer, username: &str, password: i64) -> Value {
    server
        .post("/signup/")
        .json(&json!({"username": username, "password": password}))
        .await
        .json()
}

/// Signs the user up and logs in, returning the numeric user id.
pub async fn register(server: &TestServer, username: &str, password: i64) -> i64 {
    signup(server, username, password).await;

    let login: Value = server
        .post("/login/")
        .json(&json!({"username": username, "password": password}))
        .await
        .json();

    login["user_id"].as_i64().unwrap()
}

pub async fn create_post(server: &TestServer, title: &str, content: &str, author_id: i64) -> Value {
    server
        .post("/posts/")
        .json(&json!({"title": title, "content": content, "author_id": author_id}))
        .await
        .json()
}
