//! Runs the application on a real socket, since holding a body back needs a raw client.

mod common;

use common::test_app;
use std::{net::SocketAddr, time::Duration};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    time::{sleep, timeout},
};

async fn serve() -> SocketAddr {
    let app = test_app().await;
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    address
}

/// Sends the headers of a JSON `POST` and only the first byte of its body.
async fn stall_upload(address: SocketAddr, path: &str) -> TcpStream {
    let mut stream = TcpStream::connect(address).await.unwrap();
    let request = format!(
        "POST {path} HTTP/1.1\r\n\
         Host: localhost\r\n\
         Content-Type: application/json\r\n\
         Content-Length: 100\r\n\
         \r\n\
         {{"
    );
    stream.write_all(request.as_bytes()).await.unwrap();
    stream.flush().await.unwrap();

    stream
}

async fn get(address: SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(address).await.unwrap();
    let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

// The in-memory store has a single connection, so one held connection would block the read.
#[tokio::test]
async fn pending_uploads_hold_no_connection() {
    let address = serve().await;

    let _stalled = [
        stall_upload(address, "/signup/").await,
        stall_upload(address, "/login/").await,
        stall_upload(address, "/posts/").await,
    ];
    sleep(Duration::from_millis(100)).await;

    let response = timeout(Duration::from_secs(5), get(address, "/posts/"))
        .await
        .expect("listing posts blocked behind pending uploads");

    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.ends_with("[]"), "{response}");
}
