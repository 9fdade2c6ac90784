//! Media serving over HTTP
//!
//! Boots the full router on an ephemeral port and fetches stored files the
//! way a storefront client would, so the serving route is exercised against
//! the URLs `MediaStore` actually hands out.

use std::net::SocketAddr;

use catalog_server::media::UploadedFile;
use catalog_server::{api, Config, ServerState};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn spawn_server(public_prefix: &str) -> (ServerState, SocketAddr, TempDir) {
    let dir = TempDir::new().unwrap();
    let mut config = Config::with_overrides(dir.path().to_string_lossy().to_string(), 0);
    config.media_public_prefix = public_prefix.to_string();

    let state = ServerState::initialize(&config).await.unwrap();
    let app = api::router(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (state, addr, dir)
}

async fn http_get(addr: SocketAddr, path: &str) -> (u16, Vec<u8>) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();

    let header_end = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("complete HTTP response");
    let head = String::from_utf8_lossy(&raw[..header_end]);
    let status: u16 = head
        .split_whitespace()
        .nth(1)
        .expect("status code")
        .parse()
        .unwrap();

    (status, raw[header_end + 4..].to_vec())
}

#[tokio::test]
async fn test_stored_url_is_served_under_configured_prefix() {
    let (state, addr, _dir) = spawn_server("/assets").await;

    let url = state
        .media
        .store(&UploadedFile {
            filename: "front.jpg".to_string(),
            data: vec![1, 2, 3, 4],
        })
        .unwrap();
    assert!(url.starts_with("/assets/"), "unexpected url: {url}");

    let (status, body) = http_get(addr, &url).await;
    assert_eq!(status, 200);
    assert_eq!(body, vec![1, 2, 3, 4]);

    // The default prefix is not routed when the store uses another one.
    let name = url.rsplit('/').next().unwrap();
    let (status, _) = http_get(addr, &format!("/media/{name}")).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_default_prefix_serves_and_misses_cleanly() {
    let (state, addr, _dir) = spawn_server("/media").await;

    let url = state
        .media
        .store(&UploadedFile {
            filename: "spin.mp4".to_string(),
            data: b"video-bytes".to_vec(),
        })
        .unwrap();

    let (status, body) = http_get(addr, &url).await;
    assert_eq!(status, 200);
    assert_eq!(body, b"video-bytes".to_vec());

    let (status, _) = http_get(addr, "/media/does-not-exist.jpg").await;
    assert_eq!(status, 404);
}
