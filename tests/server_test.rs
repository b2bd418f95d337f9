//! End-to-end checks over a real TCP listener.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

use problem_chain::config::{parse_config, ConfigError};
use problem_chain::HttpServer;

mod common;

async fn raw_request(addr: std::net::SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.expect("server reachable");
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut response = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut response))
        .await
        .expect("response within timeout")
        .unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

#[tokio::test]
async fn test_server_serves_chain_and_shuts_down() {
    let config = parse_config(
        r#"
        [listener]
        bind_address = "127.0.0.1:0"

        [recovery]
        expose_detail = true
        "#,
    )
    .unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();

    let server = HttpServer::new(config, common::routes());
    assert!(server.config().recovery.expose_detail);
    let handle = tokio::spawn(async move {
        server
            .run(listener, async move {
                let _ = rx.await;
            })
            .await
    });

    let response = raw_request(
        addr,
        "GET /missing HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 404"), "{response}");
    assert!(response.contains("application/problem+json"));
    assert!(response.contains("service-desc"));

    let response = raw_request(
        addr,
        "GET /panic HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 500"), "{response}");
    assert!(response.contains(r#""detail":"Some error""#));

    let response = raw_request(
        addr,
        "GET /test HTTP/1.1\r\nHost: localhost\r\nPrefer: return=minimal\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 204"), "{response}");
    assert!(!response.contains("Hello, test"));

    tx.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server stops after shutdown signal")
        .unwrap()
        .unwrap();
}

#[test]
fn test_load_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
        [service_links]
        description = "/v1/openapi.json"
        "#,
    )
    .unwrap();

    let config = problem_chain::config::load_config(&path).unwrap();
    assert_eq!(config.service_links.description, "/v1/openapi.json");
    assert_eq!(config.service_links.documentation, "/docs");
}

#[test]
fn test_load_config_reports_every_problem() {
    let err = parse_config(
        r#"
        [service_links]
        description = ""
        documentation = ""
        "#,
    )
    .unwrap_err();

    match err {
        ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_load_config_missing_file() {
    let err = problem_chain::config::load_config(std::path::Path::new("/nonexistent/config.toml"))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
