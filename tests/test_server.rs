use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use arcroute::config::RoutingConfig;
use arcroute::http::connection::Connection;
use arcroute::route::{KeyedProtector, Router};
use arcroute::server::listener::serve;
use arcroute::site;

const KEY: &str = "server-test-key";

async fn start() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let routing = RoutingConfig {
        anti_forgery_key: Some(KEY.to_string()),
        ..RoutingConfig::default()
    };
    let router = Arc::new(Router::from_config(&routing, site::root));
    tokio::spawn(serve(listener, router));

    addr
}

async fn exchange(addr: SocketAddr, raw: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();

    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();
    String::from_utf8_lossy(&buf).into_owned()
}

fn split(response: &str) -> (&str, &str) {
    response.split_once("\r\n\r\n").unwrap()
}

#[tokio::test]
async fn test_get_negotiates_json() {
    let addr = start().await;

    let response = exchange(
        addr,
        "GET /hello/grace HTTP/1.1\r\nHost: localhost\r\nAccept: application/json\r\nConnection: close\r\n\r\n",
    )
    .await;

    let (head, body) = split(&response);
    assert!(head.starts_with("HTTP/1.1 200 OK"));
    assert!(head.contains("Content-Type: application/json"));
    let value: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(value["name"], "grace");
}

#[tokio::test]
async fn test_head_has_no_body() {
    let addr = start().await;

    let response = exchange(
        addr,
        "HEAD /hello HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;

    let (head, body) = split(&response);
    assert!(head.starts_with("HTTP/1.1 200 OK"));
    assert!(head.contains("Content-Length: 13"));
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_static_looking_path_is_not_routed() {
    let addr = start().await;

    let response = exchange(
        addr,
        "GET /assets/app.js HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 404 Not Found"));
    assert!(response.ends_with("404 Not Found"));
}

#[tokio::test]
async fn test_redirect() {
    let addr = start().await;

    let response = exchange(
        addr,
        "GET /start HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 303 See Other"));
    assert!(response.contains("Location: /hello"));
}

#[tokio::test]
async fn test_unknown_method_is_405() {
    let addr = start().await;

    let response = exchange(
        addr,
        "PATCH /hello HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;

    let (head, body) = split(&response);
    assert!(head.starts_with("HTTP/1.1 405 Method Not Allowed"));
    assert!(head.contains("Allow: GET, HEAD"));
    assert_eq!(body, "The method 'PATCH' is not allowed.");
}

#[tokio::test]
async fn test_post_without_token_is_forbidden() {
    let addr = start().await;
    let body = "body=hello";
    let raw = format!(
        "POST /notes HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/x-www-form-urlencoded\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    let response = exchange(addr, &raw).await;

    assert!(response.starts_with("HTTP/1.1 403 Forbidden"));
}

#[tokio::test]
async fn test_post_with_token_creates_note() {
    let addr = start().await;
    let token = KeyedProtector::new(KEY).issue("e2e");
    let body = "body=hello";
    let raw = format!(
        "POST /notes HTTP/1.1\r\nHost: localhost\r\nX-Request-Verification-Token: {token}\r\nContent-Type: application/x-www-form-urlencoded\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    let response = exchange(addr, &raw).await;

    let (head, body) = split(&response);
    assert!(head.starts_with("HTTP/1.1 201 Created"));
    assert_eq!(body, "Created note: hello");
}

#[tokio::test]
async fn test_keep_alive_serves_several_requests() {
    let addr = start().await;

    let response = exchange(
        addr,
        "GET /hello HTTP/1.1\r\nHost: localhost\r\n\r\nGET /admin HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;

    assert_eq!(response.matches("HTTP/1.1 ").count(), 2);
    assert!(response.contains("Hello, world!"));
    assert!(response.contains("HTTP/1.1 403 Forbidden"));
}

#[tokio::test]
async fn test_pipelined_requests_are_read_in_order() {
    let routing = RoutingConfig::default();
    let router = Arc::new(Router::from_config(&routing, site::root));
    let (mut client, server) = tokio::io::duplex(1024);
    let mut connection = Connection::new(server, router);

    client
        .write_all(
            b"PUT /a HTTP/1.1\r\nContent-Length: 5\r\n\r\nfirstGET /b HTTP/1.1\r\n\r\nDELETE /c HTTP/1.1\r\n\r\n",
        )
        .await
        .unwrap();
    drop(client);

    let first = connection.read_request().await.unwrap().unwrap();
    assert_eq!(first.path, "/a");
    assert_eq!(first.body, b"first".to_vec());

    let second = connection.read_request().await.unwrap().unwrap();
    assert_eq!(second.path, "/b");
    assert!(second.body.is_empty());

    let third = connection.read_request().await.unwrap().unwrap();
    assert_eq!(third.method, "DELETE");

    assert!(connection.read_request().await.unwrap().is_none());
}
