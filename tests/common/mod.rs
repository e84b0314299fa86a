//! Shared utilities for integration tests.

use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use http_balancer::config::{BackendConfig, BalancerConfig};
use http_balancer::{Balancer, HttpServer};

/// Start a mock origin that echoes the request back.
///
/// Body is `"<METHOD> <URI>"`, followed by `"\n<body>"` when the request had one.
/// `x-upstream` names the origin; `x-test`, `host` and `x-forwarded-for` are
/// reflected as `x-test`, `x-echo-host` and `x-echo-forwarded-for`.
pub async fn start_echo_backend(name: &'static str) -> SocketAddr {
    let app = Router::new().fallback(move |request: Request<Body>| echo(name, request));
    serve(app).await
}

async fn echo(name: &'static str, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();

    let mut text = format!("{} {}", parts.method, parts.uri);
    if !body.is_empty() {
        text.push('\n');
        text.push_str(&String::from_utf8_lossy(&body));
    }

    let mut headers = HeaderMap::new();
    headers.insert("x-upstream", HeaderValue::from_static(name));
    for (from, to) in [
        ("x-test", "x-test"),
        ("host", "x-echo-host"),
        ("x-forwarded-for", "x-echo-forwarded-for"),
    ] {
        if let Some(v) = parts.headers.get(from) {
            headers.insert(to, v.clone());
        }
    }

    (headers, text).into_response()
}

/// Start a mock origin that answers every request with a fixed status and body.
#[allow(dead_code)]
pub async fn start_status_backend(status: StatusCode, body: &'static str) -> SocketAddr {
    let app = Router::new().fallback(move || async move { (status, body) });
    serve(app).await
}

/// Start a mock origin that only switches protocols for `Upgrade: websocket`.
///
/// It answers the handshake with `101` and `Upgrade: <answer>`, then echoes
/// every byte on the upgraded connection. Requests without the upgrade
/// headers get `400`.
#[allow(dead_code)]
pub async fn start_upgrade_backend(answer: &'static str) -> SocketAddr {
    let app = Router::new().fallback(move |request: Request<Body>| switch(answer, request));
    serve(app).await
}

#[allow(dead_code)]
async fn switch(answer: &'static str, mut request: Request<Body>) -> Response {
    let headers = request.headers();
    let connection_upgrade = headers
        .get("connection")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.split(',').any(|t| t.trim().eq_ignore_ascii_case("upgrade")));
    let websocket = headers
        .get("upgrade")
        .is_some_and(|v| v.as_bytes().eq_ignore_ascii_case(b"websocket"));

    if !(connection_upgrade && websocket) {
        return (StatusCode::BAD_REQUEST, "no upgrade header seen").into_response();
    }

    let on_upgrade = hyper::upgrade::on(&mut request);
    tokio::spawn(async move {
        if let Ok(upgraded) = on_upgrade.await {
            let (mut reader, mut writer) = tokio::io::split(TokioIo::new(upgraded));
            let _ = tokio::io::copy(&mut reader, &mut writer).await;
        }
    });

    Response::builder()
        .status(StatusCode::SWITCHING_PROTOCOLS)
        .header("connection", "upgrade")
        .header("upgrade", answer)
        .header("sec-websocket-accept", "s3pPLMBiTxaQ9kYGzzhZRbK+xOo=")
        .body(Body::empty())
        .unwrap()
}

/// Send a WebSocket handshake to `addr` over a raw connection.
///
/// Returns the connection and the lowercased response head.
#[allow(dead_code)]
pub async fn upgrade_handshake(addr: SocketAddr) -> (TcpStream, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let handshake = format!(
        "GET /chat HTTP/1.1\r\n\
         Host: {addr}\r\n\
         Connection: Upgrade\r\n\
         Upgrade: websocket\r\n\
         Sec-WebSocket-Version: 13\r\n\
         Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\n\
         \r\n"
    );
    stream.write_all(handshake.as_bytes()).await.unwrap();

    let mut head = Vec::new();
    let mut byte = [0u8; 1];
    while !head.ends_with(b"\r\n\r\n") {
        let n = stream.read(&mut byte).await.unwrap();
        assert!(n > 0, "connection closed before the response head");
        head.push(byte[0]);
    }

    (stream, String::from_utf8_lossy(&head).to_lowercase())
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Origin URL for a local address.
pub fn origin(addr: SocketAddr) -> String {
    format!("http://{}", addr)
}

/// Start the balancer over `origins` and return its address.
#[allow(dead_code)]
pub async fn start_balancer(origins: &[String]) -> SocketAddr {
    let mut config = BalancerConfig::default();
    config.listener.port = 0;
    config.backends = origins.iter().map(BackendConfig::new).collect();

    let balancer = Balancer::from_config(&config).unwrap();
    start_server(balancer).await
}

/// Serve an already-built balancer and return its address.
pub async fn start_server(balancer: Balancer) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = HttpServer::new(balancer).run(listener).await;
    });
    addr
}

/// Client that never goes through an environment proxy.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap()
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}
