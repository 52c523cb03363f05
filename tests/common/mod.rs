//! Shared utilities for integration testing.
//!
//! The mock upstream is a raw TCP server so tests can observe exactly what
//! arrives on the wire (request line, headers, body bytes) and script the
//! response, including responses with no Content-Type at all.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use cors_proxy::config::ProxyConfig;
use cors_proxy::http::HttpServer;

/// A request as seen by the mock upstream.
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ReceivedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Scripted response the mock upstream returns for every request.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub reason: &'static str,
    pub content_type: Option<&'static str>,
    pub body: &'static [u8],
}

impl UpstreamResponse {
    pub fn ok_json(body: &'static [u8]) -> Self {
        Self {
            status: 200,
            reason: "OK",
            content_type: Some("application/json"),
            body,
        }
    }
}

/// Requests captured by a mock upstream, in arrival order.
pub type RequestLog = Arc<Mutex<Vec<ReceivedRequest>>>;

/// Start a mock upstream on an ephemeral port.
///
/// Every connection gets the same scripted response; each received request
/// is appended to the returned log.
pub async fn start_mock_upstream(response: UpstreamResponse) -> (SocketAddr, RequestLog) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let task_log = log.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let log = task_log.clone();
                    let response = response.clone();
                    tokio::spawn(async move {
                        if let Some(req) = read_request(&mut socket).await {
                            log.lock().unwrap().push(req);
                        }
                        let mut head = format!(
                            "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n",
                            response.status,
                            response.reason,
                            response.body.len()
                        );
                        if let Some(ct) = response.content_type {
                            head.push_str(&format!("Content-Type: {}\r\n", ct));
                        }
                        head.push_str("\r\n");
                        let _ = socket.write_all(head.as_bytes()).await;
                        let _ = socket.write_all(response.body).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, log)
}

/// Start the proxy on an ephemeral port, forwarding to `upstream`.
pub async fn start_proxy(upstream: &str) -> SocketAddr {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.upstream.base_url = upstream.to_string();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config);
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });
    addr
}

/// Non-pooled client so every test request opens a fresh connection.
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Assert the three CORS headers are present, verbatim.
pub fn assert_cors_headers(headers: &reqwest::header::HeaderMap) {
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        "*",
        "missing or wrong Access-Control-Allow-Origin"
    );
    assert_eq!(
        headers.get("access-control-allow-methods").unwrap(),
        "GET, POST, PUT, DELETE, OPTIONS",
        "missing or wrong Access-Control-Allow-Methods"
    );
    assert_eq!(
        headers.get("access-control-allow-headers").unwrap(),
        "Content-Type",
        "missing or wrong Access-Control-Allow-Headers"
    );
}

/// Read one full HTTP/1.1 request (head, then Content-Length body).
async fn read_request(socket: &mut TcpStream) -> Option<ReceivedRequest> {
    let mut buf = Vec::new();
    let mut tmp = [0u8; 4096];
    let header_end = loop {
        let n = socket.read(&mut tmp).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&tmp[..n]);
        if let Some(pos) = find_subslice(&buf, b"\r\n\r\n") {
            break pos;
        }
        if buf.len() > 64 * 1024 {
            return None;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| {
            line.split_once(':')
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        })
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buf[header_end + 4..].to_vec();
    while body.len() < content_length {
        let n = socket.read(&mut tmp).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&tmp[..n]);
    }
    body.truncate(content_length);

    Some(ReceivedRequest {
        method,
        path,
        headers,
        body,
    })
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
