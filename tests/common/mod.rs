// Shared fixtures: a minimal in-process HTTP server and comment builders
#![allow(dead_code)]

use chrono::{Duration, TimeZone, Utc};
use sentim::analysis::RawComment;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Request as seen by a fixture handler
#[derive(Debug, Clone)]
pub struct FixtureRequest {
    pub method: String,
    pub target: String,
    pub body: Vec<u8>,
}

impl FixtureRequest {
    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or_default()
    }

    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.target.split_once('?')?.1;
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.to_string())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("fixture request body is JSON")
    }
}

/// Canned response
#[derive(Debug, Clone)]
pub struct FixtureResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl FixtureResponse {
    pub fn json(value: serde_json::Value) -> Self {
        Self {
            status: 200,
            content_type: "application/json",
            body: value.to_string().into_bytes(),
        }
    }

    pub fn image(bytes: &[u8]) -> Self {
        Self {
            status: 200,
            content_type: "image/png",
            body: bytes.to_vec(),
        }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.as_bytes().to_vec(),
        }
    }
}

/// Serve `handler` on an ephemeral local port; returns the base URL
pub async fn spawn_fixture<F>(handler: F) -> String
where
    F: Fn(&FixtureRequest) -> FixtureResponse + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handler = Arc::new(handler);

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            let handler = Arc::clone(&handler);
            tokio::spawn(async move {
                if let Some(req) = read_request(&mut stream).await {
                    let resp = handler(&req);
                    let head = format!(
                        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                        resp.status,
                        reason(resp.status),
                        resp.content_type,
                        resp.body.len()
                    );
                    let _ = stream.write_all(head.as_bytes()).await;
                    let _ = stream.write_all(&resp.body).await;
                    let _ = stream.shutdown().await;
                }
            });
        }
    });

    format!("http://{}", addr)
}

async fn read_request(stream: &mut TcpStream) -> Option<FixtureRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();

    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buf[header_end..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some(FixtureRequest {
        method,
        target,
        body,
    })
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Comment `n` of a fixture video; timestamps increase with `n`
pub fn raw_comment(n: usize) -> RawComment {
    RawComment {
        text: format!("comment {}", n),
        timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(n as i64),
        author: format!("@viewer{}", n),
        like_count: n as u64,
    }
}

/// commentThreads item in the upstream API's JSON shape
pub fn api_thread(text: &str, n: usize) -> serde_json::Value {
    serde_json::json!({
        "kind": "youtube#commentThread",
        "id": format!("thread-{}", n),
        "snippet": {
            "topLevelComment": {
                "snippet": {
                    "textDisplay": text,
                    "authorDisplayName": format!("@viewer{}", n),
                    "likeCount": n,
                    "publishedAt": format!("2024-01-01T00:{:02}:00Z", n % 60)
                }
            }
        }
    })
}
