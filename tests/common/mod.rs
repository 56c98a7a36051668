#![allow(dead_code)]

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use async_trait::async_trait;
use recon_kit::dns::{NameResolver, RecordType, ResolveFailure};
use recon_kit::TransportError;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub struct MockResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl MockResponse {
    pub fn status(status: u16) -> Self {
        Self { status, headers: Vec::new(), body: String::new() }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        302 => "Found",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Minimal HTTP/1.1 responder on 127.0.0.1. `route` maps a request path to a response.
pub async fn spawn_http<F>(route: F) -> SocketAddr
where
    F: Fn(&str) -> MockResponse + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let route = Arc::new(route);

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            let route = route.clone();
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }
                let request = String::from_utf8_lossy(&buf);
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                let resp = route(&path);

                let mut out = format!(
                    "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n",
                    resp.status,
                    reason(resp.status),
                    resp.body.len()
                );
                for (name, value) in &resp.headers {
                    out.push_str(&format!("{}: {}\r\n", name, value));
                }
                out.push_str("\r\n");
                out.push_str(&resp.body);
                let _ = stream.write_all(out.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    addr
}

/// Answers every WHOIS query with `answer`.
pub async fn spawn_whois(answer: impl Into<String>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let answer = Arc::new(answer.into());

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            let answer = answer.clone();
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 256];
                while !buf.ends_with(b"\r\n") {
                    match stream.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }
                let _ = stream.write_all(answer.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    addr
}

/// In-memory resolver. Unknown names are NXDOMAIN; hosts in `broken` and
/// record types in `broken_types` fail at transport level.
#[derive(Default)]
pub struct FakeResolver {
    pub hosts: HashMap<String, Vec<IpAddr>>,
    pub records: HashMap<(String, RecordType), Vec<String>>,
    pub broken: Vec<String>,
    pub broken_types: Vec<RecordType>,
}

impl FakeResolver {
    pub fn with_host(mut self, host: &str, addr: &str) -> Self {
        self.hosts.entry(host.to_string()).or_default().push(addr.parse().unwrap());
        self
    }

    pub fn with_records(mut self, name: &str, record_type: RecordType, records: &[&str]) -> Self {
        self.records.insert(
            (name.to_string(), record_type),
            records.iter().map(|r| r.to_string()).collect(),
        );
        self
    }

    pub fn with_broken(mut self, host: &str) -> Self {
        self.broken.push(host.to_string());
        self
    }

    pub fn with_broken_type(mut self, record_type: RecordType) -> Self {
        self.broken_types.push(record_type);
        self
    }
}

#[async_trait]
impl NameResolver for FakeResolver {
    async fn lookup_ip(&self, host: &str) -> Result<Vec<IpAddr>, ResolveFailure> {
        if self.broken.iter().any(|b| b == host) {
            return Err(TransportError::Resolve("server failure".into()).into());
        }
        self.hosts.get(host).cloned().ok_or(ResolveFailure::NotFound)
    }

    async fn lookup_records(&self, name: &str, record_type: RecordType) -> Result<Vec<String>, ResolveFailure> {
        if self.broken_types.contains(&record_type) {
            return Err(TransportError::Resolve("server failure".into()).into());
        }
        self.records
            .get(&(name.to_string(), record_type))
            .cloned()
            .ok_or(ResolveFailure::NotFound)
    }
}
