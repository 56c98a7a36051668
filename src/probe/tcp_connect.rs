use std::fmt;
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::{lookup_host, TcpStream};
use tokio::time::timeout as with_timeout;

use crate::error::TransportError;
use crate::probe::{HitDetail, Probe, ProbeResult};

/// Well-known service for a port, `"Unknown"` otherwise.
pub fn service_name(port: u16) -> &'static str {
    match port {
        21 => "FTP",
        22 => "SSH",
        23 => "Telnet",
        25 => "SMTP",
        53 => "DNS",
        80 => "HTTP",
        110 => "POP3",
        143 => "IMAP",
        443 => "HTTPS",
        993 => "IMAPS",
        995 => "POP3S",
        3306 => "MySQL",
        5432 => "PostgreSQL",
        8080 => "HTTP-Alt",
        8443 => "HTTPS-Alt",
        _ => "Unknown",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenPort {
    pub port: u16,
    pub service: &'static str,
}

impl fmt::Display for OpenPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Port {}/tcp - {}", self.port, self.service)
    }
}

impl HitDetail for OpenPort {
    fn label(&self) -> &'static str {
        "OPEN"
    }
}

/// Full TCP handshake against `(target, port)`.
///
/// Refused or timed-out connects are a closed port (`Miss`). Failures that
/// happen before a connect is attempted, such as an unresolvable host, are
/// `Errored`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpConnectProbe;

impl TcpConnectProbe {
    async fn resolve(target: &str, port: u16) -> Result<SocketAddr, TransportError> {
        let mut addrs = lookup_host((target, port))
            .await
            .map_err(|e| TransportError::Resolve(format!("{}: {}", target, e)))?;
        addrs
            .next()
            .ok_or_else(|| TransportError::Resolve(format!("{}: no addresses", target)))
    }
}

#[async_trait]
impl Probe for TcpConnectProbe {
    type Candidate = u16;
    type Detail = OpenPort;

    fn name(&self) -> &'static str {
        "tcp-connect"
    }

    async fn probe(&self, target: &str, port: &u16, timeout: Duration) -> ProbeResult<u16, OpenPort> {
        let port = *port;
        let addr = match Self::resolve(target, port).await {
            Ok(addr) => addr,
            Err(cause) => return ProbeResult::Errored { candidate: port, cause },
        };

        match with_timeout(timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => {
                drop(stream);
                ProbeResult::Hit {
                    candidate: port,
                    detail: OpenPort { port, service: service_name(port) },
                }
            }
            Ok(Err(e)) if e.kind() == ErrorKind::PermissionDenied => ProbeResult::Errored {
                candidate: port,
                cause: TransportError::Connect(e.to_string()),
            },
            Ok(Err(_)) | Err(_) => ProbeResult::Miss { candidate: port },
        }
    }
}
