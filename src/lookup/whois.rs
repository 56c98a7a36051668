/// WHOIS over TCP port 43 (RFC 3912)
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::error::{LookupError, TransportError};
use crate::target::Target;

pub const IANA_SERVER: &str = "whois.iana.org";
const WHOIS_PORT: u16 = 43;
const MAX_RESPONSE: u64 = 256 * 1024;

pub struct WhoisClient {
    server: Option<String>,
    root: String,
    timeout: Duration,
}

impl WhoisClient {
    /// With `server = None` the root server is asked first and its referral followed.
    pub fn new(server: Option<String>, timeout: Duration) -> Self {
        Self { server, root: IANA_SERVER.to_string(), timeout }
    }

    /// Replace the referral root (`whois.iana.org`).
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    pub async fn lookup(&self, target: &Target) -> Result<WhoisRecord, LookupError> {
        let domain = target.host();

        let response = match &self.server {
            Some(server) => self.query(server, &domain).await?,
            None => {
                let root = self.query(&self.root, &domain).await?;
                match referral(&root) {
                    Some(server) => {
                        tracing::debug!(domain = %domain, server = %server, "Following WHOIS referral");
                        self.query(&server, &domain).await?
                    }
                    None => root,
                }
            }
        };

        let record = WhoisRecord::parse(&response);
        if record.is_empty() {
            return Err(LookupError::Negative {
                service: "whois",
                message: format!("no registration data for {}", domain),
            });
        }
        Ok(record)
    }

    /// Send `domain\r\n` and read until the server closes.
    pub async fn query(&self, server: &str, domain: &str) -> Result<String, TransportError> {
        let addr = with_port(server);
        let exchange = async {
            let mut stream = TcpStream::connect(&addr)
                .await
                .map_err(|e| TransportError::Connect(format!("{}: {}", addr, e)))?;
            stream
                .write_all(format!("{}\r\n", domain).as_bytes())
                .await
                .map_err(|e| TransportError::Connect(format!("failed to send query: {}", e)))?;

            let mut raw = Vec::new();
            (&mut stream)
                .take(MAX_RESPONSE)
                .read_to_end(&mut raw)
                .await
                .map_err(|e| TransportError::Malformed(format!("failed to read response: {}", e)))?;
            Ok::<_, TransportError>(String::from_utf8_lossy(&raw).into_owned())
        };

        tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| TransportError::Timeout(self.timeout))?
    }
}

fn with_port(server: &str) -> String {
    if server.contains(':') {
        server.to_string()
    } else {
        format!("{}:{}", server, WHOIS_PORT)
    }
}

/// `refer:` / `whois:` line of an IANA answer.
pub fn referral(response: &str) -> Option<String> {
    response.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim();
        if (key == "refer" || key == "whois") && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhoisRecord {
    pub domain_name: Option<String>,
    pub registrar: Option<String>,
    pub creation_date: Option<String>,
    pub expiration_date: Option<String>,
    pub updated_date: Option<String>,
    pub name_servers: Vec<String>,
    pub status: Vec<String>,
}

impl WhoisRecord {
    pub fn parse(response: &str) -> Self {
        let mut record = WhoisRecord::default();

        for line in response.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('%') || line.starts_with('#') || line.starts_with(">>>") {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }

            match key.trim().to_ascii_lowercase().as_str() {
                "domain name" | "domain" => set_once(&mut record.domain_name, value),
                "registrar" | "sponsoring registrar" => set_once(&mut record.registrar, value),
                "creation date" | "created" | "created on" | "registered on" => {
                    set_once(&mut record.creation_date, value)
                }
                "registry expiry date"
                | "registrar registration expiration date"
                | "expiration date"
                | "expiry date"
                | "expires"
                | "paid-till" => set_once(&mut record.expiration_date, value),
                "updated date" | "last updated" | "last-modified" | "changed" => {
                    set_once(&mut record.updated_date, value)
                }
                "name server" | "nserver" => {
                    let ns = value.to_ascii_lowercase();
                    if !record.name_servers.contains(&ns) {
                        record.name_servers.push(ns);
                    }
                }
                "domain status" | "status" => {
                    // drop the trailing ICANN explanation URL
                    let status = value.split_whitespace().next().unwrap_or(value).to_string();
                    if !record.status.contains(&status) {
                        record.status.push(status);
                    }
                }
                _ => {}
            }
        }

        record
    }

    pub fn is_empty(&self) -> bool {
        self.domain_name.is_none() && self.registrar.is_none() && self.creation_date.is_none()
    }

    /// Labeled display fields; absent values are `N/A`.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let or_na = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_string());
        let list = |v: &[String]| if v.is_empty() { "N/A".to_string() } else { v.join(", ") };
        vec![
            ("Domain Name", or_na(&self.domain_name)),
            ("Registrar", or_na(&self.registrar)),
            ("Creation Date", or_na(&self.creation_date)),
            ("Expiration Date", or_na(&self.expiration_date)),
            ("Updated Date", or_na(&self.updated_date)),
            ("Name Servers", list(&self.name_servers)),
            ("Status", list(&self.status)),
        ]
    }
}

fn set_once(slot: &mut Option<String>, value: &str) {
    if slot.is_none() {
        *slot = Some(value.to_string());
    }
}
