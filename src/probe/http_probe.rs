use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::TransportError;
use crate::probe::{HitDetail, Probe, ProbeResult};
use crate::target::{join_path, normalize_url};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStatus {
    /// 200
    Found,
    /// 403, exists but denied
    Forbidden,
}

impl PathStatus {
    pub fn code(&self) -> u16 {
        match self {
            PathStatus::Found => 200,
            PathStatus::Forbidden => 403,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            PathStatus::Found => "found",
            PathStatus::Forbidden => "forbidden",
        }
    }
}

/// 200 and 403 are hits, everything else is a miss.
pub fn classify_status(status: u16) -> Option<PathStatus> {
    match status {
        200 => Some(PathStatus::Found),
        403 => Some(PathStatus::Forbidden),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathHit {
    pub url: String,
    pub status: PathStatus,
}

impl fmt::Display for PathHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self.status {
            PathStatus::Found => "OK",
            PathStatus::Forbidden => "Forbidden",
        };
        write!(f, "{} ({} {})", self.url, self.status.code(), reason)
    }
}

impl HitDetail for PathHit {
    fn label(&self) -> &'static str {
        match self.status {
            PathStatus::Found => "FOUND",
            PathStatus::Forbidden => "FORBIDDEN",
        }
    }
}

/// GET `base/word` without following redirects.
pub struct DirectoryProbe {
    client: Client,
}

impl DirectoryProbe {
    /// `client` should be built with `Redirects::None`.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Probe for DirectoryProbe {
    type Candidate = String;
    type Detail = PathHit;

    fn name(&self) -> &'static str {
        "http-path"
    }

    async fn probe(&self, base_url: &str, word: &String, timeout: Duration) -> ProbeResult<String, PathHit> {
        let url = join_path(&normalize_url(base_url), word);

        match self.client.get(&url).timeout(timeout).send().await {
            Ok(resp) => {
                let status = resp.status().as_u16();
                tracing::trace!(url = %url, status, "path probed");
                match classify_status(status) {
                    Some(status) => ProbeResult::Hit {
                        candidate: word.clone(),
                        detail: PathHit { url, status },
                    },
                    None => ProbeResult::Miss { candidate: word.clone() },
                }
            }
            Err(e) => ProbeResult::Errored {
                candidate: word.clone(),
                cause: TransportError::from_reqwest(e, timeout),
            },
        }
    }
}
