use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::dns::resolver::{NameResolver, ResolveFailure};
use crate::probe::{HitDetail, Probe, ProbeResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubdomainHit {
    pub subdomain: String,
    /// Never empty.
    pub addresses: Vec<IpAddr>,
}

impl SubdomainHit {
    pub fn address(&self) -> IpAddr {
        self.addresses[0]
    }
}

impl fmt::Display for SubdomainHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.subdomain, self.address())
    }
}

impl HitDetail for SubdomainHit {}

/// Resolves `word.domain`. An unresolvable name is the ordinary negative
/// answer, so every failure is a `Miss`.
pub struct SubdomainProbe {
    resolver: Arc<dyn NameResolver>,
}

impl SubdomainProbe {
    pub fn new(resolver: Arc<dyn NameResolver>) -> Self {
        Self { resolver }
    }

    pub fn fqdn(word: &str, domain: &str) -> String {
        format!("{}.{}", word, domain)
    }
}

#[async_trait]
impl Probe for SubdomainProbe {
    type Candidate = String;
    type Detail = SubdomainHit;

    fn name(&self) -> &'static str {
        "subdomain"
    }

    async fn probe(&self, domain: &str, word: &String, _timeout: Duration) -> ProbeResult<String, SubdomainHit> {
        let subdomain = Self::fqdn(word, domain);

        match self.resolver.lookup_ip(&subdomain).await {
            Ok(addresses) if !addresses.is_empty() => ProbeResult::Hit {
                candidate: word.clone(),
                detail: SubdomainHit { subdomain, addresses },
            },
            Ok(_) | Err(ResolveFailure::NotFound) => ProbeResult::Miss { candidate: word.clone() },
            Err(ResolveFailure::Transport(e)) => {
                tracing::debug!(subdomain = %subdomain, error = %e, "Resolution failed");
                ProbeResult::Miss { candidate: word.clone() }
            }
        }
    }
}
