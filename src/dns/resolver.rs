use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::rr::RecordType;
use hickory_resolver::TokioAsyncResolver;
use thiserror::Error;

use crate::error::TransportError;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveFailure {
    /// NXDOMAIN or an empty answer.
    #[error("no records found")]
    NotFound,

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Name resolution used by the subdomain and DNS record probes.
#[async_trait]
pub trait NameResolver: Send + Sync {
    async fn lookup_ip(&self, host: &str) -> Result<Vec<IpAddr>, ResolveFailure>;

    /// Text form of every record of `record_type` held by `name`.
    async fn lookup_records(&self, name: &str, record_type: RecordType) -> Result<Vec<String>, ResolveFailure>;
}

pub struct HickoryResolver {
    inner: TokioAsyncResolver,
    timeout: Duration,
}

impl HickoryResolver {
    /// System resolver configuration, one attempt per query.
    /// Falls back to the library's default upstreams when no system config is readable.
    pub fn from_system(timeout: Duration) -> Self {
        let (config, mut opts) = match hickory_resolver::system_conf::read_system_conf() {
            Ok(conf) => conf,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read system resolver config, using defaults");
                (ResolverConfig::default(), ResolverOpts::default())
            }
        };
        opts.timeout = timeout;
        opts.attempts = 1;
        Self { inner: TokioAsyncResolver::tokio(config, opts), timeout }
    }

    /// Per-query budget the resolver was built with.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn classify(&self, e: ResolveError) -> ResolveFailure {
        match e.kind() {
            ResolveErrorKind::NoRecordsFound { .. } => ResolveFailure::NotFound,
            ResolveErrorKind::Timeout => TransportError::Timeout(self.timeout).into(),
            _ => TransportError::Resolve(e.to_string()).into(),
        }
    }
}

#[async_trait]
impl NameResolver for HickoryResolver {
    async fn lookup_ip(&self, host: &str) -> Result<Vec<IpAddr>, ResolveFailure> {
        let lookup = self.inner.lookup_ip(host).await.map_err(|e| self.classify(e))?;
        let addrs: Vec<IpAddr> = lookup.iter().collect();
        if addrs.is_empty() {
            return Err(ResolveFailure::NotFound);
        }
        Ok(addrs)
    }

    async fn lookup_records(&self, name: &str, record_type: RecordType) -> Result<Vec<String>, ResolveFailure> {
        let lookup = self
            .inner
            .lookup(name, record_type)
            .await
            .map_err(|e| self.classify(e))?;

        // answers may carry the CNAME chain; keep only the requested type
        let records: Vec<String> = lookup
            .record_iter()
            .filter(|r| r.record_type() == record_type)
            .filter_map(|r| r.data())
            .map(|data| data.to_string())
            .collect();

        if records.is_empty() {
            return Err(ResolveFailure::NotFound);
        }
        Ok(records)
    }
}
