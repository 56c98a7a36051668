use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::proto::rr::RecordType;

use crate::dns::resolver::{NameResolver, ResolveFailure};
use crate::probe::{HitDetail, Probe, ProbeResult};

/// Record types queried by the DNS lookup, in report order.
pub const RECORD_TYPES: [RecordType; 6] = [
    RecordType::A,
    RecordType::AAAA,
    RecordType::MX,
    RecordType::NS,
    RecordType::TXT,
    RecordType::CNAME,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSet {
    pub record_type: RecordType,
    pub records: Vec<String>,
}

impl fmt::Display for RecordSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Records:", self.record_type)?;
        for record in &self.records {
            write!(f, "\n  → {}", record)?;
        }
        Ok(())
    }
}

impl HitDetail for RecordSet {
    fn label(&self) -> &'static str {
        "DNS"
    }
}

/// Resolve one record type of the target domain. Each type stands alone, so a
/// missing MX never hides the A records.
pub struct DnsRecordProbe {
    resolver: Arc<dyn NameResolver>,
}

impl DnsRecordProbe {
    pub fn new(resolver: Arc<dyn NameResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl Probe for DnsRecordProbe {
    type Candidate = RecordType;
    type Detail = RecordSet;

    fn name(&self) -> &'static str {
        "dns-records"
    }

    async fn probe(&self, domain: &str, record_type: &RecordType, _timeout: Duration) -> ProbeResult<RecordType, RecordSet> {
        let record_type = *record_type;
        match self.resolver.lookup_records(domain, record_type).await {
            Ok(records) => ProbeResult::Hit {
                candidate: record_type,
                detail: RecordSet { record_type, records },
            },
            Err(ResolveFailure::NotFound) => ProbeResult::Miss { candidate: record_type },
            Err(ResolveFailure::Transport(cause)) => ProbeResult::Errored { candidate: record_type, cause },
        }
    }
}
