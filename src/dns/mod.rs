pub mod records;
pub mod resolver;

pub use hickory_resolver::proto::rr::RecordType;
pub use records::{DnsRecordProbe, RecordSet, RECORD_TYPES};
pub use resolver::{HickoryResolver, NameResolver, ResolveFailure};
