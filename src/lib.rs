pub mod analyze;
pub mod concurrent;
pub mod config;
pub mod discover;
pub mod dns;
pub mod error;
pub mod http_client;
pub mod lookup;
pub mod output;
pub mod probe;
pub mod target;

// re-export the types most callers need
pub use crate::config::Config;
pub use crate::error::{InputError, LookupError, TransportError};
pub use crate::probe::{Hit, Outcome, Probe, ProbeEngine, ProbeResult, ScanSession};
pub use crate::target::Target;
