pub mod engine;
pub mod http_probe;
pub mod tcp_connect;
pub mod wordlists;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::TransportError;

pub use engine::{ProbeEngine, ScanSession};

/// Three-way classification of a single probe.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeResult<C, D> {
    /// The target exhibits the tested property.
    Hit { candidate: C, detail: D },
    /// Well-formed negative answer.
    Miss { candidate: C },
    /// The probe could not complete. Absorbed by the engine.
    Errored { candidate: C, cause: TransportError },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Hit,
    Miss,
    Errored,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hit<C, D> {
    pub candidate: C,
    pub detail: D,
}

impl<C, D> ProbeResult<C, D> {
    pub fn candidate(&self) -> &C {
        match self {
            ProbeResult::Hit { candidate, .. }
            | ProbeResult::Miss { candidate }
            | ProbeResult::Errored { candidate, .. } => candidate,
        }
    }

    pub fn outcome(&self) -> Outcome {
        match self {
            ProbeResult::Hit { .. } => Outcome::Hit,
            ProbeResult::Miss { .. } => Outcome::Miss,
            ProbeResult::Errored { .. } => Outcome::Errored,
        }
    }

    pub fn detail(&self) -> Option<&D> {
        match self {
            ProbeResult::Hit { detail, .. } => Some(detail),
            _ => None,
        }
    }

    pub fn into_hit(self) -> Option<Hit<C, D>> {
        match self {
            ProbeResult::Hit { candidate, detail } => Some(Hit { candidate, detail }),
            _ => None,
        }
    }
}

/// Payload carried by a hit. `Display` renders the full report line.
pub trait HitDetail: fmt::Display + Clone + Send + Sync {
    /// Console tag for the hit, e.g. `OPEN` or `FORBIDDEN`.
    fn label(&self) -> &'static str {
        "FOUND"
    }
}

/// One network test of a single candidate against a target.
///
/// Implementations never fail: every transport problem is folded into
/// `ProbeResult::Errored` (or `Miss` where absence is the expected answer).
#[async_trait]
pub trait Probe: Send + Sync {
    type Candidate: Clone + fmt::Display + Send + Sync;
    type Detail: HitDetail;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn probe(
        &self,
        target: &str,
        candidate: &Self::Candidate,
        timeout: Duration,
    ) -> ProbeResult<Self::Candidate, Self::Detail>;
}

/// Receives one event per candidate, in completion order.
pub trait ProbeObserver<C, D>: Send + Sync {
    fn on_start(&self, _target: &str, _total: usize) {}

    fn on_event(&self, result: &ProbeResult<C, D>);
}

/// Observer that discards everything.
pub struct NoopObserver;

impl<C, D> ProbeObserver<C, D> for NoopObserver {
    fn on_event(&self, _result: &ProbeResult<C, D>) {}
}
