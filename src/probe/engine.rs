use std::time::{Duration, Instant};

use crate::concurrent::OrderedExecutor;
use crate::error::TransportError;
use crate::probe::{Hit, Probe, ProbeObserver, ProbeResult};
use crate::target::Target;

/// Outcome of one engine run against one target.
#[derive(Debug, Clone)]
pub struct ScanSession<C, D> {
    pub target: Target,
    /// Hits in candidate order.
    pub hits: Vec<Hit<C, D>>,
    pub probed: usize,
    pub misses: usize,
    pub errors: usize,
    pub elapsed: Duration,
}

impl<C, D> ScanSession<C, D> {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Drives a candidate list through a probe, one attempt per candidate.
#[derive(Debug, Clone, Copy)]
pub struct ProbeEngine {
    timeout: Duration,
    concurrency: usize,
}

impl ProbeEngine {
    /// `timeout` applies to each probe individually, never to the session.
    pub fn new(timeout: Duration, concurrency: usize) -> Self {
        Self {
            timeout: timeout.max(Duration::from_millis(1)),
            concurrency: concurrency.max(1),
        }
    }

    /// One probe at a time, in candidate order.
    pub fn sequential(timeout: Duration) -> Self {
        Self::new(timeout, 1)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub async fn run<P: Probe>(
        &self,
        target: &Target,
        candidates: &[P::Candidate],
        probe: &P,
        observer: &dyn ProbeObserver<P::Candidate, P::Detail>,
    ) -> ScanSession<P::Candidate, P::Detail> {
        let started = Instant::now();
        let timeout = self.timeout;
        let target_str = target.as_str();

        tracing::debug!(
            probe = probe.name(),
            target = %target,
            candidates = candidates.len(),
            concurrency = self.concurrency,
            ?timeout,
            "Starting probe session"
        );
        observer.on_start(target_str, candidates.len());

        let executor = OrderedExecutor::new(self.concurrency);
        let results = executor
            .execute(
                candidates.iter().cloned(),
                |candidate| async move {
                    let attempt =
                        tokio::time::timeout(timeout, probe.probe(target_str, &candidate, timeout))
                            .await;
                    match attempt {
                        Ok(result) => result,
                        Err(_elapsed) => ProbeResult::Errored {
                            candidate,
                            cause: TransportError::Timeout(timeout),
                        },
                    }
                },
                |_, result| observer.on_event(result),
            )
            .await;

        let mut session = ScanSession {
            target: target.clone(),
            hits: Vec::new(),
            probed: results.len(),
            misses: 0,
            errors: 0,
            elapsed: Duration::ZERO,
        };

        for result in results {
            match result {
                ProbeResult::Hit { candidate, detail } => {
                    tracing::debug!(probe = probe.name(), %candidate, %detail, "hit");
                    session.hits.push(Hit { candidate, detail });
                }
                ProbeResult::Miss { candidate } => {
                    tracing::debug!(probe = probe.name(), %candidate, "miss");
                    session.misses += 1;
                }
                ProbeResult::Errored { candidate, cause } => {
                    tracing::debug!(probe = probe.name(), %candidate, error = %cause, "errored");
                    session.errors += 1;
                }
            }
        }

        session.elapsed = started.elapsed();
        tracing::info!(
            probe = probe.name(),
            target = %target,
            probed = session.probed,
            hits = session.hits.len(),
            misses = session.misses,
            errors = session.errors,
            elapsed_ms = session.elapsed.as_millis() as u64,
            "Probe session finished"
        );
        session
    }
}
