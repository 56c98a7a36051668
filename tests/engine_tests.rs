use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use recon_kit::output::CollectingObserver;
use recon_kit::probe::tcp_connect::{service_name, OpenPort};
use recon_kit::probe::{HitDetail, NoopObserver, Outcome, Probe, ProbeEngine, ProbeResult};
use recon_kit::{Target, TransportError};

#[derive(Debug, Clone, PartialEq)]
struct Tag(String);

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl HitDetail for Tag {}

/// Records every call; hits multiples of three after a jittered delay.
#[derive(Default)]
struct CountingProbe {
    calls: Mutex<Vec<u32>>,
}

#[async_trait]
impl Probe for CountingProbe {
    type Candidate = u32;
    type Detail = Tag;

    fn name(&self) -> &'static str {
        "counting"
    }

    async fn probe(&self, _target: &str, n: &u32, _timeout: Duration) -> ProbeResult<u32, Tag> {
        self.calls.lock().push(*n);
        tokio::time::sleep(Duration::from_millis(((n * 7) % 5) as u64)).await;
        if n % 3 == 0 {
            ProbeResult::Hit { candidate: *n, detail: Tag(format!("hit {}", n)) }
        } else {
            ProbeResult::Miss { candidate: *n }
        }
    }
}

struct UnreachableProbe;

#[async_trait]
impl Probe for UnreachableProbe {
    type Candidate = u16;
    type Detail = OpenPort;

    fn name(&self) -> &'static str {
        "unreachable"
    }

    async fn probe(&self, _target: &str, port: &u16, _timeout: Duration) -> ProbeResult<u16, OpenPort> {
        ProbeResult::Errored { candidate: *port, cause: TransportError::Connect("network unreachable".into()) }
    }
}

struct HangingProbe;

#[async_trait]
impl Probe for HangingProbe {
    type Candidate = u16;
    type Detail = OpenPort;

    fn name(&self) -> &'static str {
        "hanging"
    }

    async fn probe(&self, _target: &str, port: &u16, _timeout: Duration) -> ProbeResult<u16, OpenPort> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        ProbeResult::Hit { candidate: *port, detail: OpenPort { port: *port, service: service_name(*port) } }
    }
}

/// Only the listed ports accept connections.
struct MockPortProbe {
    open: Vec<u16>,
}

#[async_trait]
impl Probe for MockPortProbe {
    type Candidate = u16;
    type Detail = OpenPort;

    fn name(&self) -> &'static str {
        "mock-ports"
    }

    async fn probe(&self, _target: &str, port: &u16, _timeout: Duration) -> ProbeResult<u16, OpenPort> {
        if self.open.contains(port) {
            ProbeResult::Hit { candidate: *port, detail: OpenPort { port: *port, service: service_name(*port) } }
        } else {
            ProbeResult::Miss { candidate: *port }
        }
    }
}

fn target() -> Target {
    Target::parse("10.0.0.1").unwrap()
}

#[tokio::test]
async fn every_candidate_is_probed_exactly_once() {
    let candidates: Vec<u32> = (1..=40).collect();
    let probe = CountingProbe::default();
    let engine = ProbeEngine::new(Duration::from_secs(1), 8);

    let session = engine.run(&target(), &candidates, &probe, &NoopObserver).await;

    let mut calls = probe.calls.lock().clone();
    assert_eq!(calls.len(), candidates.len());
    calls.sort();
    assert_eq!(calls, candidates);
    assert_eq!(session.probed, candidates.len());
}

#[tokio::test]
async fn hits_keep_candidate_order_under_concurrency() {
    let candidates: Vec<u32> = vec![30, 1, 27, 9, 4, 12, 3, 8, 6, 21];
    let probe = CountingProbe::default();
    let engine = ProbeEngine::new(Duration::from_secs(1), 5);

    let session = engine.run(&target(), &candidates, &probe, &NoopObserver).await;

    let hits: Vec<u32> = session.hits.iter().map(|h| h.candidate).collect();
    let expected: Vec<u32> = candidates.iter().copied().filter(|n| n % 3 == 0).collect();
    assert_eq!(hits, expected);
}

#[tokio::test]
async fn observer_sees_one_event_per_candidate() {
    let candidates: Vec<u32> = (0..12).collect();
    let observer: CollectingObserver<u32, Tag> = CollectingObserver::new();
    let engine = ProbeEngine::new(Duration::from_secs(1), 3);

    engine.run(&target(), &candidates, &CountingProbe::default(), &observer).await;

    let mut seen: Vec<u32> = observer.events().iter().map(|e| *e.candidate()).collect();
    seen.sort();
    assert_eq!(seen, candidates);
    assert_eq!(observer.count(Outcome::Hit), 4);
    assert_eq!(observer.count(Outcome::Miss), 8);
}

#[tokio::test]
async fn unreachable_target_never_hits() {
    let engine = ProbeEngine::new(Duration::from_millis(200), 4);
    for _ in 0..3 {
        let session = engine.run(&target(), &[21, 22, 80, 443], &UnreachableProbe, &NoopObserver).await;
        assert!(session.is_empty());
        assert_eq!(session.errors, 4);
    }
}

#[tokio::test]
async fn slow_probe_is_cut_off_at_timeout() {
    let timeout = Duration::from_millis(50);
    let engine = ProbeEngine::sequential(timeout);
    let observer: CollectingObserver<u16, OpenPort> = CollectingObserver::new();
    let started = Instant::now();

    let session = engine.run(&target(), &[1, 2, 3], &HangingProbe, &observer).await;

    assert!(started.elapsed() < Duration::from_secs(3));
    assert!(session.is_empty());
    assert_eq!(session.errors, 3);
    assert!(observer.events().iter().all(|e| matches!(
        e,
        ProbeResult::Errored { cause: TransportError::Timeout(t), .. } if *t == timeout
    )));
}

#[tokio::test]
async fn port_scan_reports_open_ports_with_services() {
    let probe = MockPortProbe { open: vec![22, 80] };
    let engine = ProbeEngine::sequential(Duration::from_secs(1));

    let session = engine.run(&target(), &[21, 22, 23, 80], &probe, &NoopObserver).await;

    let hits: Vec<(u16, &str)> = session.hits.iter().map(|h| (h.candidate, h.detail.service)).collect();
    assert_eq!(hits, vec![(22, "SSH"), (80, "HTTP")]);
    assert_eq!(session.misses, 2);
}
