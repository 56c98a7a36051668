use std::time::Duration;

use recon_kit::probe::tcp_connect::TcpConnectProbe;
use recon_kit::probe::{NoopObserver, ProbeEngine};
use recon_kit::Target;
use tokio::net::TcpListener;

async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

#[tokio::test]
async fn only_listening_ports_are_reported_in_order() {
    let first = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let second = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let open_a = first.local_addr().unwrap().port();
    let open_b = second.local_addr().unwrap().port();
    let closed_a = closed_port().await;
    let closed_b = closed_port().await;

    let candidates = vec![closed_a, open_a, closed_b, open_b];
    let target = Target::parse("127.0.0.1").unwrap();
    let engine = ProbeEngine::new(Duration::from_secs(1), 4);

    let session = engine.run(&target, &candidates, &TcpConnectProbe, &NoopObserver).await;

    let open: Vec<u16> = session.hits.iter().map(|h| h.candidate).collect();
    assert_eq!(open, vec![open_a, open_b]);
    assert_eq!(session.probed, 4);
}

#[tokio::test]
async fn scanning_a_url_target_uses_its_host() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let target = Target::parse("http://127.0.0.1/index.html").unwrap();
    let host = Target::parse(&target.host()).unwrap();
    let engine = ProbeEngine::sequential(Duration::from_secs(1));

    let session = engine.run(&host, &[port], &TcpConnectProbe, &NoopObserver).await;
    assert_eq!(session.hits.len(), 1);
}
