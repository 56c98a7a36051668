mod common;

use std::time::Duration;

use common::{spawn_http, MockResponse};
use recon_kit::http_client::{create_probe_client, Redirects, DEFAULT_USER_AGENT};
use recon_kit::output::CollectingObserver;
use recon_kit::probe::http_probe::{DirectoryProbe, PathHit, PathStatus};
use recon_kit::probe::{NoopObserver, Outcome, ProbeEngine};
use recon_kit::Target;

fn probe() -> DirectoryProbe {
    let client = create_probe_client(Duration::from_secs(2), DEFAULT_USER_AGENT, Redirects::None).unwrap();
    DirectoryProbe::new(client)
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

async fn site() -> std::net::SocketAddr {
    spawn_http(|path| match path {
        "/admin" => MockResponse::status(200).body("admin panel"),
        "/secure" => MockResponse::status(403),
        "/moved" => MockResponse::status(302).header("Location", "/admin"),
        _ => MockResponse::status(404),
    })
    .await
}

#[tokio::test]
async fn found_and_forbidden_paths_are_hits() {
    let addr = site().await;
    // no scheme and a trailing slash on purpose
    let target = Target::parse(&format!("127.0.0.1:{}/", addr.port())).unwrap();
    let engine = ProbeEngine::sequential(Duration::from_secs(2));

    let session = engine
        .run(&target, &words(&["admin", "secure", "missing"]), &probe(), &NoopObserver)
        .await;

    let hits: Vec<(String, PathStatus)> =
        session.hits.iter().map(|h| (h.candidate.clone(), h.detail.status)).collect();
    assert_eq!(
        hits,
        vec![("admin".to_string(), PathStatus::Found), ("secure".to_string(), PathStatus::Forbidden)]
    );
    assert_eq!(session.hits[0].detail.status.tag(), "found");
    assert_eq!(session.hits[1].detail.status.tag(), "forbidden");
    assert_eq!(
        session.hits[0].detail,
        PathHit { url: format!("http://127.0.0.1:{}/admin", addr.port()), status: PathStatus::Found }
    );
    assert_eq!(session.misses, 1);
}

#[tokio::test]
async fn redirects_are_not_followed() {
    let addr = site().await;
    let target = Target::parse(&format!("http://127.0.0.1:{}", addr.port())).unwrap();
    let engine = ProbeEngine::sequential(Duration::from_secs(2));

    let session = engine.run(&target, &words(&["moved"]), &probe(), &NoopObserver).await;

    assert!(session.is_empty());
    assert_eq!(session.misses, 1);
}

#[tokio::test]
async fn dead_server_is_errored_not_fatal() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let target = Target::parse(&format!("127.0.0.1:{}", port)).unwrap();
    let engine = ProbeEngine::new(Duration::from_secs(2), 2);
    let observer: CollectingObserver<String, PathHit> = CollectingObserver::new();

    let session = engine.run(&target, &words(&["admin", "login"]), &probe(), &observer).await;

    assert!(session.is_empty());
    assert_eq!(session.probed, 2);
    assert_eq!(observer.count(Outcome::Errored), 2);
}
