use reqwest::{Client, ClientBuilder};
use std::time::Duration;

use crate::error::TransportError;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Redirect handling for a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirects {
    /// Report the first response as-is. Used for path probing.
    None,
    /// Follow up to five hops. Used for fingerprinting and API lookups.
    Follow,
}

/// Build a client for probing. The timeout is per request.
pub fn create_probe_client(
    timeout: Duration,
    user_agent: &str,
    redirects: Redirects,
) -> Result<Client, TransportError> {
    let policy = match redirects {
        Redirects::None => reqwest::redirect::Policy::none(),
        Redirects::Follow => reqwest::redirect::Policy::limited(5),
    };

    ClientBuilder::new()
        .tcp_nodelay(true)
        // Timeouts
        .timeout(timeout)
        .connect_timeout(timeout)
        // Compression
        .gzip(true)
        .brotli(true)
        // TLS
        .use_rustls_tls()
        .https_only(false)
        // Targets are frequently self-signed
        .danger_accept_invalid_certs(true)
        .redirect(policy)
        .user_agent(user_agent)
        .build()
        .map_err(|e| TransportError::Http(format!("failed to build HTTP client: {}", e)))
}
