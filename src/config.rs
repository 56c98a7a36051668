use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::http_client::DEFAULT_USER_AGENT;

pub const DEFAULT_GEO_ENDPOINT: &str = "http://ip-api.com/json/";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Per-probe budget for TCP connects and subdomain resolution.
    pub timeout_ms: u64,
    /// Per-request budget for directory probing and fingerprinting.
    pub http_timeout_ms: u64,
    /// Budget for one-shot WHOIS / geolocation / DNS record lookups.
    pub lookup_timeout_ms: u64,
    /// Probes in flight at once. 1 keeps the strictly sequential behaviour.
    pub concurrency: usize,
    pub geo_endpoint: String,
    /// Skip the IANA referral and ask this server directly.
    pub whois_server: Option<String>,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_ms: 1000,
            http_timeout_ms: 5000,
            lookup_timeout_ms: 10_000,
            concurrency: 16,
            geo_endpoint: DEFAULT_GEO_ENDPOINT.to_string(),
            whois_server: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("timeout_ms", self.timeout_ms),
            ("http_timeout_ms", self.http_timeout_ms),
            ("lookup_timeout_ms", self.lookup_timeout_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid { field, reason: "must be greater than zero".into() });
            }
        }
        if self.concurrency == 0 {
            return Err(ConfigError::Invalid {
                field: "concurrency",
                reason: "must be greater than zero".into(),
            });
        }
        if url::Url::parse(&self.geo_endpoint).is_err() {
            return Err(ConfigError::Invalid {
                field: "geo_endpoint",
                reason: format!("not a URL: {}", self.geo_endpoint),
            });
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}
