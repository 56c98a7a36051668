use std::fmt;

use url::Url;

use crate::error::InputError;

/// A validated, trimmed target string. Never mutated once a scan starts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target(String);

impl Target {
    /// Reject blank input before anything touches the network.
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InputError::EmptyTarget);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(InputError::Invalid {
                target: trimmed.to_string(),
                reason: "contains whitespace".to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Host part for host-shaped probes. A URL is reduced to its host,
    /// anything else is returned as given.
    pub fn host(&self) -> String {
        host_of(&self.0)
    }

    /// URL form for HTTP probes.
    pub fn url(&self) -> Result<String, InputError> {
        let url = normalize_url(&self.0);
        Url::parse(&url).map_err(|e| InputError::Invalid {
            target: self.0.clone(),
            reason: e.to_string(),
        })?;
        Ok(url)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Target {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Prefix `http://` when the string carries no http(s) scheme. Never upgrades to https.
pub fn normalize_url(raw: &str) -> String {
    if has_http_scheme(raw) {
        raw.to_string()
    } else {
        format!("http://{}", raw)
    }
}

fn has_http_scheme(raw: &str) -> bool {
    let lower = raw.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// `base` without trailing slashes, then `/word`.
pub fn join_path(base: &str, word: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), word)
}

/// Host of a URL-shaped string; plain hosts and IP literals pass through.
pub fn host_of(raw: &str) -> String {
    if has_http_scheme(raw) {
        match Url::parse(raw) {
            Ok(u) => u
                .host_str()
                .map(|h| h.trim_start_matches('[').trim_end_matches(']').to_string())
                .unwrap_or_else(|| raw.to_string()),
            Err(_) => raw.to_string(),
        }
    } else {
        raw.trim_end_matches('/').to_string()
    }
}
