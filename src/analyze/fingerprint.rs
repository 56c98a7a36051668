use std::collections::HashMap;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;

use crate::error::{LookupError, TransportError};
use crate::target::Target;

/// Technology name and the substrings that betray it. Indicators are lowercase
/// and matched against the lowercased body and header lines.
pub const TECHNOLOGIES: &[(&str, &[&str])] = &[
    ("WordPress", &["wp-content", "wp-includes", "/wp-"]),
    ("jQuery", &["jquery", "jquery.min.js"]),
    ("Bootstrap", &["bootstrap", "bootstrap.min.css"]),
    ("React", &["react", "_react", "react-dom"]),
    ("Angular", &["angular", "ng-", "angular.min.js"]),
    ("Vue.js", &["vue", "vue.min.js", "__vue__"]),
    ("PHP", &["<?php", ".php", "x-powered-by: php"]),
    ("ASP.NET", &["aspnet", "__viewstate", "asp.net"]),
    ("Django", &["djangoproject", "django", "csrfmiddlewaretoken"]),
    ("Laravel", &["laravel", "laravel_session"]),
];

static PRODUCT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z][A-Za-z0-9_.\-]*)(?:/([0-9][A-Za-z0-9_.\-]*))?").expect("static regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    pub version: Option<String>,
}

/// `Apache/2.4.41 (Ubuntu)` -> `Apache` + `2.4.41`.
pub fn parse_product(header: &str) -> Option<Product> {
    let caps = PRODUCT_RE.captures(header)?;
    Some(Product {
        name: caps.get(1)?.as_str().to_string(),
        version: caps.get(2).map(|m| m.as_str().to_string()),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TechnologyFingerprint {
    pub server: Option<String>,
    pub powered_by: Option<String>,
    pub content_type: Option<String>,
    /// Table matches, in table order.
    pub technologies: Vec<String>,
    /// Product/version pairs read from `Server` and `X-Powered-By`.
    pub products: Vec<Product>,
}

impl TechnologyFingerprint {
    /// `headers` keys must be lowercase.
    pub fn analyze(headers: &HashMap<String, String>, body: &str) -> Self {
        let body = body.to_lowercase();
        let mut header_lines: Vec<String> = headers
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v).to_lowercase())
            .collect();
        header_lines.sort();
        let header_text = header_lines.join("\n");

        let technologies = TECHNOLOGIES
            .iter()
            .filter(|(_, indicators)| {
                indicators
                    .iter()
                    .any(|needle| body.contains(needle) || header_text.contains(needle))
            })
            .map(|(name, _)| name.to_string())
            .collect();

        let server = headers.get("server").cloned();
        let powered_by = headers.get("x-powered-by").cloned();
        let products = [&server, &powered_by]
            .into_iter()
            .flatten()
            .filter_map(|value| parse_product(value))
            .collect();

        TechnologyFingerprint {
            server,
            powered_by,
            content_type: headers.get("content-type").cloned(),
            technologies,
            products,
        }
    }

    pub fn header_fields(&self) -> Vec<(&'static str, String)> {
        let or_unknown = |v: &Option<String>| v.clone().unwrap_or_else(|| "Unknown".to_string());
        vec![
            ("Server", or_unknown(&self.server)),
            ("X-Powered-By", or_unknown(&self.powered_by)),
            ("Content-Type", or_unknown(&self.content_type)),
        ]
    }
}

/// Result of one fingerprint request. A failed request still yields an
/// (empty) fingerprint alongside the error.
#[derive(Debug)]
pub struct FingerprintReport {
    pub url: String,
    pub fingerprint: TechnologyFingerprint,
    pub error: Option<LookupError>,
}

pub struct TechDetector {
    client: Client,
    timeout: Duration,
}

impl TechDetector {
    /// `client` should follow redirects.
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub async fn detect(&self, target: &Target) -> FingerprintReport {
        let url = match target.url() {
            Ok(url) => url,
            Err(e) => {
                return FingerprintReport {
                    url: target.to_string(),
                    fingerprint: TechnologyFingerprint::default(),
                    error: Some(e.into()),
                }
            }
        };

        match self.fetch(&url).await {
            Ok((headers, body)) => FingerprintReport {
                fingerprint: TechnologyFingerprint::analyze(&headers, &body),
                url,
                error: None,
            },
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Fingerprint request failed");
                FingerprintReport { url, fingerprint: TechnologyFingerprint::default(), error: Some(e.into()) }
            }
        }
    }

    async fn fetch(&self, url: &str) -> Result<(HashMap<String, String>, String), TransportError> {
        let resp = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(e, self.timeout))?;

        let mut headers = HashMap::new();
        for (name, value) in resp.headers() {
            if let Ok(value) = value.to_str() {
                headers
                    .entry(name.as_str().to_lowercase())
                    .and_modify(|existing: &mut String| {
                        existing.push_str(", ");
                        existing.push_str(value);
                    })
                    .or_insert_with(|| value.to_string());
            }
        }

        let body = resp.text().await.map_err(|e| TransportError::from_reqwest(e, self.timeout))?;
        Ok((headers, body))
    }
}
