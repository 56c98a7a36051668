use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{LookupError, TransportError};
use crate::target::Target;

/// ip-api.com style answer. Every field but `status` may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoLocation {
    pub status: String,
    pub message: Option<String>,
    pub query: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub region_name: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub timezone: Option<String>,
    pub isp: Option<String>,
    pub org: Option<String>,
    #[serde(rename = "as")]
    pub asn: Option<String>,
}

impl GeoLocation {
    /// A non-`success` status is a reportable failure, not a transport error.
    pub fn into_result(self) -> Result<Self, LookupError> {
        if self.status == "success" {
            Ok(self)
        } else {
            Err(LookupError::Negative {
                service: "geolocation",
                message: self.message.unwrap_or_else(|| "failed to get location".to_string()),
            })
        }
    }

    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let text = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_string());
        let coord = |v: Option<f64>| v.map(|c| c.to_string()).unwrap_or_else(|| "N/A".to_string());
        vec![
            ("IP Address", text(&self.query)),
            ("Country", text(&self.country)),
            ("Region", text(&self.region_name)),
            ("City", text(&self.city)),
            ("ISP", text(&self.isp)),
            ("Organization", text(&self.org)),
            ("AS", text(&self.asn)),
            ("Timezone", text(&self.timezone)),
            ("Latitude", coord(self.lat)),
            ("Longitude", coord(self.lon)),
        ]
    }
}

pub struct GeoLocator {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl GeoLocator {
    /// `endpoint` is the URL prefix the address is appended to.
    pub fn new(client: Client, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self { client, endpoint: endpoint.into(), timeout }
    }

    pub fn url_for(&self, host: &str) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), host)
    }

    pub async fn locate(&self, target: &Target) -> Result<GeoLocation, LookupError> {
        let url = self.url_for(&target.host());
        tracing::debug!(url = %url, "Querying geolocation API");

        let resp = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(e, self.timeout))?;

        let location: GeoLocation = resp
            .json()
            .await
            .map_err(|e| TransportError::Malformed(e.to_string()))?;

        location.into_result()
    }
}
