use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::info;

use crate::config::Config;
use crate::helpers::relay_error::RelayError;

const API_KEY_HEADER: &str = "Api-Key";

/// Status and body exactly as Smoobu sent them.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Value,
}

pub struct SmoobuClient {
    http_client: Client,
    api_url: String,
    api_key: Option<String>,
    property_id: Option<String>,
}

impl SmoobuClient {
    pub fn new(http_client: Client, config: &Config) -> Self {
        Self {
            http_client,
            api_url: config.smoobu_api_url.trim_end_matches('/').to_string(),
            api_key: config.smoobu_api_key.clone(),
            property_id: config.house_id.clone(),
        }
    }

    pub fn property_id(&self) -> Option<&str> {
        self.property_id.as_deref()
    }

    /// Posts the payload to `/reservations`. Smoobu's own error answers are not failures
    /// here, they are handed back like any other answer. An unset api key is not checked
    /// locally, the request goes out without it and Smoobu's refusal is relayed.
    pub async fn create_reservation(&self, payload: &Value) -> Result<UpstreamResponse, RelayError> {
        let url = format!("{}/reservations", self.api_url);

        let mut request = self.http_client.post(&url);
        if let Some(api_key) = self.api_key.as_deref() {
            request = request.header(API_KEY_HEADER, api_key);
        }

        let response = request
            .header(CACHE_CONTROL, "no-cache")
            .header(CONTENT_TYPE, "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|source| RelayError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        let body = response
            .json::<Value>()
            .await
            .map_err(|source| RelayError::InvalidJson {
                url: url.clone(),
                source,
            })?;

        info!("Smoobu answered reservation request with status {}", status);
        Ok(UpstreamResponse { status, body })
    }
}
