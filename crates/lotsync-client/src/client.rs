//! HTTP client for the occupancy backend's `getLotCount` endpoint.
//!
//! Wraps `reqwest` with the backend's API-key header and maps HTTP failures
//! onto [`FetchError`]. The body is returned as raw JSON; shape handling is
//! the normalizer's job.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use crate::error::FetchError;

const LOT_COUNT_PATH: &str = "getLotCount";

/// Anything the poll scheduler can pull a raw occupancy body from.
///
/// [`LotClient`] is the production source; tests substitute scripted ones.
pub trait LotSource: Send + Sync + 'static {
    fn fetch_lots(&self) -> impl Future<Output = Result<serde_json::Value, FetchError>> + Send;
}

/// Client for the occupancy backend.
pub struct LotClient {
    client: Client,
    api_key: String,
    endpoint: Url,
}

impl LotClient {
    /// Creates a client for `<base_url>/getLotCount`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Network`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`FetchError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn new(
        base_url: &str,
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise to exactly one trailing slash so the join appends the
        // endpoint instead of replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .and_then(|base| base.join(LOT_COUNT_PATH))
            .map_err(|e| FetchError::InvalidBaseUrl {
                base_url: base_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
        })
    }

    /// Creates a client from the loaded application config.
    ///
    /// # Errors
    ///
    /// See [`LotClient::new`].
    pub fn from_app_config(config: &lotsync_core::AppConfig) -> Result<Self, FetchError> {
        Self::new(
            &config.api_base_url,
            &config.api_key,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetches the current occupancy body.
    ///
    /// Performs exactly one request; retrying is left to the next poll.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Unauthorized`] on HTTP 401.
    /// - [`FetchError::FetchFailed`] on any other non-2xx status.
    /// - [`FetchError::Network`] on transport failure.
    /// - [`FetchError::Deserialize`] if a 2xx body is not JSON.
    pub async fn get_lot_count(&self) -> Result<serde_json::Value, FetchError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .header("X-API-Key", &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(FetchError::Unauthorized);
        }
        if !status.is_success() {
            return Err(FetchError::FetchFailed {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| FetchError::Deserialize {
            context: self.endpoint.to_string(),
            source: e,
        })
    }
}

impl LotSource for LotClient {
    async fn fetch_lots(&self) -> Result<serde_json::Value, FetchError> {
        self.get_lot_count().await
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
