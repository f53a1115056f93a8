use crate::Value;
use serde::Deserialize;
use std::time::Duration;

/// Header carrying the configured tenant identity on every upstream request.
const TENANT_HEADER: &str = "X-Tenant";

/// One reading returned by the sensor API.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Reading {
    /// The observed value.
    pub value: Value,
}

/// Client for the remote occupancy sensor API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct SensorClient {
    http: reqwest::Client,
    url: String,
    tenant: String,
}

impl SensorClient {
    /// Builds a client with the request timeout baked in.
    ///
    /// The timeout bounds every fetch so that a stalled upstream cannot
    /// delay subsequent poll cycles indefinitely.
    ///
    /// # Errors
    ///
    /// Returns error if the underlying client cannot be constructed.
    pub fn new(url: &str, tenant: &str, timeout: Duration) -> crate::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            url: url.to_string(),
            tenant: tenant.to_string(),
        })
    }

    async fn get(&self) -> crate::Result<reqwest::Response> {
        Ok(self
            .http
            .get(&self.url)
            .header(TENANT_HEADER, &self.tenant)
            .send()
            .await?
            .error_for_status()?)
    }

    /// Fetches and decodes one reading.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, times out, answers with a
    /// non-success status or the payload cannot be decoded.
    pub async fn fetch(&self) -> crate::Result<Reading> {
        Ok(self.get().await?.json().await?)
    }

    /// Fetches the raw JSON payload without decoding it, for passthrough
    /// reads. No state is persisted.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, times out or answers with a
    /// non-success status.
    pub async fn fetch_raw(&self) -> crate::Result<serde_json::Value> {
        Ok(self.get().await?.json().await?)
    }
}
