use crate::config::Config;
use crate::error::Result;
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Supplier API version pinned for every outbound call.
const API_VERSION: &str = "2025-01";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client for the third-party dispatch supplier.
///
/// Never raises on a non-2xx status; each handler interprets the raw
/// status and body for its own endpoint. Only network-level failures
/// (timeout, DNS, connection refused) surface as errors here.
pub struct SupplierClient {
    client: Client,
    base: Url,
}

#[derive(Debug)]
pub struct SupplierResponse {
    pub status: StatusCode,
    pub body: String,
}

impl SupplierResponse {
    /// Parses the body as JSON, tolerating empty or non-JSON bodies.
    pub fn json(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.body).ok()
    }
}

impl SupplierClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static("api_key"),
            HeaderValue::from_str(&config.api_key)
                .context("API_KEY contains characters not valid in an HTTP header")?,
        );
        headers.insert(
            HeaderName::from_static("version"),
            HeaderValue::from_static(API_VERSION),
        );

        let client = Client::builder()
            .user_agent("taxi-dispatch-proxy/0.1.0")
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base: config.end_point.clone(),
        })
    }

    pub async fn get(&self, segments: &[&str]) -> Result<SupplierResponse> {
        let url = self.url(segments);
        debug!(%url, "GET supplier");
        let response = self.client.get(url).send().await?;
        Self::read(response).await
    }

    pub async fn post<T: Serialize>(&self, segments: &[&str], body: &T) -> Result<SupplierResponse> {
        let url = self.url(segments);
        debug!(%url, "POST supplier");
        let response = self.client.post(url).json(body).send().await?;
        Self::read(response).await
    }

    pub async fn put<T: Serialize>(&self, segments: &[&str], body: &T) -> Result<SupplierResponse> {
        let url = self.url(segments);
        debug!(%url, "PUT supplier");
        let response = self.client.put(url).json(body).send().await?;
        Self::read(response).await
    }

    /// Appends percent-encoded path segments to the configured base URL.
    /// Booking references and vehicle registrations may contain reserved
    /// characters, so each lands in the path as a single encoded segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn read(response: reqwest::Response) -> Result<SupplierResponse> {
        let status = response.status();
        let body = response.text().await?;
        debug!(%status, bytes = body.len(), "supplier response");
        Ok(SupplierResponse { status, body })
    }
}
