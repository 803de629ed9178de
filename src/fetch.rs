//! Network seam.
//!
//! Strategies, install, and precache all reach the network through the
//! [`Fetcher`] trait so tests can substitute doubles and hosts can share
//! an HTTP client. [`HttpFetcher`] is the default reqwest-backed
//! implementation.

use std::time::Duration;

use async_trait::async_trait;

use crate::types::{InterceptedRequest, ResponseSnapshot};
use crate::{MuninnError, Result};

/// Issues real network requests on behalf of the engine.
///
/// Transport failures are `Err`; an HTTP response of any status is `Ok`
/// with the status captured in the snapshot. Callers decide what a
/// non-success status means for their strategy.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Perform the request and capture the response.
    async fn fetch(&self, request: &InterceptedRequest) -> Result<ResponseSnapshot>;
}

/// Default [`Fetcher`] over a shared `reqwest::Client`.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher with its own client and the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MuninnError::Http(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wrap an existing client, e.g. one shared with the host.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &InterceptedRequest) -> Result<ResponseSnapshot> {
        let method = reqwest::Method::from_bytes(request.method().as_bytes())
            .map_err(|_| MuninnError::InvalidInput(format!("bad method: {}", request.method())))?;

        let mut outbound = self.client.request(method, request.url().clone());
        for (name, value) in request.headers() {
            outbound = outbound.header(name, value);
        }

        let response = outbound
            .send()
            .await
            .map_err(|e| MuninnError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| MuninnError::Http(e.to_string()))?
            .to_vec();

        Ok(ResponseSnapshot::new(status, headers, body))
    }
}
