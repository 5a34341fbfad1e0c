//! Shared HTTP plumbing
//!
//! Wraps a `reqwest::Client` with one backend's base URL and call deadline.
//! The REST, SOAP, GraphQL and workflow adapters are all built on it.

use std::time::Duration;

use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use core_kernel::{bounded_call, AdapterConfig, AdapterError};

use crate::error::ProtocolError;

/// One configured HTTP backend
#[derive(Debug, Clone)]
pub struct HttpEndpoint {
    client: reqwest::Client,
    base: Url,
    timeout: Duration,
}

impl HttpEndpoint {
    /// Creates the endpoint from adapter configuration
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidEndpoint`] if the endpoint is not an
    /// absolute http(s) URL or the client cannot be built.
    pub fn new(config: &AdapterConfig) -> Result<Self, ProtocolError> {
        let base = Url::parse(config.base_url())
            .map_err(|e| ProtocolError::invalid_endpoint(&config.endpoint, e))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(ProtocolError::invalid_endpoint(
                &config.endpoint,
                "expected an http(s) URL",
            ));
        }

        let timeout = config.timeout();
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(|e| ProtocolError::invalid_endpoint(&config.endpoint, e))?;

        Ok(Self {
            client,
            base,
            timeout,
        })
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Base URL extended with percent-encoded path segments
    pub fn url(&self, segments: &[&str]) -> Result<Url, ProtocolError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ProtocolError::invalid_endpoint(self.base.as_str(), "cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends a request, mapping a failed exchange to [`ProtocolError::Http`]
    pub async fn send(&self, operation: &str, request: RequestBuilder) -> Result<Response, ProtocolError> {
        debug!(operation, "sending request");
        let response = request
            .send()
            .await
            .map_err(|e| ProtocolError::http(operation, e))?;
        debug!(operation, status = response.status().as_u16(), "response received");
        Ok(response)
    }

    /// Runs a JSON exchange under the call deadline
    ///
    /// Non-2xx answers become [`ProtocolError::Status`] carrying the body.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<T, AdapterError> {
        bounded_call(operation, self.timeout, async {
            let response = self.send(operation, request).await?;
            let response = expect_success(response).await?;
            Ok(read_json(operation, response).await?)
        })
        .await
    }

    /// Runs an exchange whose success body is ignored
    pub async fn call_empty(&self, operation: &str, request: RequestBuilder) -> Result<(), AdapterError> {
        bounded_call(operation, self.timeout, async {
            let response = self.send(operation, request).await?;
            expect_success(response).await?;
            Ok(())
        })
        .await
    }
}

/// Passes 2xx responses through; anything else becomes [`ProtocolError::Status`]
pub async fn expect_success(response: Response) -> Result<Response, ProtocolError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ProtocolError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Decodes a JSON body
pub async fn read_json<T: DeserializeOwned>(operation: &str, response: Response) -> Result<T, ProtocolError> {
    let body = response
        .text()
        .await
        .map_err(|e| ProtocolError::http(operation, e))?;
    serde_json::from_str(&body)
        .map_err(|e| ProtocolError::Malformed(format!("{operation}: {e}")))
}
