//! delivery::http
//!
//! HTTP transport using reqwest.
//!
//! Each POST carries the form body with an
//! `application/x-www-form-urlencoded` content type. The client is built
//! with a request timeout; the dispatcher enforces its own deadline on top,
//! so a transport that ignores timeouts still cannot stall a push.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Url};
use tracing::debug;

use super::traits::{DeliveryError, Transport};
use crate::event::payload::FormBody;

/// User-Agent header value for deliveries.
const USER_AGENT_VALUE: &str = concat!("pushrelay/", env!("CARGO_PKG_VERSION"));

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// HTTP client for making requests
    client: Client,
    /// Request timeout configured on the client
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError::Request` if the TLS backend cannot be
    /// initialised.
    pub fn new(timeout: Duration) -> Result<Self, DeliveryError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| DeliveryError::Request(e.to_string()))?;
        Ok(Self { client, timeout })
    }

    /// Map a reqwest error into a delivery error.
    fn map_error(&self, err: reqwest::Error) -> DeliveryError {
        if err.is_timeout() {
            DeliveryError::Timeout(self.timeout)
        } else if err.is_connect() {
            DeliveryError::Connect(err.to_string())
        } else {
            DeliveryError::Request(err.to_string())
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, endpoint: &Url, body: &FormBody) -> Result<u16, DeliveryError> {
        debug!(endpoint = %endpoint, bytes = body.len(), "posting payload");

        let response = self
            .client
            .post(endpoint.clone())
            .header(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE))
            .header(CONTENT_TYPE, HeaderValue::from_static(FormBody::CONTENT_TYPE))
            .body(body.as_str().to_owned())
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        if status.is_success() {
            Ok(status.as_u16())
        } else {
            Err(DeliveryError::Status {
                code: status.as_u16(),
            })
        }
    }
}
