//! delivery::traits
//!
//! Transport trait and delivery result types.
//!
//! # Design
//!
//! The `Transport` trait is async because delivery is network I/O. A
//! transport performs exactly one POST per call; deadlines, fan-out and
//! result collection belong to the [`Dispatcher`](super::Dispatcher).
//!
//! Delivery failures are values, never process errors: a receiver being
//! down must not fail the push that triggered the hook.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use thiserror::Error;

use crate::event::payload::FormBody;

/// Errors from a single delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The endpoint could not be reached.
    #[error("connection failed: {0}")]
    Connect(String),

    /// No response within the deadline.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The endpoint answered with a non-2xx status.
    #[error("endpoint returned HTTP {code}")]
    Status {
        /// HTTP status code
        code: u16,
    },

    /// Any other request failure.
    #[error("request failed: {0}")]
    Request(String),
}

/// One configured webhook endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryTarget {
    pub endpoint: Url,
}

impl DeliveryTarget {
    pub fn new(endpoint: Url) -> Self {
        Self { endpoint }
    }
}

impl fmt::Display for DeliveryTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.endpoint)
    }
}

/// Outcome of delivering to one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Accepted with the given 2xx status.
    Delivered(u16),
    /// Not delivered.
    Failed(DeliveryError),
}

/// Per-target delivery result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryResult {
    pub target: DeliveryTarget,
    pub outcome: DeliveryOutcome,
}

impl DeliveryResult {
    pub fn is_delivered(&self) -> bool {
        matches!(self.outcome, DeliveryOutcome::Delivered(_))
    }
}

/// A way of POSTing a form body to an endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` to `endpoint`.
    ///
    /// Returns the HTTP status on a 2xx response.
    ///
    /// # Errors
    ///
    /// Returns a [`DeliveryError`] for connection failures, timeouts and
    /// non-2xx responses.
    async fn post(&self, endpoint: &Url, body: &FormBody) -> Result<u16, DeliveryError>;
}
