//! delivery::mock
//!
//! Mock transport for deterministic testing.
//!
//! # Design
//!
//! The mock records every POST it receives and answers per endpoint: with a
//! status, an error, or after a delay. Unconfigured endpoints answer 200.
//!
//! # Example
//!
//! ```
//! use pushrelay::delivery::mock::{MockReply, MockTransport};
//! use pushrelay::delivery::{DeliveryError, Transport};
//! # use pushrelay::event::payload::FormBody;
//! # use pushrelay::core::event::{PushEvent, RepositoryDescriptor};
//! # use pushrelay::core::types::Oid;
//! # let event = PushEvent {
//! #     before: Oid::zero(),
//! #     after: Oid::zero(),
//! #     ref_name: "refs/heads/main".into(),
//! #     commits: vec![],
//! #     repository: RepositoryDescriptor {
//! #         name: "demo".into(),
//! #         url: "/demo".into(),
//! #         description: None,
//! #         owner: "demo".into(),
//! #         commit_url_template: RepositoryDescriptor::DEFAULT_COMMIT_URL.into(),
//! #     },
//! # };
//! # let body = FormBody::encode(&event).unwrap();
//!
//! # futures::executor::block_on(async {
//! let transport = MockTransport::new();
//! let down: reqwest::Url = "http://down.test/hook".parse().unwrap();
//! transport.reply(&down, MockReply::Fail(DeliveryError::Connect("refused".into())));
//!
//! let up: reqwest::Url = "http://up.test/hook".parse().unwrap();
//! assert_eq!(transport.post(&up, &body).await, Ok(200));
//! assert!(transport.post(&down, &body).await.is_err());
//! assert_eq!(transport.requests().len(), 2);
//! # });
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;

use super::traits::{DeliveryError, Transport};
use crate::event::payload::FormBody;

/// How the mock answers a given endpoint.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Answer with this HTTP status.
    Status(u16),
    /// Fail with this error.
    Fail(DeliveryError),
    /// Sleep, then answer 200.
    Delay(Duration),
}

/// A recorded POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockRequest {
    pub endpoint: Url,
    pub body: String,
}

/// Mock transport for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[derive(Debug, Default)]
struct MockTransportInner {
    replies: HashMap<Url, MockReply>,
    requests: Vec<MockRequest>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the reply for an endpoint.
    pub fn reply(&self, endpoint: &Url, reply: MockReply) {
        self.lock().replies.insert(endpoint.clone(), reply);
    }

    /// All requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<MockRequest> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockTransportInner> {
        // A panic while holding the lock only happens in a failing test.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(&self, endpoint: &Url, body: &FormBody) -> Result<u16, DeliveryError> {
        let reply = {
            let mut inner = self.lock();
            inner.requests.push(MockRequest {
                endpoint: endpoint.clone(),
                body: body.as_str().to_string(),
            });
            inner
                .replies
                .get(endpoint)
                .cloned()
                .unwrap_or(MockReply::Status(200))
        };

        match reply {
            MockReply::Status(code) if (200..300).contains(&code) => Ok(code),
            MockReply::Status(code) => Err(DeliveryError::Status { code }),
            MockReply::Fail(err) => Err(err),
            MockReply::Delay(duration) => {
                tokio::time::sleep(duration).await;
                Ok(200)
            }
        }
    }
}
