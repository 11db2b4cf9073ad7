//! delivery::dispatcher
//!
//! Fan-out of one push event to every configured target.
//!
//! The event is serialized once. Every target is then attempted
//! concurrently, each under its own deadline, and one result per target
//! comes back in target order. There is no retry: a failed delivery is
//! reported and forgotten.

use std::time::Duration;

use futures::future::join_all;
use tracing::{info, warn};

use super::traits::{DeliveryError, DeliveryOutcome, DeliveryResult, DeliveryTarget, Transport};
use crate::core::event::PushEvent;
use crate::event::payload::{FormBody, PayloadError};

/// Delivers push events to a fixed set of targets.
pub struct Dispatcher {
    transport: Box<dyn Transport>,
    targets: Vec<DeliveryTarget>,
    deadline: Duration,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("targets", &self.targets)
            .field("deadline", &self.deadline)
            .finish()
    }
}

impl Dispatcher {
    /// Create a dispatcher.
    ///
    /// `deadline` bounds each delivery attempt independently of whatever
    /// timeout the transport applies itself.
    pub fn new(
        transport: Box<dyn Transport>,
        targets: Vec<DeliveryTarget>,
        deadline: Duration,
    ) -> Self {
        Self {
            transport,
            targets,
            deadline,
        }
    }

    /// Serialize `event` and deliver it to every target.
    ///
    /// Returns one result per target, in target order. Individual failures
    /// are reported in the results, never as an error.
    ///
    /// # Errors
    ///
    /// Returns `PayloadError` only if the event cannot be serialized, in
    /// which case nothing is sent.
    pub async fn dispatch(&self, event: &PushEvent) -> Result<Vec<DeliveryResult>, PayloadError> {
        let body = FormBody::encode(event)?;
        Ok(self.deliver(&body).await)
    }

    /// Deliver an already-encoded body to every target.
    pub async fn deliver(&self, body: &FormBody) -> Vec<DeliveryResult> {
        let attempts = self.targets.iter().map(|target| self.attempt(target, body));
        join_all(attempts).await
    }

    /// One delivery attempt under the deadline.
    async fn attempt(&self, target: &DeliveryTarget, body: &FormBody) -> DeliveryResult {
        let sent = tokio::time::timeout(self.deadline, self.transport.post(&target.endpoint, body));

        let outcome = match sent.await {
            Ok(Ok(status)) => {
                info!(endpoint = %target.endpoint, status, "delivered");
                DeliveryOutcome::Delivered(status)
            }
            Ok(Err(err)) => {
                warn!(endpoint = %target.endpoint, error = %err, "delivery failed");
                DeliveryOutcome::Failed(err)
            }
            Err(_) => {
                warn!(endpoint = %target.endpoint, deadline = ?self.deadline, "delivery timed out");
                DeliveryOutcome::Failed(DeliveryError::Timeout(self.deadline))
            }
        };

        DeliveryResult {
            target: target.clone(),
            outcome,
        }
    }
}
