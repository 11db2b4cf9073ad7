//! delivery
//!
//! Webhook delivery to configured endpoints.
//!
//! # Architecture
//!
//! The [`Transport`] trait is the seam between fan-out logic and the wire.
//! The [`Dispatcher`] owns the target list and the per-attempt deadline and
//! works with any transport; production uses [`http::HttpTransport`], tests
//! use [`mock::MockTransport`] or a local HTTP server.
//!
//! # Modules
//!
//! - `traits`: `Transport` trait, targets and results
//! - [`http`]: reqwest implementation
//! - [`mock`]: in-memory implementation for deterministic testing
//! - `dispatcher`: concurrent fan-out with deadlines
//!
//! # Example
//!
//! ```ignore
//! use pushrelay::delivery::{Dispatcher, DeliveryTarget, http::HttpTransport};
//! use std::time::Duration;
//!
//! let transport = HttpTransport::new(Duration::from_secs(10))?;
//! let dispatcher = Dispatcher::new(
//!     Box::new(transport),
//!     vec![DeliveryTarget::new("https://ci.example.com/hook".parse()?)],
//!     Duration::from_secs(10),
//! );
//! for result in dispatcher.dispatch(&push_event).await? {
//!     println!("{}: {:?}", result.target, result.outcome);
//! }
//! ```

mod dispatcher;
pub mod http;
pub mod mock;
mod traits;

pub use dispatcher::Dispatcher;
pub use traits::{DeliveryError, DeliveryOutcome, DeliveryResult, DeliveryTarget, Transport};
