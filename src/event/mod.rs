//! event
//!
//! Turning resolved commits into the payload receivers see.
//!
//! # Modules
//!
//! - [`builder`] - Commit + changes → [`CommitEvent`](crate::core::event::CommitEvent)
//! - [`assembler`] - Ref update + repository + commit events → [`PushEvent`](crate::core::event::PushEvent)
//! - [`payload`] - JSON document and form-encoded request body
//!
//! Every function here is pure: values in, values out.

pub mod assembler;
pub mod builder;
pub mod payload;

pub use assembler::{assemble, describe_repository};
pub use builder::build_commit_event;
pub use payload::{decode_form, FormBody, PayloadError, PushPayload};
