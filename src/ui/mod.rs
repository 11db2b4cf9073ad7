//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Verbosity-aware printing and the delivery report
//!
//! # Design
//!
//! Diagnostics go through `tracing`; this module is only for what the
//! person pushing should read.

pub mod output;
