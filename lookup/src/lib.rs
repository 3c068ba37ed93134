//! HTTP client for the upstream Lookup Service.
//!
//! One query in, one parsed [`eagle_core::UpstreamEnvelope`] out. The call
//! is a single attempt with a bounded timeout; failures are normal outcomes
//! for the caller (the dispatcher refunds the spent credit), never retried
//! here.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod client;

pub use client::{LookupClient, LookupError, LookupOptions};
