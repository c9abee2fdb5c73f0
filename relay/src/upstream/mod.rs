//! Client for the upstream identity-verification API.
//!
//! The upstream exposes an asynchronous job model with status-code semantics
//! only: a submission either completes immediately or returns `303` plus a
//! correlation id, after which the job is polled at a fixed interval until a
//! terminal status or the attempt budget is exhausted.
//!
//! # Components
//! - `client`: submit, poll and the combined verify-and-wait sequence
//! - `config`: explicit configuration, constructed once at process start
//! - `error`: internal error taxonomy for the client boundary
//! - `types`: endpoint kinds and the submit/poll result shape

/// Submit/poll client
pub mod client;

/// Upstream client configuration
pub mod config;

/// Upstream error taxonomy
pub mod error;

/// Request/result types shared across the client
pub mod types;

pub use client::UpstreamClient;
pub use config::UpstreamConfig;
pub use error::UpstreamError;
pub use types::{EndpointKind, UpstreamResult, VerificationRequest};
