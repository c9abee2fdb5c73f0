//! Identity verification relay service

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// Trace-report field extraction
pub mod extract;

/// Request middleware
pub mod middleware;

/// Route definitions
pub mod routes;

/// Server startup
pub mod server;

/// Shared types: environment configuration and error handling
pub mod types;

/// Upstream verification API client
pub mod upstream;
