//! Shared application types

/// Environment configuration
pub mod environment;

/// Universal error handling
pub mod error;

pub use environment::Environment;
pub use error::AppError;
