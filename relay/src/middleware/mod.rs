//! Request middleware

/// Bearer-token authorization
pub mod auth;

pub use auth::{auth_middleware, ApiKey};
