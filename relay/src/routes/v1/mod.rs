//! v1 API routes

/// Verification and trace handlers
pub mod verification;

use aide::axum::{routing::post, ApiRouter};
use axum::middleware;

use crate::middleware::auth::auth_middleware;

/// Creates the v1 API router with all v1 handler routes
pub fn handler() -> ApiRouter {
    ApiRouter::new()
        .api_route("/verify", post(verification::verify))
        .api_route("/trace", post(verification::trace))
        .api_route("/verify-all", post(verification::verify_all))
        .api_route("/check-status", post(verification::check_status))
        .layer(middleware::from_fn(auth_middleware))
}
