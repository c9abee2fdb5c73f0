use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::Response,
    Extension,
};

use crate::types::AppError;

/// The inbound bearer-token secret, constructed once at startup and shared
/// with the auth middleware as a request extension.
#[derive(Debug, Clone)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps the configured secret
    #[must_use]
    pub const fn new(secret: String) -> Self {
        Self(secret)
    }

    fn matches(&self, token: &str) -> bool {
        self.0 == token
    }
}

/// Bearer-token authentication middleware
///
/// Extracts the `Authorization: Bearer <token>` header and compares it
/// against the configured API key by exact string equality.
///
/// # Errors
///
/// - `AppError` - Invalid/missing token with 401 status code
pub async fn auth_middleware(
    Extension(api_key): Extension<ApiKey>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::trim);

    match token {
        Some(token) if api_key.matches(token) => Ok(next.run(request).await),
        Some(_) => Err(AppError::new(
            StatusCode::UNAUTHORIZED,
            "invalid_token",
            "Bearer token does not match the configured API key",
            false,
        )),
        None => Err(AppError::new(
            StatusCode::UNAUTHORIZED,
            "missing_token",
            "Authorization header must contain a valid Bearer token",
            false,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_requires_exact_equality() {
        let key = ApiKey::new("secret-token".to_string());
        assert!(key.matches("secret-token"));
        assert!(!key.matches("secret-token "));
        assert!(!key.matches("SECRET-TOKEN"));
        assert!(!key.matches(""));
    }
}
