use axum::{
    body::Body,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::AppError;

/// The bearer token presented with the current request.
///
/// Inserted into request extensions by [`require_bearer`]. Whether the token
/// is still valid is up to the services; this only proves one was sent.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
///
/// # Arguments
///
/// * `headers` - The request headers.
///
/// # Returns
///
/// An `Option` containing the token if the header is present and well-formed.
fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token.to_string())
}

/// A middleware that requires a bearer token to be present.
///
/// # Arguments
///
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
///
/// # Returns
///
/// A `Response`, or `AppError::Authentication` when no token was sent.
pub async fn require_bearer(mut request: Request<Body>, next: Next) -> Result<Response, AppError> {
    tracing::debug!("🔐 Checking for bearer token...");

    let token = extract_bearer_token(request.headers()).ok_or_else(|| {
        tracing::warn!("❌ No bearer token on {}", request.uri().path());
        AppError::Authentication("Not authenticated".to_string())
    })?;

    request.extensions_mut().insert(BearerToken(token));

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(authorization: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(authorization).unwrap(),
        );
        headers
    }

    #[test]
    fn reads_bearer_token_with_any_scheme_case() {
        assert_eq!(
            extract_bearer_token(&headers_with("Bearer abc123")).as_deref(),
            Some("abc123")
        );
        assert_eq!(
            extract_bearer_token(&headers_with("bearer   abc123 ")).as_deref(),
            Some("abc123")
        );
    }

    #[test]
    fn rejects_missing_or_foreign_credentials() {
        assert!(extract_bearer_token(&HeaderMap::new()).is_none());
        assert!(extract_bearer_token(&headers_with("Basic YWxpY2U6cHcx")).is_none());
        assert!(extract_bearer_token(&headers_with("Bearer")).is_none());
        assert!(extract_bearer_token(&headers_with("Bearer   ")).is_none());
    }

    #[test]
    fn debug_output_hides_the_token() {
        let token = BearerToken("secret-token".to_string());

        assert!(!format!("{token:?}").contains("secret-token"));
        assert_eq!(token.as_str(), "secret-token");
    }
}
