//! API Middleware
//!
//! Token authentication and request logging middleware.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use crate::domain::OperationContext;
use crate::error::AppError;

use super::AppState;

/// Header carrying the auth token
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Header carrying the correlation ID (set by `SetRequestIdLayer`)
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// =========================================================================
// Token Authentication Middleware
// =========================================================================

/// Verify the request token and attach the acting identity as `OperationContext`
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let claims = {
        let token = extract_token(request.headers()).ok_or(AppError::MissingToken)?;

        state.tokens.verify(token).map_err(|e| {
            tracing::debug!("Token rejected: {}", e);
            AppError::InvalidToken
        })?
    };

    // Tokens outlive their users; a deleted user must not pass
    if state.store.find_user_by_id(claims.user.id).await?.is_none() {
        tracing::warn!(user_id = %claims.user.id, "Token references unknown user");
        return Err(AppError::InvalidToken);
    }

    let mut context = OperationContext::new(claims.user.id);
    if let Some(correlation_id) = header_str(request.headers(), REQUEST_ID_HEADER) {
        context = context.with_correlation_id(correlation_id);
    }

    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}

/// Token from `x-auth-token`, falling back to `Authorization: Bearer <token>`.
/// The scheme name is matched case-insensitively.
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    if let Some(token) = header_str(headers, AUTH_TOKEN_HEADER) {
        return Some(token);
    }

    header_str(headers, AUTHORIZATION.as_str())
        .and_then(|value| value.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

// =========================================================================
// mask_headers_for_logging
// =========================================================================

/// Headers that should be masked in logs
const SENSITIVE_HEADERS: &[&str] = &[
    AUTH_TOKEN_HEADER,
    "authorization",
    "cookie",
    "set-cookie",
];

/// Mask sensitive headers for logging
pub fn mask_headers_for_logging(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let name_lower = name.as_str().to_lowercase();
            let masked_value = if SENSITIVE_HEADERS.contains(&name_lower.as_str()) {
                "[REDACTED]".to_string()
            } else {
                value.to_str().unwrap_or("[invalid utf8]").to_string()
            };
            (name.to_string(), masked_value)
        })
        .collect()
}

// =========================================================================
// Request Logging Middleware
// =========================================================================

/// Request logging middleware
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let headers = mask_headers_for_logging(request.headers());
    let correlation_id = header_str(request.headers(), REQUEST_ID_HEADER).map(str::to_string);

    let start = std::time::Instant::now();

    tracing::info!(
        method = %method,
        uri = %uri,
        correlation_id = ?correlation_id,
        headers = ?headers,
        "Incoming request"
    );

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %status,
        duration_ms = %duration.as_millis(),
        correlation_id = ?correlation_id,
        "Request completed"
    );

    response
}
