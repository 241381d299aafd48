//! Middleware for protecting authenticated routes.
//!
//! Validates bearer tokens on incoming requests and makes the decoded
//! claims available to handlers via request extensions. Each failure mode
//! carries its own message in the standard error body.

use crate::AppState;
use crate::auth::models::MessageResponse;
use axum::{
    Json,
    extract::{Extension, Request},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

type AuthRejection = (StatusCode, Json<MessageResponse>);

fn unauthorized(message: &str) -> AuthRejection {
    (
        StatusCode::UNAUTHORIZED,
        Json(MessageResponse::failure(message)),
    )
}

/// Bearer token authentication middleware
pub async fn require_auth(
    Extension(state): Extension<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| unauthorized("No token provided"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| unauthorized("Invalid token format"))?;

    match state.jwt.validate_token(token) {
        Ok(claims) => {
            // Make claims available to handlers downstream.
            request.extensions_mut().insert(claims);
            Ok(next.run(request).await)
        }
        Err(_) => Err(unauthorized("Invalid or expired token")),
    }
}
