//! Handler functions for authentication-related API endpoints.
//!
//! These functions process incoming HTTP requests for login, token
//! verification, token refresh, and logout, and map service-layer errors
//! onto the wire contract. Internal failure detail is logged here and
//! never returned to the client.

use crate::AppState;
use crate::auth::models::*;
use crate::auth::service::AuthService;
use crate::errors::ServiceError;
use crate::utils::jwt::Claims;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::Json as ResponseJson,
};
use tracing::error;

type HandlerError = (StatusCode, Json<MessageResponse>);

/// Converts a service error to an HTTP response, substituting
/// `fallback_message` for anything that maps to a 500 so internals never
/// leak.
fn service_error_to_http(error: ServiceError, fallback_message: &str) -> HandlerError {
    match error {
        ServiceError::Validation { message } => (
            StatusCode::BAD_REQUEST,
            Json(MessageResponse::failure(message)),
        ),
        ServiceError::Authentication { message } => (
            StatusCode::UNAUTHORIZED,
            Json(MessageResponse::failure(message)),
        ),
        ServiceError::Database { source } => {
            error!("database error during auth flow: {:?}", source);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse::failure(fallback_message)),
            )
        }
        ServiceError::InternalError { message } => {
            error!("internal error during auth flow: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse::failure(fallback_message)),
            )
        }
    }
}

/// Handle user login request
#[axum::debug_handler]
pub async fn login(
    Extension(state): Extension<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<ResponseJson<LoginResponse>, HandlerError> {
    let auth_service = AuthService::new(state.store.as_ref(), &state.jwt);

    match auth_service.login(payload).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(
            error,
            "An error occurred during login",
        )),
    }
}

/// Handle token verification request
#[axum::debug_handler]
pub async fn verify(
    Extension(state): Extension<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<ResponseJson<VerifyResponse>, HandlerError> {
    let auth_service = AuthService::new(state.store.as_ref(), &state.jwt);

    match auth_service.verify(&claims).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(
            error,
            "An error occurred during verification",
        )),
    }
}

/// Handle token refresh request
#[axum::debug_handler]
pub async fn refresh_token(
    Extension(state): Extension<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<ResponseJson<RefreshResponse>, HandlerError> {
    let auth_service = AuthService::new(state.store.as_ref(), &state.jwt);

    match auth_service.refresh(&claims).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(
            error,
            "An error occurred during token refresh",
        )),
    }
}

/// Handle logout request (client-side token invalidation)
#[axum::debug_handler]
pub async fn logout() -> ResponseJson<MessageResponse> {
    // Logout is handled on the client side by removing the token from
    // storage. There is no server-side revocation list; tokens stay valid
    // until their natural expiry.
    ResponseJson(MessageResponse {
        success: true,
        message: "Logged out successfully".to_string(),
    })
}
