//! Data structures for authentication-related entities.
//!
//! Request and response payloads for the login, verify, refresh, and logout
//! endpoints. Response shapes are part of the wire contract the client
//! session manager depends on.

use crate::store::models::PublicUser;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request payload
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response containing the signed token and the user's public profile
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: PublicUser,
}

/// Verify response carrying the profile re-fetched from the user store
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub user: PublicUser,
}

/// Refresh response carrying a token with a fresh lifetime
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub success: bool,
    pub token: String,
}

/// Body returned for logout acknowledgements and all failures
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
