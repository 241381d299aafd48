//! Defines the HTTP routes for authentication.
//!
//! Login and logout are open; verify and refresh sit behind the bearer
//! token middleware. Designed to be nested into the main Axum router.

use crate::auth::handlers::*;
use crate::auth::middleware::*;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Creates the authentication router with all auth-related routes
pub fn auth_router() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/verify", get(verify).layer(middleware::from_fn(require_auth)))
        .route(
            "/refresh",
            post(refresh_token).layer(middleware::from_fn(require_auth)),
        )
}
