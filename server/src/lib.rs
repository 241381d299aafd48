//! Formula PM authentication backend.
//!
//! This crate exposes the server verifier for the Formula PM session manager:
//! an Axum router that issues signed bearer tokens against an injected user
//! store and validates them on demand. The router is built by [`app`] so the
//! binary and the integration tests share the exact same wiring.

pub mod auth;
pub mod config;
pub mod errors;
pub mod store;
pub mod utils;

use crate::store::UserStore;
use crate::utils::jwt::JwtUtils;
use axum::{Extension, Router, response::Json, routing::get};
use std::sync::Arc;

/// Shared application state injected into handlers and middleware.
///
/// Holds the user store behind its trait so a real persistence layer can be
/// swapped in without touching route logic.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub jwt: Arc<JwtUtils>,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>, jwt: Arc<JwtUtils>) -> Self {
        Self { store, jwt }
    }
}

/// Builds the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .nest("/api/auth", auth::routes::auth_router())
        .layer(Extension(state))
}

async fn root_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "Formula PM Auth Backend",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
