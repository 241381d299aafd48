//! Authentication module for issuing and validating session tokens.
//!
//! This module provides the public interface for login, token verification,
//! token refresh, and the bearer-token middleware protecting those routes.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
