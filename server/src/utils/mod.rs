//! Shared utilities for the backend.

pub mod jwt;
