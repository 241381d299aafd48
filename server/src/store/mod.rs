//! User store abstraction and implementations.
//!
//! Route and service logic depend only on the [`UserStore`] trait so a real
//! persistence layer can be substituted without touching them. Two
//! implementations are provided: a seeded in-memory store matching the
//! reference deployment, and a SQLite-backed store.

pub mod memory;
pub mod models;
pub mod sqlite;

use anyhow::Result;
use async_trait::async_trait;
use models::ServerUserRecord;

/// Read-only lookup interface over the user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Retrieves a user by email. The match is case-insensitive.
    async fn find_by_email(&self, email: &str) -> Result<Option<ServerUserRecord>>;

    /// Retrieves a user by their unique identifier.
    async fn find_by_id(&self, id: &str) -> Result<Option<ServerUserRecord>>;
}
