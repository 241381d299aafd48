//! In-memory user store.
//!
//! Reproduces the reference deployment's hard-coded user list behind the
//! [`UserStore`] trait. Also the store of choice for tests.

use super::UserStore;
use super::models::ServerUserRecord;
use anyhow::Result;
use async_trait::async_trait;
use bcrypt::{DEFAULT_COST, hash};
use uuid::Uuid;

/// User store backed by a fixed in-memory list.
pub struct MemoryUserStore {
    users: Vec<ServerUserRecord>,
}

impl MemoryUserStore {
    /// Creates a store over an explicit set of records.
    pub fn with_users(users: Vec<ServerUserRecord>) -> Self {
        Self { users }
    }

    /// Creates the store with the default Formula PM roster.
    pub fn seeded() -> Result<Self> {
        Ok(Self::with_users(default_roster()?))
    }
}

/// The default Formula PM roster, also used to bootstrap an empty SQLite
/// store. Passwords are hashed here so plaintext never sits in a record.
pub fn default_roster() -> Result<Vec<ServerUserRecord>> {
    Ok(vec![
        seed_user(
            "admin@formulapm.com",
            "admin123",
            "Formula Admin",
            "admin",
            Some("Management"),
            vec!["proj-1001", "proj-1002", "proj-1003"],
        )?,
        seed_user(
            "sarah@formulapm.com",
            "sarah2024",
            "Sarah Mitchell",
            "project_manager",
            Some("Project Management"),
            vec!["proj-1001", "proj-1002"],
        )?,
        seed_user(
            "omar@formulapm.com",
            "omar2024",
            "Omar Hassan",
            "designer",
            Some("Design"),
            vec!["proj-1003"],
        )?,
    ])
}

fn seed_user(
    email: &str,
    password: &str,
    name: &str,
    role: &str,
    department: Option<&str>,
    assigned_projects: Vec<&str>,
) -> Result<ServerUserRecord> {
    Ok(ServerUserRecord {
        id: Uuid::now_v7().to_string(),
        email: email.to_string(),
        password_hash: hash(password, DEFAULT_COST)?,
        name: name.to_string(),
        role: role.to_string(),
        avatar: None,
        department: department.map(str::to_string),
        assigned_projects: assigned_projects.iter().map(|p| p.to_string()).collect(),
    })
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<ServerUserRecord>> {
        Ok(self
            .users
            .iter()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ServerUserRecord>> {
        Ok(self.users.iter().find(|user| user.id == id).cloned())
    }
}
