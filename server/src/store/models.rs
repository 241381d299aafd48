//! Data structures for stored user records.

use serde::{Deserialize, Serialize};

/// A user as held by the backend. The password hash never leaves the server;
/// every response carries [`PublicUser`] instead.
#[derive(Debug, Clone)]
pub struct ServerUserRecord {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: String,
    pub avatar: Option<String>,
    pub department: Option<String>,
    pub assigned_projects: Vec<String>,
}

impl ServerUserRecord {
    /// Returns the outward-facing profile with the password hash stripped.
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role.clone(),
            avatar: self.avatar.clone(),
            department: self.department.clone(),
            assigned_projects: self.assigned_projects.clone(),
        }
    }
}

/// User profile returned in login and verify responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub avatar: Option<String>,
    pub department: Option<String>,
    pub assigned_projects: Vec<String>,
}
