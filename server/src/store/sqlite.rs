//! SQLite-backed user store.
//!
//! Same [`UserStore`] surface as the in-memory store, backed by a sqlx
//! connection pool. The schema is created on startup if missing, so the
//! server can be pointed at an empty database file.

use super::UserStore;
use super::models::ServerUserRecord;
use crate::config::Config;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::time::Duration;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE COLLATE NOCASE,
    password_hash TEXT NOT NULL,
    name TEXT NOT NULL,
    role TEXT NOT NULL,
    avatar TEXT,
    department TEXT,
    assigned_projects TEXT NOT NULL DEFAULT '[]'
)
"#;

pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    /// Initializes the connection pool and ensures the schema exists.
    pub async fn connect(database_url: &str, config: &Config) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect(database_url)
            .await?;

        sqlx::query(SCHEMA).execute(&pool).await?;

        Ok(Self { pool })
    }

    /// Number of user rows, used to decide whether to seed a fresh database.
    pub async fn count_users(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("count")?)
    }

    /// Inserts a user record, replacing any existing row with the same id.
    pub async fn upsert_user(&self, user: &ServerUserRecord) -> Result<()> {
        let assigned_projects = serde_json::to_string(&user.assigned_projects)?;
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO users
                (id, email, password_hash, name, role, avatar, department, assigned_projects)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(&user.role)
        .bind(&user.avatar)
        .bind(&user.department)
        .bind(assigned_projects)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn record_from_row(row: SqliteRow) -> Result<ServerUserRecord> {
    let assigned_projects: String = row.try_get("assigned_projects")?;
    Ok(ServerUserRecord {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        name: row.try_get("name")?,
        role: row.try_get("role")?,
        avatar: row.try_get("avatar")?,
        department: row.try_get("department")?,
        assigned_projects: serde_json::from_str(&assigned_projects)?,
    })
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<ServerUserRecord>> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, name, role, avatar, department, assigned_projects
             FROM users WHERE email = ? COLLATE NOCASE",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(record_from_row).transpose()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ServerUserRecord>> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, name, role, avatar, department, assigned_projects
             FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(record_from_row).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> SqliteUserStore {
        let config = Config {
            jwt_secret: "unused".to_string(),
            jwt_expires_in_seconds: 86400,
            server_port: 0,
            database_url: None,
            max_connections: 1,
            acquire_timeout_seconds: 3,
        };
        SqliteUserStore::connect("sqlite::memory:", &config)
            .await
            .unwrap()
    }

    fn record() -> ServerUserRecord {
        ServerUserRecord {
            id: "user-1".to_string(),
            email: "sarah@formulapm.com".to_string(),
            password_hash: "hash".to_string(),
            name: "Sarah Mitchell".to_string(),
            role: "project_manager".to_string(),
            avatar: None,
            department: Some("Project Management".to_string()),
            assigned_projects: vec!["proj-1001".to_string(), "proj-1002".to_string()],
        }
    }

    #[tokio::test]
    async fn upsert_then_lookup_round_trips() {
        let store = store().await;
        assert_eq!(store.count_users().await.unwrap(), 0);

        store.upsert_user(&record()).await.unwrap();
        assert_eq!(store.count_users().await.unwrap(), 1);

        let by_id = store.find_by_id("user-1").await.unwrap().unwrap();
        assert_eq!(by_id.email, "sarah@formulapm.com");
        assert_eq!(
            by_id.assigned_projects,
            vec!["proj-1001".to_string(), "proj-1002".to_string()]
        );

        // Email match is case-insensitive, mirroring the memory store.
        let by_email = store
            .find_by_email("SARAH@formulapm.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, "user-1");
    }

    #[tokio::test]
    async fn missing_user_yields_none() {
        let store = store().await;
        assert!(store.find_by_id("ghost").await.unwrap().is_none());
        assert!(store.find_by_email("ghost@x.com").await.unwrap().is_none());
    }
}
