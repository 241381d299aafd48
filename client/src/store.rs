//! Durable credential storage.
//!
//! The stored credential is a single JSON document holding the token and the
//! serialized profile, so the two are always written together and cleared
//! together. Invariant: a credential is present if and only if the last
//! known session was authenticated; the manager clears on any mismatch.

use crate::session::UserProfile;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

/// The durable on-device copy of token and profile used to restore a
/// session after a restart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCredential {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("credential storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("credential storage holds invalid data: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Synchronous, atomic credential storage.
pub trait CredentialStore: Send + Sync {
    /// Returns the stored credential, or `None` if nothing is stored.
    fn load(&self) -> Result<Option<StoredCredential>, StoreError>;

    /// Persists the credential, replacing any previous one.
    fn save(&self, credential: &StoredCredential) -> Result<(), StoreError>;

    /// Removes the stored credential. Clearing an empty store is fine.
    fn clear(&self) -> Result<(), StoreError>;
}

/// File-backed credential store.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write never leaves a half-written credential behind.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<StoredCredential>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn save(&self, credential: &StoredCredential) -> Result<(), StoreError> {
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec(credential)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory credential store for tests and ephemeral embedders.
#[derive(Default)]
pub struct MemoryCredentialStore {
    inner: Mutex<Option<StoredCredential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<StoredCredential>, StoreError> {
        Ok(self.inner.lock().unwrap().clone())
    }

    fn save(&self, credential: &StoredCredential) -> Result<(), StoreError> {
        *self.inner.lock().unwrap() = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.inner.lock().unwrap() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential() -> StoredCredential {
        StoredCredential {
            token: "tok".to_string(),
            user: UserProfile {
                id: "user-1".to_string(),
                email: "omar@formulapm.com".to_string(),
                name: "Omar Hassan".to_string(),
                role: "designer".to_string(),
                company: None,
                permissions: vec![],
            },
        }
    }

    #[test]
    fn file_store_round_trips_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("session.json"));

        assert!(store.load().unwrap().is_none());

        store.save(&credential()).unwrap();
        assert_eq!(store.load().unwrap(), Some(credential()));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());

        // Clearing again must not fail.
        store.clear().unwrap();
    }

    #[test]
    fn file_store_reports_corrupt_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileCredentialStore::new(path);
        assert!(matches!(store.load(), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryCredentialStore::new();
        store.save(&credential()).unwrap();
        assert_eq!(store.load().unwrap(), Some(credential()));
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
