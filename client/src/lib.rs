//! Formula PM client session manager.
//!
//! Single source of truth for the current session on the client side. The
//! [`SessionManager`] drives login, logout, startup revalidation, and
//! profile updates against the auth backend, persists credentials through a
//! [`CredentialStore`], and publishes every state transition on a watch
//! channel so dependent UI can re-render.
//!
//! The manager is an explicit dependency to hand to whatever needs it;
//! there is no ambient global session.

pub mod api;
pub mod manager;
pub mod session;
pub mod store;

pub use api::{ApiError, AuthApi, HttpAuthApi, LoginPayload};
pub use manager::{LoginOutcome, SessionManager};
pub use session::{Session, SessionEvent, UserProfile, UserProfileUpdate};
pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore, StoredCredential};
