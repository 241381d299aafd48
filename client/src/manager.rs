//! The session manager.
//!
//! Owns the session state machine and coordinates it with the credential
//! store and the auth backend. Operations follow the contracts the UI
//! depends on: `login` never returns an error to the caller, `logout`
//! always succeeds locally, and startup revalidation fails open to the
//! logged-out state rather than stranding the loading flag.
//!
//! Concurrent operations are serialized through a single in-flight mutex,
//! so a login racing a logout resolves in the order the lock is granted
//! instead of interleaving.

use crate::api::AuthApi;
use crate::session::{Session, SessionEvent, UserProfileUpdate};
use crate::store::{CredentialStore, StoredCredential};
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tracing::{debug, warn};

const DEFAULT_LOGIN_ERROR: &str = "Login failed";

/// Return-value contract of [`SessionManager::login`]. Failures are data,
/// not errors.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    pub success: bool,
    pub error: Option<String>,
}

impl LoginOutcome {
    fn success() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}

/// Single source of truth for the current session.
pub struct SessionManager {
    api: Arc<dyn AuthApi>,
    store: Arc<dyn CredentialStore>,
    state: watch::Sender<Session>,
    in_flight: Mutex<()>,
}

impl SessionManager {
    /// Creates a manager in the `Initializing` state. Call
    /// [`check_auth_status`](Self::check_auth_status) once at startup to
    /// settle it.
    pub fn new(api: Arc<dyn AuthApi>, store: Arc<dyn CredentialStore>) -> Self {
        let (state, _) = watch::channel(Session::initializing());
        Self {
            api,
            store,
            state,
            in_flight: Mutex::new(()),
        }
    }

    /// Returns a receiver that observes every session transition.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Snapshot of the current session.
    pub fn current(&self) -> Session {
        self.state.borrow().clone()
    }

    fn transition(&self, event: SessionEvent) {
        let next = self.state.borrow().apply(event);
        // send_replace delivers even when no subscriber is registered yet.
        self.state.send_replace(next);
    }

    /// Startup revalidation of the stored credential.
    ///
    /// Restores the stored profile and token when the server accepts the
    /// token; clears storage and lands in the logged-out state otherwise.
    /// Every failure path ends with `loading == false`.
    pub async fn check_auth_status(&self) {
        let _guard = self.in_flight.lock().await;

        let credential = match self.store.load() {
            Ok(Some(credential)) => credential,
            Ok(None) => {
                self.transition(SessionEvent::Logout);
                return;
            }
            Err(err) => {
                warn!(error = %err, "stored credential unreadable, clearing");
                if let Err(err) = self.store.clear() {
                    warn!(error = %err, "failed to clear credential storage");
                }
                self.transition(SessionEvent::Logout);
                return;
            }
        };

        match self.api.verify(&credential.token).await {
            Ok(_) => {
                self.transition(SessionEvent::LoginSuccess {
                    user: credential.user,
                    token: credential.token,
                });
            }
            Err(err) => {
                debug!(error = %err, "stored session rejected, logging out");
                if let Err(err) = self.store.clear() {
                    warn!(error = %err, "failed to clear credential storage");
                }
                self.transition(SessionEvent::Logout);
            }
        }
    }

    /// Logs in with the given credentials.
    ///
    /// On success the credential is persisted and the session becomes
    /// authenticated. On failure the session carries the server-provided
    /// message (or a default) and any previously stored credential is left
    /// untouched.
    pub async fn login(&self, email: &str, password: &str) -> LoginOutcome {
        let _guard = self.in_flight.lock().await;

        self.transition(SessionEvent::LoginStart);

        match self.api.login(email, password).await {
            Ok(payload) => {
                let credential = StoredCredential {
                    token: payload.token.clone(),
                    user: payload.user.clone(),
                };
                if let Err(err) = self.store.save(&credential) {
                    // The session is still valid for this run; it just will
                    // not survive a restart.
                    warn!(error = %err, "failed to persist credential");
                }
                self.transition(SessionEvent::LoginSuccess {
                    user: payload.user,
                    token: payload.token,
                });
                LoginOutcome::success()
            }
            Err(err) => {
                let message = match err {
                    crate::api::ApiError::Rejected { message, .. } => message,
                    other => {
                        debug!(error = %other, "login round-trip failed");
                        DEFAULT_LOGIN_ERROR.to_string()
                    }
                };
                self.transition(SessionEvent::LoginError(message.clone()));
                LoginOutcome::failure(message)
            }
        }
    }

    /// Logs out. Storage is cleared and the session reset unconditionally;
    /// the server notification is best-effort and its result ignored.
    pub async fn logout(&self) {
        let _guard = self.in_flight.lock().await;

        let token = self.state.borrow().token.clone();

        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to clear credential storage");
        }

        if let Err(err) = self.api.logout(token.as_deref()).await {
            debug!(error = %err, "logout notification failed");
        }

        self.transition(SessionEvent::Logout);
    }

    /// Shallow-merges the update into the current profile and re-persists
    /// the credential with the token unchanged. Silently ignored while
    /// unauthenticated.
    pub async fn update_user(&self, update: UserProfileUpdate) {
        let _guard = self.in_flight.lock().await;

        if !self.state.borrow().is_authenticated {
            debug!("update_user ignored while unauthenticated");
            return;
        }

        self.transition(SessionEvent::UserUpdate(update));

        let session = self.state.borrow().clone();
        if let (Some(user), Some(token)) = (session.user, session.token) {
            if let Err(err) = self.store.save(&StoredCredential { token, user }) {
                warn!(error = %err, "failed to persist updated profile");
            }
        }
    }

    /// Trades the current token for one with a fresh lifetime, persisting
    /// the replacement. Returns `false` without touching the session when
    /// unauthenticated or when the server declines.
    pub async fn refresh(&self) -> bool {
        let _guard = self.in_flight.lock().await;

        let session = self.state.borrow().clone();
        let (Some(user), Some(token)) = (session.user, session.token) else {
            return false;
        };

        match self.api.refresh(&token).await {
            Ok(new_token) => {
                let credential = StoredCredential {
                    token: new_token.clone(),
                    user: user.clone(),
                };
                if let Err(err) = self.store.save(&credential) {
                    warn!(error = %err, "failed to persist refreshed credential");
                }
                self.transition(SessionEvent::LoginSuccess {
                    user,
                    token: new_token,
                });
                true
            }
            Err(err) => {
                debug!(error = %err, "token refresh declined");
                false
            }
        }
    }
}
