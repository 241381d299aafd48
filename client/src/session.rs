//! Session state and its transition function.
//!
//! The session record is only ever mutated by [`Session::apply`], a pure
//! reducer over [`SessionEvent`]. Everything observable about the auth
//! lifecycle (loading flags, error messages, the authenticated profile) is
//! decided here; the manager just feeds it events.

use serde::{Deserialize, Serialize};

/// Profile of the authenticated user.
///
/// `company` and `permissions` are optional on the wire; servers that do
/// not send them leave the defaults in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Partial profile for shallow merges. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfileUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub company: Option<String>,
    pub permissions: Option<Vec<String>>,
}

impl UserProfile {
    /// Shallow-merges the update into this profile.
    pub fn merge(&mut self, update: &UserProfileUpdate) {
        if let Some(email) = &update.email {
            self.email = email.clone();
        }
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(role) = &update.role {
            self.role = role.clone();
        }
        if let Some(company) = &update.company {
            self.company = Some(company.clone());
        }
        if let Some(permissions) = &update.permissions {
            self.permissions = permissions.clone();
        }
    }
}

/// Client-held record of the current session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub is_authenticated: bool,
    pub user: Option<UserProfile>,
    pub token: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

/// The events the session reducer understands.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A login round-trip has started.
    LoginStart,
    /// Login (or startup restore) completed with a valid token.
    LoginSuccess { user: UserProfile, token: String },
    /// Login failed; the message becomes the session error.
    LoginError(String),
    /// Session torn down, locally unconditional.
    Logout,
    /// Shallow profile merge; ignored while unauthenticated.
    UserUpdate(UserProfileUpdate),
}

impl Session {
    /// State at application start, before the stored credential has been
    /// checked.
    pub fn initializing() -> Self {
        Self {
            is_authenticated: false,
            user: None,
            token: None,
            loading: true,
            error: None,
        }
    }

    /// The stable logged-out state.
    pub fn unauthenticated() -> Self {
        Self {
            loading: false,
            ..Self::initializing()
        }
    }

    /// Applies one event, producing the next state.
    pub fn apply(&self, event: SessionEvent) -> Session {
        match event {
            SessionEvent::LoginStart => Session {
                loading: true,
                error: None,
                ..Self::unauthenticated()
            },
            SessionEvent::LoginSuccess { user, token } => Session {
                is_authenticated: true,
                user: Some(user),
                token: Some(token),
                loading: false,
                error: None,
            },
            SessionEvent::LoginError(message) => Session {
                error: Some(message),
                ..Self::unauthenticated()
            },
            SessionEvent::Logout => Self::unauthenticated(),
            SessionEvent::UserUpdate(update) => {
                let mut next = self.clone();
                if let Some(user) = next.user.as_mut() {
                    user.merge(&update);
                }
                next
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            id: "user-1".to_string(),
            email: "sarah@formulapm.com".to_string(),
            name: "Sarah Mitchell".to_string(),
            role: "project_manager".to_string(),
            company: Some("Formula PM".to_string()),
            permissions: vec!["projects:read".to_string()],
        }
    }

    #[test]
    fn starts_loading_and_unauthenticated() {
        let session = Session::initializing();
        assert!(session.loading);
        assert!(!session.is_authenticated);
        assert!(session.user.is_none());
        assert!(session.token.is_none());
        assert!(session.error.is_none());
    }

    #[test]
    fn login_start_clears_previous_error() {
        let errored = Session::initializing().apply(SessionEvent::LoginError("bad".into()));
        assert_eq!(errored.error.as_deref(), Some("bad"));

        let retrying = errored.apply(SessionEvent::LoginStart);
        assert!(retrying.loading);
        assert!(retrying.error.is_none());
    }

    #[test]
    fn login_success_then_logout_round_trips() {
        let logged_in = Session::initializing().apply(SessionEvent::LoginSuccess {
            user: profile(),
            token: "tok".into(),
        });
        assert!(logged_in.is_authenticated);
        assert!(!logged_in.loading);
        assert_eq!(logged_in.token.as_deref(), Some("tok"));

        let logged_out = logged_in.apply(SessionEvent::Logout);
        assert_eq!(logged_out, Session::unauthenticated());
    }

    #[test]
    fn user_update_merges_only_given_fields_and_keeps_token() {
        let logged_in = Session::initializing().apply(SessionEvent::LoginSuccess {
            user: profile(),
            token: "tok".into(),
        });

        let updated = logged_in.apply(SessionEvent::UserUpdate(UserProfileUpdate {
            name: Some("X".to_string()),
            ..Default::default()
        }));

        let user = updated.user.unwrap();
        assert_eq!(user.name, "X");
        assert_eq!(user.email, "sarah@formulapm.com");
        assert_eq!(user.role, "project_manager");
        assert_eq!(user.company.as_deref(), Some("Formula PM"));
        assert_eq!(user.permissions, vec!["projects:read".to_string()]);
        assert_eq!(updated.token.as_deref(), Some("tok"));
    }

    #[test]
    fn user_update_is_a_no_op_without_a_user() {
        let session = Session::unauthenticated();
        let next = session.apply(SessionEvent::UserUpdate(UserProfileUpdate {
            name: Some("X".to_string()),
            ..Default::default()
        }));
        assert_eq!(next, session);
    }
}
