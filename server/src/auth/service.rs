//! Core business logic for the authentication system.
//!
//! Credential checks, token issuance, and token-holder lookups. Handlers
//! stay thin; everything observable about the auth flow is decided here.

use crate::auth::models::*;
use crate::errors::{ServiceError, ServiceResult};
use crate::store::UserStore;
use crate::store::models::ServerUserRecord;
use crate::utils::jwt::{Claims, JwtUtils};
use bcrypt::verify;
use validator::Validate;

/// Authentication service for handling login and token lifecycle
pub struct AuthService<'a> {
    store: &'a dyn UserStore,
    jwt: &'a JwtUtils,
}

impl<'a> AuthService<'a> {
    pub fn new(store: &'a dyn UserStore, jwt: &'a JwtUtils) -> Self {
        Self { store, jwt }
    }

    /// Authenticate the credentials and issue a signed token.
    ///
    /// Unknown email and wrong password produce the same error so the
    /// endpoint cannot be used for user enumeration.
    pub async fn login(&self, login_request: LoginRequest) -> ServiceResult<LoginResponse> {
        if login_request.validate().is_err() {
            return Err(ServiceError::validation("Email and password are required"));
        }

        let user = self.store.find_by_email(&login_request.email).await?;

        // Run the hash comparison only when a record exists, but collapse
        // both failure cases into one answer.
        let verified = match &user {
            Some(record) => Self::verify_password(&login_request.password, &record.password_hash)?,
            None => false,
        };

        let user = match (user, verified) {
            (Some(record), true) => record,
            _ => {
                return Err(ServiceError::authentication("Invalid email or password"));
            }
        };

        let token = self.jwt.generate_token(&user)?;

        Ok(LoginResponse {
            success: true,
            token,
            user: user.public(),
        })
    }

    /// Look up the token's subject in the user store.
    ///
    /// The profile is re-fetched rather than trusted from the token payload,
    /// so role changes take effect on the next verify.
    pub async fn verify(&self, claims: &Claims) -> ServiceResult<VerifyResponse> {
        let user = self.current_user(claims).await?;

        Ok(VerifyResponse {
            success: true,
            user: user.public(),
        })
    }

    /// Issue a new token with a fresh lifetime for a still-valid holder.
    pub async fn refresh(&self, claims: &Claims) -> ServiceResult<RefreshResponse> {
        let user = self.current_user(claims).await?;
        let token = self.jwt.generate_token(&user)?;

        Ok(RefreshResponse {
            success: true,
            token,
        })
    }

    async fn current_user(&self, claims: &Claims) -> ServiceResult<ServerUserRecord> {
        self.store
            .find_by_id(claims.user_id())
            .await?
            .ok_or_else(|| ServiceError::authentication("User not found"))
    }

    fn verify_password(password: &str, hash: &str) -> ServiceResult<bool> {
        verify(password, hash)
            .map_err(|e| ServiceError::internal_error(format!("Password verification failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryUserStore;

    fn jwt() -> JwtUtils {
        JwtUtils::new("test-secret", 86400)
    }

    #[tokio::test]
    async fn login_with_valid_credentials_issues_token() {
        let store = MemoryUserStore::seeded().unwrap();
        let jwt = jwt();
        let service = AuthService::new(&store, &jwt);

        let response = service
            .login(LoginRequest {
                email: "admin@formulapm.com".to_string(),
                password: "admin123".to_string(),
            })
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.user.role, "admin");

        let claims = jwt.validate_token(&response.token).unwrap();
        assert_eq!(claims.email, "admin@formulapm.com");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_indistinguishable() {
        let store = MemoryUserStore::seeded().unwrap();
        let jwt = jwt();
        let service = AuthService::new(&store, &jwt);

        let wrong_password = service
            .login(LoginRequest {
                email: "admin@formulapm.com".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();
        let unknown_email = service
            .login(LoginRequest {
                email: "nobody@x.com".to_string(),
                password: "x".to_string(),
            })
            .await
            .unwrap_err();

        let expected = "Authentication error: Invalid email or password";
        assert_eq!(wrong_password.to_string(), expected);
        assert_eq!(unknown_email.to_string(), expected);
    }

    #[tokio::test]
    async fn empty_fields_fail_validation() {
        let store = MemoryUserStore::seeded().unwrap();
        let jwt = jwt();
        let service = AuthService::new(&store, &jwt);

        let error = service
            .login(LoginRequest {
                email: "admin@formulapm.com".to_string(),
                password: String::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(error, ServiceError::Validation { .. }));
    }

    #[tokio::test]
    async fn login_email_match_is_case_insensitive() {
        let store = MemoryUserStore::seeded().unwrap();
        let jwt = jwt();
        let service = AuthService::new(&store, &jwt);

        let response = service
            .login(LoginRequest {
                email: "Admin@FormulaPM.com".to_string(),
                password: "admin123".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(response.user.email, "admin@formulapm.com");
    }

    #[tokio::test]
    async fn verify_rejects_deleted_user() {
        let store = MemoryUserStore::seeded().unwrap();
        let jwt = jwt();

        let ghost = ServerUserRecord {
            id: "gone".to_string(),
            email: "gone@formulapm.com".to_string(),
            password_hash: "irrelevant".to_string(),
            name: "Gone".to_string(),
            role: "designer".to_string(),
            avatar: None,
            department: None,
            assigned_projects: vec![],
        };
        let token = jwt.generate_token(&ghost).unwrap();
        let claims = jwt.validate_token(&token).unwrap();

        let service = AuthService::new(&store, &jwt);
        let error = service.verify(&claims).await.unwrap_err();
        assert_eq!(error.to_string(), "Authentication error: User not found");
    }
}
