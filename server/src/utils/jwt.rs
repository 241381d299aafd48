//! JWT token utilities for authentication.
//!
//! Provides secure token creation, validation, and claims management for
//! the session endpoints. Tokens are HMAC-signed and carry the identity
//! fields the client displays before its first verify round-trip.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;
use crate::store::models::ServerUserRecord;

/// JWT Claims structure containing the token subject's identity.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// User email
    pub email: String,
    /// User role
    pub role: String,
    /// Display name
    pub name: String,
    /// Token expiration timestamp
    pub exp: usize,
    /// Token issued at timestamp
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> &str {
        &self.sub
    }

    /// Check if token has expired
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as usize;
        now > self.exp
    }
}

/// JWT token utility for creating and validating tokens
pub struct JwtUtils {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expires_in_seconds: u64,
}

impl JwtUtils {
    /// Create a new JwtUtils instance from the configured secret and lifetime.
    pub fn new(secret: &str, expires_in_seconds: u64) -> Self {
        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        JwtUtils {
            encoding_key,
            decoding_key,
            validation,
            expires_in_seconds,
        }
    }

    /// Generate a token for a user with the configured lifetime.
    pub fn generate_token(&self, user: &ServerUserRecord) -> Result<String, ServiceError> {
        self.generate_token_with_expiry(user, self.expires_in_seconds as i64)
    }

    /// Generate a token expiring `expires_in_seconds` from now. Negative
    /// values produce an already-expired token, used by expiry tests.
    pub fn generate_token_with_expiry(
        &self,
        user: &ServerUserRecord,
        expires_in_seconds: i64,
    ) -> Result<String, ServiceError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(expires_in_seconds);

        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            name: user.name.clone(),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::internal_error(format!("Token generation failed: {}", e)))
    }

    /// Validate and decode a token. Signature and expiry failures collapse
    /// into one authentication error so callers cannot probe which it was.
    pub fn validate_token(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|_| ServiceError::authentication("Invalid or expired token"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> ServerUserRecord {
        ServerUserRecord {
            id: "user-1".to_string(),
            email: "admin@formulapm.com".to_string(),
            password_hash: "irrelevant".to_string(),
            name: "Formula Admin".to_string(),
            role: "admin".to_string(),
            avatar: None,
            department: Some("Management".to_string()),
            assigned_projects: vec!["proj-1001".to_string()],
        }
    }

    #[test]
    fn roundtrip_preserves_identity_claims() {
        let jwt = JwtUtils::new("test-secret", 86400);
        let token = jwt.generate_token(&test_user()).unwrap();

        let claims = jwt.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "admin@formulapm.com");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.name, "Formula Admin");
        assert!(!claims.is_expired());
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let jwt = JwtUtils::new("test-secret", 86400);
        let token = jwt.generate_token(&test_user()).unwrap();

        // Flip a byte in the signature segment.
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        assert!(jwt.validate_token(&tampered).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let jwt = JwtUtils::new("test-secret", 86400);
        let other = JwtUtils::new("other-secret", 86400);

        let token = jwt.generate_token(&test_user()).unwrap();
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let jwt = JwtUtils::new("test-secret", 86400);

        // Well past the default 60s decode leeway.
        let aged = jwt
            .generate_token_with_expiry(&test_user(), -120)
            .unwrap();
        assert!(jwt.validate_token(&aged).is_err());
    }

    #[test]
    fn token_near_end_of_life_is_still_accepted() {
        let jwt = JwtUtils::new("test-secret", 86400);

        // Equivalent to a 24h token at T+23h59m.
        let near_expiry = jwt.generate_token_with_expiry(&test_user(), 60).unwrap();
        assert!(jwt.validate_token(&near_expiry).is_ok());
    }
}
