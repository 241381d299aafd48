//! HTTP client for the auth backend.
//!
//! The [`AuthApi`] trait is the seam the session manager talks through;
//! [`HttpAuthApi`] is the reqwest implementation speaking the backend's
//! wire contract. Tests substitute scripted implementations.

use crate::session::UserProfile;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Request timeout applied to every round-trip. The reference behavior had
/// none, which could strand a loading spinner on a dead network.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a failure body.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// The round-trip itself failed (network, timeout, bad payload).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Token and profile returned by a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginPayload {
    pub token: String,
    pub user: UserProfile,
}

/// The auth round-trips the session manager performs.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<LoginPayload, ApiError>;

    /// Validates a stored token with the server. `Ok` carries the profile as
    /// the server currently sees it.
    async fn verify(&self, token: &str) -> Result<UserProfile, ApiError>;

    /// Trades a still-valid token for one with a fresh lifetime.
    async fn refresh(&self, token: &str) -> Result<String, ApiError>;

    /// Best-effort logout notification.
    async fn logout(&self, token: Option<&str>) -> Result<(), ApiError>;
}

#[derive(Deserialize)]
struct VerifyBody {
    user: UserProfile,
}

#[derive(Deserialize)]
struct RefreshBody {
    token: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// reqwest-backed [`AuthApi`] implementation.
pub struct HttpAuthApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    /// `base_url` is the prefix of the auth routes, e.g.
    /// `http://localhost:3000/api/auth`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turns a non-success response into [`ApiError::Rejected`], pulling the
    /// message out of the standard error body when one is present.
    async fn rejection(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| "Request failed".to_string());
        ApiError::Rejected { status, message }
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, email: &str, password: &str) -> Result<LoginPayload, ApiError> {
        let response = self
            .client
            .post(self.url("/login"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        Ok(response.json::<LoginPayload>().await?)
    }

    async fn verify(&self, token: &str) -> Result<UserProfile, ApiError> {
        let response = self
            .client
            .get(self.url("/verify"))
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        Ok(response.json::<VerifyBody>().await?.user)
    }

    async fn refresh(&self, token: &str) -> Result<String, ApiError> {
        let response = self
            .client
            .post(self.url("/refresh"))
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        Ok(response.json::<RefreshBody>().await?.token)
    }

    async fn logout(&self, token: Option<&str>) -> Result<(), ApiError> {
        let mut request = self.client.post(self.url("/logout"));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        Ok(())
    }
}
