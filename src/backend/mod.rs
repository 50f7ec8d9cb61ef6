//! Federated identity backend seam.
//!
//! The backend verifies credentials, issues sessions and is the only writer of
//! the [`SessionStore`]. Components receive it as an injected
//! `Arc<dyn IdentityBackend>`.

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::credential::Credential;
use crate::session::{Session, SessionStore};

/// Failure reported by the identity backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),
    #[error("No user is currently signed in")]
    NoCurrentUser,
    #[error("Recent sign-in required")]
    RequiresRecentLogin,
    #[error("Network error: {0}")]
    Network(String),
    #[error("Backend error: {0}")]
    Other(String),
}

#[async_trait]
pub trait IdentityBackend: Send + Sync {
    /// Read handle onto the session state this backend publishes.
    fn sessions(&self) -> SessionStore;

    /// Exchange a provider credential for a session. On success the new
    /// session is also published to the store.
    async fn sign_in_with_credential(&self, credential: Credential)
        -> Result<Session, BackendError>;

    async fn sign_out(&self) -> Result<(), BackendError>;

    /// Revoke provider tokens using an authorization code (Apple).
    async fn revoke_token(&self, authorization_code: &str) -> Result<(), BackendError>;

    /// Delete the signed-in user's account; ends the session.
    async fn delete_current_user(&self) -> Result<(), BackendError>;
}
