use thiserror::Error;

use crate::backend::BackendError;
use crate::error::NoticaError;
use crate::provider::ProviderError;
use crate::session::ProviderKind;

/// Errors raised by sign-in and account lifecycle flows.
///
/// A user dismissing a provider dialog is not an error; flows report it as a
/// `Cancelled` outcome instead.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Provider returned no {0}")]
    MissingToken(&'static str),
    #[error("Provider returned no authorization code")]
    MissingAuthorizationCode,
    #[error("No user is currently signed in")]
    NoActiveSession,
    #[error("Credential exchange failed: {0}")]
    Exchange(#[source] BackendError),
    #[error("Sign out failed: {0}")]
    SignOut(#[source] BackendError),
    #[error("Account deletion failed: {0}")]
    DeleteAccount(#[source] BackendError),
    #[error("Token revocation failed: {0}")]
    Revocation(#[source] RevocationError),
    #[error("{provider} provider error: {source}")]
    Provider {
        provider: ProviderKind,
        #[source]
        source: ProviderError,
    },
}

/// Why provider tokens could not be revoked.
#[derive(Debug, Error)]
pub enum RevocationError {
    #[error("not supported for {0}")]
    Unsupported(ProviderKind),
    #[error("refresh request failed: {0}")]
    Refresh(#[source] ProviderError),
    #[error("backend rejected the authorization code: {0}")]
    Backend(#[source] BackendError),
}

impl AuthError {
    pub fn provider(provider: ProviderKind, source: ProviderError) -> Self {
        Self::Provider { provider, source }
    }

    /// True for failures of the identity backend itself.
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            Self::Exchange(_) | Self::SignOut(_) | Self::DeleteAccount(_)
        )
    }
}

impl From<AuthError> for NoticaError {
    fn from(error: AuthError) -> Self {
        NoticaError::Auth(error)
    }
}
