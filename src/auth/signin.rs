//! Apple and Google sign-in flows.
//!
//! A flow ends once the backend has issued a session. Navigation is not done
//! here: the backend publishes the session and the coordinator reacts.

use std::sync::Arc;

use crate::backend::IdentityBackend;
use crate::provider::{AppleAuthProvider, AppleAuthRequest, GoogleAuthProvider, GoogleConfig};
use crate::session::{ProviderKind, Session};

use super::credential::{to_federated_credential, Credential, CredentialOutcome, ProviderSignIn};
use super::error::AuthError;
use super::nonce::Nonce;

/// Outcome of a sign-in attempt that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInOutcome {
    SignedIn(Session),
    Cancelled,
}

/// Sign-in entry points for the signed-out screen.
pub struct SignInService {
    backend: Arc<dyn IdentityBackend>,
    apple: Arc<dyn AppleAuthProvider>,
    google: Arc<dyn GoogleAuthProvider>,
}

impl SignInService {
    /// Build the service and apply the Google client configuration.
    pub fn new(
        backend: Arc<dyn IdentityBackend>,
        apple: Arc<dyn AppleAuthProvider>,
        google: Arc<dyn GoogleAuthProvider>,
        google_config: &GoogleConfig,
    ) -> Self {
        if google_config.web_client_id.trim().is_empty() {
            tracing::warn!(
                "Google web client id is not configured; Google sign-in will not return an ID token"
            );
        }
        google.configure(google_config);
        Self {
            backend,
            apple,
            google,
        }
    }

    /// Apple sign-in is only offered where the platform supports it.
    pub fn apple_available(&self) -> bool {
        self.apple.is_supported()
    }

    pub async fn sign_in_with_apple(&self) -> Result<SignInOutcome, AuthError> {
        let nonce = Nonce::generate();
        let mut response = self
            .apple
            .perform_request(AppleAuthRequest::login(nonce.hashed()))
            .await
            .map_err(|e| AuthError::provider(ProviderKind::Apple, e))?;
        if response.nonce.is_none() {
            response.nonce = Some(nonce.raw().to_string());
        }

        match to_federated_credential(ProviderSignIn::Apple(response))? {
            CredentialOutcome::Credential(credential) => self.exchange(credential).await,
            CredentialOutcome::Cancelled => Ok(SignInOutcome::Cancelled),
        }
    }

    pub async fn sign_in_with_google(&self) -> Result<SignInOutcome, AuthError> {
        self.google
            .has_play_services(true)
            .await
            .map_err(|e| AuthError::provider(ProviderKind::Google, e))?;

        let response = match self.google.sign_in().await {
            Ok(response) => response,
            Err(e) if e.is_cancellation() => {
                tracing::debug!("Google sign-in cancelled");
                return Ok(SignInOutcome::Cancelled);
            }
            Err(e) => return Err(AuthError::provider(ProviderKind::Google, e)),
        };

        match to_federated_credential(ProviderSignIn::Google(response))? {
            CredentialOutcome::Credential(credential) => self.exchange(credential).await,
            CredentialOutcome::Cancelled => {
                tracing::debug!("Google sign-in cancelled");
                Ok(SignInOutcome::Cancelled)
            }
        }
    }

    async fn exchange(&self, credential: Credential) -> Result<SignInOutcome, AuthError> {
        let provider = credential.provider_kind();
        tracing::debug!(%provider, "exchanging provider credential");
        let session = self
            .backend
            .sign_in_with_credential(credential)
            .await
            .map_err(|e| {
                tracing::error!(%provider, error = %e, "credential exchange failed");
                AuthError::Exchange(e)
            })?;
        tracing::info!(
            %provider,
            uid = %session.uid(),
            email = session.email().unwrap_or("-"),
            "sign-in succeeded"
        );
        Ok(SignInOutcome::SignedIn(session))
    }
}
