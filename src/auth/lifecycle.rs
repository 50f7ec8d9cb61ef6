//! Account lifecycle: sign-out, token revocation and account deletion.
//!
//! Each operation is a fixed sequence of steps. Provider-side cleanup steps
//! are best-effort; backend steps are mandatory and end the operation on
//! failure.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use bon::Builder;

use crate::backend::IdentityBackend;
use crate::provider::{AppleAuthProvider, AppleAuthRequest, GoogleAuthProvider, ProviderError};
use crate::session::ProviderKind;

use super::error::{AuthError, RevocationError};

/// Result of a single lifecycle step.
#[derive(Debug)]
pub enum StepOutcome {
    Done,
    /// The step does not apply to this session.
    Skipped,
    /// A best-effort step failed; the operation continues.
    Ignored(ProviderError),
    /// A mandatory step failed; the operation stops here.
    Fatal(AuthError),
}

impl StepOutcome {
    /// Run a provider cleanup call whose failure is expected and harmless.
    pub async fn best_effort<F>(step: &'static str, call: F) -> Self
    where
        F: Future<Output = Result<(), ProviderError>>,
    {
        match call.await {
            Ok(()) => Self::Done,
            Err(error) => {
                tracing::warn!(step, error = %error, "best-effort step failed, continuing");
                Self::Ignored(error)
            }
        }
    }

    /// Run a step whose failure ends the operation.
    pub async fn mandatory<F>(step: &'static str, call: F) -> Self
    where
        F: Future<Output = Result<(), AuthError>>,
    {
        match call.await {
            Ok(()) => Self::Done,
            Err(error) => {
                tracing::error!(step, error = %error, "step failed, stopping");
                Self::Fatal(error)
            }
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }

    /// Collapse into the operation's result.
    pub fn into_result(self) -> Result<(), AuthError> {
        match self {
            Self::Fatal(error) => Err(error),
            Self::Done | Self::Skipped | Self::Ignored(_) => Ok(()),
        }
    }
}

/// Prompt shown before an irreversible action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub title: String,
    pub message: String,
    pub confirm_label: String,
    pub cancel_label: String,
    pub destructive: bool,
}

impl ConfirmPrompt {
    pub fn delete_account() -> Self {
        Self {
            title: "Delete Account".to_string(),
            message: "Are you sure you want to delete your account? This action cannot be undone."
                .to_string(),
            confirm_label: "Delete".to_string(),
            cancel_label: "Cancel".to_string(),
            destructive: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmDecision {
    Confirm,
    Cancel,
}

/// Asks the user to confirm a destructive action.
#[async_trait]
pub trait ConfirmationGate: Send + Sync {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> ConfirmDecision;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

/// Account actions offered on the signed-in screen.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use notica::auth::AccountManager;
/// use notica::sim::{InMemoryIdentityBackend, ScriptedAppleProvider, ScriptedGoogleProvider};
///
/// # async fn example() -> Result<(), notica::auth::AuthError> {
/// let accounts = AccountManager::builder()
///     .backend(Arc::new(InMemoryIdentityBackend::new()))
///     .apple(Arc::new(ScriptedAppleProvider::new()))
///     .google(Arc::new(ScriptedGoogleProvider::new()))
///     .build();
/// accounts.sign_out().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Builder)]
pub struct AccountManager {
    backend: Arc<dyn IdentityBackend>,
    apple: Arc<dyn AppleAuthProvider>,
    google: Arc<dyn GoogleAuthProvider>,
}

impl AccountManager {
    /// Sign out of Google (best-effort) and then of the backend.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        StepOutcome::best_effort("google_sign_out", self.google.sign_out()).await;

        StepOutcome::mandatory("backend_sign_out", async {
            self.backend.sign_out().await.map_err(AuthError::SignOut)
        })
        .await
        .into_result()?;

        tracing::info!("signed out");
        Ok(())
    }

    /// Revoke the provider's tokens with a fresh authorization code.
    ///
    /// Only Apple supports this; other providers fail with
    /// [`AuthError::Revocation`].
    pub async fn revoke_and_refresh(&self, provider: ProviderKind) -> Result<(), AuthError> {
        if provider != ProviderKind::Apple {
            return Err(AuthError::Revocation(RevocationError::Unsupported(provider)));
        }

        let response = self
            .apple
            .perform_request(AppleAuthRequest::refresh())
            .await
            .map_err(|e| AuthError::Revocation(RevocationError::Refresh(e)))?;

        let code = response
            .authorization_code
            .filter(|code| !code.is_empty())
            .ok_or(AuthError::MissingAuthorizationCode)?;

        self.backend
            .revoke_token(&code)
            .await
            .map_err(|e| AuthError::Revocation(RevocationError::Backend(e)))?;

        tracing::debug!(%provider, "provider tokens revoked");
        Ok(())
    }

    /// Revoke provider access for the signed-in user, then delete the account.
    pub async fn delete_account(&self) -> Result<(), AuthError> {
        let session = self
            .backend
            .sessions()
            .current()
            .ok_or(AuthError::NoActiveSession)?;
        let provider = session.primary_kind();

        let revocation = match provider {
            ProviderKind::Apple => {
                StepOutcome::mandatory("apple_revoke", self.revoke_and_refresh(ProviderKind::Apple))
                    .await
            }
            ProviderKind::Google => {
                StepOutcome::best_effort("google_revoke_access", self.google.revoke_access()).await
            }
            ProviderKind::Unknown => StepOutcome::Skipped,
        };
        if let StepOutcome::Fatal(error) = revocation {
            tracing::warn!(%provider, "account kept after failed revocation");
            return Err(error);
        }

        StepOutcome::mandatory("backend_delete_user", async {
            self.backend
                .delete_current_user()
                .await
                .map_err(AuthError::DeleteAccount)
        })
        .await
        .into_result()?;

        tracing::info!(%provider, uid = %session.uid(), "account deleted");
        Ok(())
    }

    /// Ask for confirmation, then delete the account.
    pub async fn confirm_and_delete_account(
        &self,
        gate: &dyn ConfirmationGate,
    ) -> Result<DeleteOutcome, AuthError> {
        match gate.confirm(&ConfirmPrompt::delete_account()).await {
            ConfirmDecision::Cancel => {
                tracing::debug!("account deletion cancelled");
                Ok(DeleteOutcome::Cancelled)
            }
            ConfirmDecision::Confirm => {
                self.delete_account().await?;
                Ok(DeleteOutcome::Deleted)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendError;
    use crate::provider::GoogleStatusCode;

    #[tokio::test]
    async fn best_effort_failure_is_ignored() {
        let outcome = StepOutcome::best_effort("cleanup", async {
            Err(ProviderError::google(GoogleStatusCode::SignInRequired, "not signed in"))
        })
        .await;
        assert!(matches!(outcome, StepOutcome::Ignored(_)));
        assert!(outcome.into_result().is_ok());
    }

    #[tokio::test]
    async fn mandatory_failure_is_fatal() {
        let outcome = StepOutcome::mandatory("backend_sign_out", async {
            Err(AuthError::SignOut(BackendError::Network("offline".into())))
        })
        .await;
        assert!(outcome.is_fatal());
        assert!(matches!(outcome.into_result(), Err(AuthError::SignOut(_))));
    }

    #[test]
    fn skipped_step_succeeds() {
        assert!(StepOutcome::Skipped.into_result().is_ok());
    }

    #[test]
    fn delete_prompt_is_destructive() {
        let prompt = ConfirmPrompt::delete_account();
        assert!(prompt.destructive);
        assert_eq!(prompt.confirm_label, "Delete");
        assert!(prompt.message.contains("cannot be undone"));
    }
}
