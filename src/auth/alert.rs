//! User-visible alerts for auth outcomes.
//!
//! Alerts carry a generic retry prompt; the underlying error is for logs only.

use serde::Serialize;
use strum::Display;

use crate::provider::GoogleStatusCode;

use super::error::AuthError;

/// The user action an alert reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum UserAction {
    SignInWithApple,
    SignInWithGoogle,
    SignOut,
    DeleteAccount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserAlert {
    pub title: String,
    pub message: String,
}

impl UserAlert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn signed_out() -> Self {
        Self::new("Success", "You have been logged out.")
    }

    pub fn account_deleted() -> Self {
        Self::new("Success", "Your account has been deleted.")
    }
}

impl AuthError {
    /// The alert to show for this failure, or `None` when the user simply
    /// dismissed a provider dialog.
    pub fn user_alert(&self, action: UserAction) -> Option<UserAlert> {
        if let AuthError::Provider { source, .. } = self {
            match source.google_code() {
                Some(GoogleStatusCode::SignInCancelled) => return None,
                Some(GoogleStatusCode::InProgress) => {
                    return Some(UserAlert::new(
                        "Sign-In In Progress",
                        "Google Sign-In is already in progress.",
                    ))
                }
                Some(GoogleStatusCode::PlayServicesNotAvailable) => {
                    return Some(UserAlert::new(
                        "Play Services Error",
                        "Google Play Services not available or outdated.",
                    ))
                }
                _ => {}
            }
        }

        let alert = match action {
            UserAction::SignInWithApple => UserAlert::new(
                "Sign-In Error",
                "Failed to sign in with Apple. Please try again.",
            ),
            UserAction::SignInWithGoogle => UserAlert::new(
                "Sign-In Error",
                "Failed to sign in with Google. Please try again.",
            ),
            UserAction::SignOut => UserAlert::new("Error", "Failed to logout. Please try again."),
            UserAction::DeleteAccount => {
                UserAlert::new("Error", "Failed to delete account. Please try again.")
            }
        };
        Some(alert)
    }
}
