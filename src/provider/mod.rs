//! Identity provider SDK seams (Apple, Google).
//!
//! The platform SDKs are external; these traits describe exactly the calls
//! the sign-in and account flows make against them.

pub mod apple;
pub mod google;

pub use apple::{
    AppleAuthProvider, AppleAuthRequest, AppleAuthResponse, AppleFullName, AppleOperation,
    AppleScope,
};
pub use google::{
    GoogleAuthProvider, GoogleConfig, GoogleSignInResponse, GoogleStatusCode, GoogleUser,
};

use thiserror::Error;

/// Failure reported by a provider SDK.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Google sign-in error ({code}): {message}")]
    Google {
        code: GoogleStatusCode,
        message: String,
    },
    #[error("Apple authentication error: {0}")]
    Apple(String),
    #[error("Provider unavailable on this platform: {0}")]
    Unavailable(String),
}

impl ProviderError {
    pub fn google(code: GoogleStatusCode, message: impl Into<String>) -> Self {
        Self::Google {
            code,
            message: message.into(),
        }
    }

    /// Google status code, when this error came from Google sign-in.
    pub fn google_code(&self) -> Option<GoogleStatusCode> {
        match self {
            Self::Google { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether the user dismissed the provider dialog.
    pub fn is_cancellation(&self) -> bool {
        self.google_code() == Some(GoogleStatusCode::SignInCancelled)
    }
}
