//! Sign-in flows, credential adaptation and account lifecycle operations.

pub mod alert;
pub mod credential;
pub mod error;
pub mod lifecycle;
pub mod nonce;
pub mod signin;

pub use alert::{UserAction, UserAlert};
pub use credential::{to_federated_credential, Credential, CredentialOutcome, ProviderSignIn};
pub use error::{AuthError, RevocationError};
pub use lifecycle::{
    AccountManager, ConfirmDecision, ConfirmPrompt, ConfirmationGate, DeleteOutcome, StepOutcome,
};
pub use nonce::Nonce;
pub use signin::{SignInOutcome, SignInService};
