//! Convenience re-exports for common use.

pub use crate::app::NoticaApp;
pub use crate::auth::{
    AccountManager, AuthError, ConfirmDecision, ConfirmationGate, DeleteOutcome, SignInOutcome,
    SignInService, UserAction, UserAlert,
};
pub use crate::backend::{BackendError, IdentityBackend};
pub use crate::config::NoticaConfig;
pub use crate::coordinator::{AuthCoordinator, AuthSnapshot, CoordinatorHandle};
pub use crate::error::{NoticaError, Result};
pub use crate::navigation::{EntryGate, GateView, RedirectDispatcher, Route, Router, StackRouter};
pub use crate::session::{ProviderKind, Session, SessionStore};
