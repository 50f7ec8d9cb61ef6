//! In-process stand-ins for the identity backend and provider SDKs.
//!
//! Used by the `notica` CLI to run scripted sessions and by the test suite.
//! Every stand-in can share a [`CallLog`] so callers can check the order of
//! calls across collaborators.

pub mod apple;
pub mod backend;
pub mod google;

pub use apple::ScriptedAppleProvider;
pub use backend::{BackendOp, InMemoryIdentityBackend, SimProfile};
pub use google::ScriptedGoogleProvider;

use std::sync::{Arc, Mutex, PoisonError};

/// Ordered record of collaborator calls, shared between stand-ins.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, call: impl Into<String>) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_empty(&self) -> bool {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    pub fn contains(&self, call: &str) -> bool {
        self.calls().iter().any(|c| c == call)
    }
}
