//! Route targets, the router seam and redirect scheduling.

pub mod gate;
pub mod redirect;

pub use gate::{EntryGate, GateView};
pub use redirect::RedirectDispatcher;

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::session::Session;

/// The two top-level areas of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum Route {
    #[strum(to_string = "signed-in-area")]
    #[serde(rename = "signed-in-area")]
    SignedIn,
    #[strum(to_string = "signed-out-area")]
    #[serde(rename = "signed-out-area")]
    SignedOut,
}

impl Route {
    pub fn for_session(session: Option<&Session>) -> Self {
        if session.is_some() {
            Self::SignedIn
        } else {
            Self::SignedOut
        }
    }
}

/// Screen router. `replace` swaps the whole stack; there is no way back to
/// the previous area.
pub trait Router: Send + Sync {
    fn replace(&self, route: Route);
}

/// Router that keeps a single-entry stack and remembers every replace.
#[derive(Debug, Default)]
pub struct StackRouter {
    history: Mutex<Vec<Route>>,
}

impl StackRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Route> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .copied()
    }

    /// Every route replaced so far, oldest first.
    pub fn history(&self) -> Vec<Route> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Router for StackRouter {
    fn replace(&self, route: Route) {
        tracing::info!(%route, "navigating");
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route);
    }
}
