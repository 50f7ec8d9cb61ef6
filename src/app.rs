//! App wiring: one coordinator, one entry gate and the auth services sharing
//! a single injected backend and router.

use std::sync::Arc;

use crate::auth::{AccountManager, SignInService};
use crate::backend::IdentityBackend;
use crate::config::NoticaConfig;
use crate::coordinator::{AuthCoordinator, AuthSnapshot, CoordinatorHandle};
use crate::error::NoticaError;
use crate::navigation::{EntryGate, GateView, RedirectDispatcher, Route, Router};
use crate::provider::{AppleAuthProvider, GoogleAuthProvider};

/// A running app instance.
///
/// The entry gate performs the launch-time redirect; the coordinator performs
/// every redirect after that. Both go through the same router.
pub struct NoticaApp {
    config: NoticaConfig,
    coordinator: CoordinatorHandle,
    gate: EntryGate,
    sign_in: SignInService,
    accounts: AccountManager,
}

impl NoticaApp {
    /// Wire collaborators and start observing the backend's session store.
    ///
    /// Must be called from within a tokio runtime.
    pub fn launch(
        config: NoticaConfig,
        backend: Arc<dyn IdentityBackend>,
        apple: Arc<dyn AppleAuthProvider>,
        google: Arc<dyn GoogleAuthProvider>,
        router: Arc<dyn Router>,
    ) -> Result<Self, NoticaError> {
        let dispatcher = RedirectDispatcher::new(router, config.navigation.redirect_delay())?;
        let gate = EntryGate::new(dispatcher.with_delay(config.navigation.launch_redirect_delay()));
        let coordinator = AuthCoordinator::new(dispatcher).start(&backend.sessions(), |_| {});

        let sign_in = SignInService::new(
            backend.clone(),
            apple.clone(),
            google.clone(),
            &config.google,
        );
        let accounts = AccountManager::builder()
            .backend(backend)
            .apple(apple)
            .google(google)
            .build();

        tracing::debug!(
            redirect_delay_ms = config.navigation.redirect_delay_ms,
            launch_redirect_delay_ms = config.navigation.launch_redirect_delay_ms,
            "app launched"
        );

        Ok(Self {
            config,
            coordinator,
            gate,
            sign_in,
            accounts,
        })
    }

    pub fn config(&self) -> &NoticaConfig {
        &self.config
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        self.coordinator.snapshot()
    }

    pub fn coordinator(&self) -> &CoordinatorHandle {
        &self.coordinator
    }

    pub fn sign_in(&self) -> &SignInService {
        &self.sign_in
    }

    pub fn accounts(&self) -> &AccountManager {
        &self.accounts
    }

    /// Render the entry screen for the current snapshot.
    pub fn entry_view(&mut self) -> GateView {
        let snapshot = self.coordinator.snapshot();
        self.gate.render(&snapshot)
    }

    /// Wait until the backend has hydrated and the launch redirect is issued.
    pub async fn settle(&mut self) -> Option<Route> {
        let snapshots = self.coordinator.watch_snapshot();
        self.gate.await_settle(snapshots).await
    }

    /// Tear down the coordinator subscription.
    pub fn shutdown(mut self) {
        self.coordinator.stop();
    }
}
