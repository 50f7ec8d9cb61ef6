//! Auth state coordinator.
//!
//! Subscribes to the [`SessionStore`], mirrors the session into an observable
//! [`AuthSnapshot`], and redirects on every notification after the first one.
//! The first notification is the backend hydrating already-known state at
//! launch; it clears `loading` but never navigates.
//!
//! ```text
//! Unsubscribed --start--> Loading --first notification--> Ready --notification--> Ready
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::navigation::RedirectDispatcher;
use crate::session::{Session, SessionStore, Subscription};

/// Lifecycle phase of a coordinator subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorPhase {
    Unsubscribed,
    Loading,
    Ready,
}

/// Observable `(loading, session)` pair read by the entry gate and screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub loading: bool,
    pub session: Option<Session>,
}

impl AuthSnapshot {
    pub fn loading() -> Self {
        Self {
            loading: true,
            session: None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }
}

#[derive(Debug)]
struct SubscriptionState {
    phase: CoordinatorPhase,
    current_session: Option<Session>,
    is_loading: bool,
    is_initial_notification: bool,
}

impl SubscriptionState {
    fn new() -> Self {
        Self {
            phase: CoordinatorPhase::Loading,
            current_session: None,
            is_loading: true,
            is_initial_notification: true,
        }
    }

    /// Record a notification; returns whether it should redirect.
    fn observe(&mut self, session: Option<&Session>) -> bool {
        self.current_session = session.cloned();
        self.is_loading = false;
        self.phase = CoordinatorPhase::Ready;
        let initial = self.is_initial_notification;
        self.is_initial_notification = false;
        !initial
    }
}

fn lock(state: &Mutex<SubscriptionState>) -> MutexGuard<'_, SubscriptionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Starts coordinator subscriptions against a session store.
#[derive(Debug, Clone)]
pub struct AuthCoordinator {
    dispatcher: RedirectDispatcher,
}

impl AuthCoordinator {
    pub fn new(dispatcher: RedirectDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Subscribe to `store`.
    ///
    /// `on_change` runs for every notification, the first included. Redirects
    /// are dispatched for every notification except the first, whether or not
    /// the session differs from the previous one.
    pub fn start<F>(&self, store: &SessionStore, on_change: F) -> CoordinatorHandle
    where
        F: Fn(Option<&Session>) + Send + Sync + 'static,
    {
        let state = Arc::new(Mutex::new(SubscriptionState::new()));
        let (snapshot_tx, snapshot_rx) = watch::channel(AuthSnapshot::loading());
        let dispatcher = self.dispatcher.clone();

        let listener_state = state.clone();
        let subscription = store.subscribe(Arc::new(move |session: Option<&Session>| {
            let redirect = lock(&listener_state).observe(session);
            snapshot_tx.send_replace(AuthSnapshot {
                loading: false,
                session: session.cloned(),
            });

            match session {
                Some(s) => tracing::info!(
                    uid = %s.uid(),
                    email = s.email().unwrap_or("-"),
                    initial = !redirect,
                    "auth state changed: signed in"
                ),
                None => tracing::info!(initial = !redirect, "auth state changed: signed out"),
            }

            on_change(session);
            if redirect {
                dispatcher.dispatch(session);
            }
        }));

        CoordinatorHandle {
            state,
            snapshot_rx,
            subscription: Some(subscription),
        }
    }
}

/// A live coordinator subscription. Dropping it unsubscribes.
pub struct CoordinatorHandle {
    state: Arc<Mutex<SubscriptionState>>,
    snapshot_rx: watch::Receiver<AuthSnapshot>,
    subscription: Option<Subscription>,
}

impl fmt::Debug for CoordinatorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoordinatorHandle")
            .field("phase", &self.phase())
            .field("subscribed", &self.subscription.is_some())
            .finish()
    }
}

impl CoordinatorHandle {
    pub fn phase(&self) -> CoordinatorPhase {
        lock(&self.state).phase
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.state).is_loading
    }

    pub fn current_session(&self) -> Option<Session> {
        lock(&self.state).current_session.clone()
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Subscribe to snapshot changes via a [`watch::Receiver`].
    pub fn watch_snapshot(&self) -> watch::Receiver<AuthSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Snapshot changes as a stream, starting with the current value.
    pub fn snapshot_stream(&self) -> WatchStream<AuthSnapshot> {
        WatchStream::new(self.snapshot_rx.clone())
    }

    /// Release the store subscription. No callbacks or redirects start after
    /// this returns; redirects already scheduled still complete.
    pub fn stop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            lock(&self.state).phase = CoordinatorPhase::Unsubscribed;
            tracing::debug!("auth coordinator stopped");
        }
    }
}

impl Drop for CoordinatorHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
