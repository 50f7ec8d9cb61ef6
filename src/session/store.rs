//! Observable session state with a single writer.
//!
//! The identity backend owns the [`SessionPublisher`]; everything else holds a
//! cloneable [`SessionStore`] and can only read or subscribe.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use super::model::Session;

/// Callback invoked with the latest session on every store notification.
pub type SessionListener = Arc<dyn Fn(Option<&Session>) + Send + Sync>;

/// One registered listener.
///
/// `delivered` is the store version last handed to the listener. It is held
/// for the duration of a delivery, so deliveries to one listener never
/// overlap and a version older than one already delivered is dropped.
struct ListenerSlot {
    listener: SessionListener,
    active: AtomicBool,
    delivered: Mutex<u64>,
}

impl ListenerSlot {
    fn new(listener: SessionListener) -> Self {
        Self {
            listener,
            active: AtomicBool::new(true),
            delivered: Mutex::new(0),
        }
    }

    fn deliver(&self, version: u64, session: Option<&Session>) -> bool {
        let mut delivered = self
            .delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if version <= *delivered || !self.active.load(Ordering::Acquire) {
            return false;
        }
        *delivered = version;
        (self.listener)(session);
        true
    }
}

#[derive(Default)]
struct StoreState {
    hydrated: bool,
    /// Bumped on every publish; `0` until the first one.
    version: u64,
    current: Option<Session>,
    listeners: BTreeMap<u64, Arc<ListenerSlot>>,
    next_id: u64,
}

type SharedState = Arc<Mutex<StoreState>>;

fn lock(state: &Mutex<StoreState>) -> MutexGuard<'_, StoreState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Read-only handle to the current session.
///
/// Listeners registered with [`SessionStore::subscribe`] receive one delivery
/// once the backend has hydrated the store (immediately if it already has),
/// then one delivery per [`SessionPublisher::publish`], even when the
/// published value equals the previous one. When a publish races a
/// subscribe, the listener still ends on the store's current value.
///
/// A listener must not publish to the store it is subscribed to.
#[derive(Clone)]
pub struct SessionStore {
    state: SharedState,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("SessionStore")
            .field("hydrated", &state.hydrated)
            .field("signed_in", &state.current.is_some())
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

impl SessionStore {
    /// Create a store together with its only writer.
    pub fn channel() -> (SessionPublisher, SessionStore) {
        let state: SharedState = Arc::new(Mutex::new(StoreState::default()));
        (
            SessionPublisher {
                state: state.clone(),
            },
            SessionStore { state },
        )
    }

    /// The latest published session.
    pub fn current(&self) -> Option<Session> {
        lock(&self.state).current.clone()
    }

    /// Whether the backend has resolved its initial session yet.
    pub fn is_hydrated(&self) -> bool {
        lock(&self.state).hydrated
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.state).listeners.len()
    }

    /// Register a listener. Dropping the returned [`Subscription`] removes it.
    pub fn subscribe(&self, listener: SessionListener) -> Subscription {
        let slot = Arc::new(ListenerSlot::new(listener));
        let (id, replay) = {
            let mut state = lock(&self.state);
            let id = state.next_id;
            state.next_id += 1;
            state.listeners.insert(id, slot.clone());
            let replay = state
                .hydrated
                .then(|| (state.version, state.current.clone()));
            (id, replay)
        };

        // A publish landing after the insert above carries a newer version,
        // so whichever delivery runs second is dropped if it is stale.
        if let Some((version, current)) = replay {
            slot.deliver(version, current.as_ref());
        }

        Subscription {
            state: Arc::downgrade(&self.state),
            id,
            slot,
        }
    }
}

/// Write side of the session store, held by the identity backend.
pub struct SessionPublisher {
    state: SharedState,
}

impl fmt::Debug for SessionPublisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionPublisher").finish_non_exhaustive()
    }
}

impl SessionPublisher {
    /// Replace the current session and notify every listener.
    ///
    /// The first call also marks the store hydrated.
    pub fn publish(&self, session: Option<Session>) {
        let (version, targets) = {
            let mut state = lock(&self.state);
            state.hydrated = true;
            state.version += 1;
            state.current = session.clone();
            let targets: Vec<Arc<ListenerSlot>> = state.listeners.values().cloned().collect();
            (state.version, targets)
        };

        // Listeners run outside the store lock so they may read or unsubscribe.
        for slot in targets {
            slot.deliver(version, session.as_ref());
        }
    }

    /// A read handle onto the same state.
    pub fn store(&self) -> SessionStore {
        SessionStore {
            state: self.state.clone(),
        }
    }
}

/// Live registration of a [`SessionListener`].
///
/// No delivery starts after [`Subscription::unsubscribe`] or drop.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    state: Weak<Mutex<StoreState>>,
    id: u64,
    slot: Arc<ListenerSlot>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        self.slot.active.load(Ordering::Acquire)
    }

    pub fn unsubscribe(self) {
        drop(self);
    }

    fn release(&self) {
        self.slot.active.store(false, Ordering::Release);
        if let Some(state) = self.state.upgrade() {
            lock(&state).listeners.remove(&self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::model::LinkedProvider;

    fn google_session() -> Session {
        Session::new("uid-g", vec![LinkedProvider::new("google.com", "g-1")]).unwrap()
    }

    fn recording_listener() -> (SessionListener, Arc<Mutex<Vec<Option<String>>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let listener: SessionListener = Arc::new(move |session: Option<&Session>| {
            sink.lock()
                .unwrap()
                .push(session.map(|s| s.uid().to_string()));
        });
        (listener, seen)
    }

    #[test]
    fn subscribe_before_hydration_waits_for_first_publish() {
        let (publisher, store) = SessionStore::channel();
        let (listener, seen) = recording_listener();
        let _sub = store.subscribe(listener);
        assert!(seen.lock().unwrap().is_empty());

        publisher.publish(None);
        assert_eq!(*seen.lock().unwrap(), vec![None]);
        assert!(store.is_hydrated());
    }

    #[test]
    fn subscribe_after_hydration_replays_current_value() {
        let (publisher, store) = SessionStore::channel();
        publisher.publish(Some(google_session()));

        let (listener, seen) = recording_listener();
        let _sub = store.subscribe(listener);
        assert_eq!(*seen.lock().unwrap(), vec![Some("uid-g".to_string())]);
    }

    #[test]
    fn equal_values_are_delivered_each_time() {
        let (publisher, store) = SessionStore::channel();
        let (listener, seen) = recording_listener();
        let _sub = store.subscribe(listener);

        publisher.publish(None);
        publisher.publish(None);
        publisher.publish(None);
        assert_eq!(seen.lock().unwrap().len(), 3);
    }

    #[test]
    fn dropped_subscription_receives_nothing() {
        let (publisher, store) = SessionStore::channel();
        let (listener, seen) = recording_listener();
        let sub = store.subscribe(listener);
        publisher.publish(None);
        sub.unsubscribe();

        publisher.publish(Some(google_session()));
        assert_eq!(seen.lock().unwrap().len(), 1);
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn listener_may_read_store_while_notified() {
        let (publisher, store) = SessionStore::channel();
        let reader = store.clone();
        let observed = Arc::new(Mutex::new(None));
        let sink = observed.clone();
        let _sub = store.subscribe(Arc::new(move |_: Option<&Session>| {
            *sink.lock().unwrap() = Some(reader.current().is_some());
        }));

        publisher.publish(Some(google_session()));
        assert_eq!(*observed.lock().unwrap(), Some(true));
    }

    #[test]
    fn stale_delivery_after_newer_one_is_dropped() {
        let (listener, seen) = recording_listener();
        let slot = ListenerSlot::new(listener);

        assert!(slot.deliver(2, Some(&google_session())));
        assert!(!slot.deliver(1, None));
        assert!(!slot.deliver(2, None));

        assert_eq!(*seen.lock().unwrap(), vec![Some("uid-g".to_string())]);
    }

    #[test]
    fn racing_publish_and_subscribe_end_on_current_value() {
        for _ in 0..2_000 {
            let (publisher, store) = SessionStore::channel();
            publisher.publish(None);

            let (listener, seen) = recording_listener();
            let barrier = Arc::new(std::sync::Barrier::new(2));
            let publishing = {
                let barrier = barrier.clone();
                std::thread::spawn(move || {
                    barrier.wait();
                    publisher.publish(Some(google_session()));
                    publisher
                })
            };
            barrier.wait();
            let _sub = store.subscribe(listener);
            let _publisher = publishing.join().unwrap();

            let seen = seen.lock().unwrap();
            assert!(!seen.is_empty());
            assert_eq!(
                seen.last().cloned().flatten(),
                store.current().map(|s| s.uid().to_string())
            );
            assert!(seen.len() <= 2);
        }
    }

    #[test]
    fn subscription_outliving_store_drops_cleanly() {
        let (publisher, store) = SessionStore::channel();
        let (listener, _seen) = recording_listener();
        let sub = store.subscribe(listener);
        drop(publisher);
        drop(store);
        assert!(sub.is_active());
        drop(sub);
    }
}
