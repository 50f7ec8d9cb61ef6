use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::StreamExt;

use crate::coordinator::AuthSnapshot;

use super::{RedirectDispatcher, Route};

/// What the entry screen shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateView {
    /// Session not resolved yet; no navigation.
    Waiting,
    /// Settled; heading to `Route`.
    Redirecting(Route),
}

impl GateView {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Waiting => "Loading...",
            Self::Redirecting(_) => "Redirecting...",
        }
    }
}

/// Top-level entry screen.
///
/// Performs the launch-time redirect exactly once, when the snapshot first
/// settles. Later transitions belong to the coordinator, which deliberately
/// skips that first notification.
#[derive(Debug)]
pub struct EntryGate {
    dispatcher: RedirectDispatcher,
    settled: bool,
}

impl EntryGate {
    pub fn new(dispatcher: RedirectDispatcher) -> Self {
        Self {
            dispatcher,
            settled: false,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Decide the view for `snapshot`, dispatching on the first settle.
    pub fn render(&mut self, snapshot: &AuthSnapshot) -> GateView {
        if snapshot.loading {
            return GateView::Waiting;
        }
        let route = Route::for_session(snapshot.session.as_ref());
        if !self.settled {
            self.settled = true;
            tracing::info!(%route, "entry gate settled");
            self.dispatcher.dispatch(snapshot.session.as_ref());
        }
        GateView::Redirecting(route)
    }

    /// Render snapshots until the first settle. Returns `None` if the
    /// snapshot source closes while still loading.
    pub async fn await_settle(&mut self, snapshots: watch::Receiver<AuthSnapshot>) -> Option<Route> {
        let mut stream = WatchStream::new(snapshots);
        while let Some(snapshot) = stream.next().await {
            if let GateView::Redirecting(route) = self.render(&snapshot) {
                return Some(route);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::StackRouter;
    use crate::session::{LinkedProvider, Session};
    use std::sync::Arc;
    use std::time::Duration;

    fn gate(router: Arc<StackRouter>) -> EntryGate {
        EntryGate::new(RedirectDispatcher::new(router, Duration::from_millis(100)).unwrap())
    }

    fn signed_in() -> AuthSnapshot {
        AuthSnapshot {
            loading: false,
            session: Some(Session::new("u", vec![LinkedProvider::new("apple.com", "a")]).unwrap()),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn waiting_while_loading_takes_no_action() {
        let router = Arc::new(StackRouter::new());
        let mut gate = gate(router.clone());
        assert_eq!(gate.render(&AuthSnapshot::loading()), GateView::Waiting);
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(router.history().is_empty());
        assert!(!gate.is_settled());
    }

    #[tokio::test(start_paused = true)]
    async fn settle_dispatches_exactly_once() {
        let router = Arc::new(StackRouter::new());
        let mut gate = gate(router.clone());

        assert_eq!(gate.render(&signed_in()), GateView::Redirecting(Route::SignedIn));
        assert_eq!(gate.render(&signed_in()), GateView::Redirecting(Route::SignedIn));
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(router.history(), vec![Route::SignedIn]);
    }

    #[tokio::test(start_paused = true)]
    async fn await_settle_skips_loading_snapshots() {
        let router = Arc::new(StackRouter::new());
        let mut gate = gate(router.clone());
        let (tx, rx) = watch::channel(AuthSnapshot::loading());

        let task = tokio::spawn(async move { gate.await_settle(rx).await });
        tokio::task::yield_now().await;
        tx.send_replace(AuthSnapshot {
            loading: false,
            session: None,
        });

        assert_eq!(task.await.unwrap(), Some(Route::SignedOut));
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(router.history(), vec![Route::SignedOut]);
    }

    #[test]
    fn labels_match_entry_screen() {
        assert_eq!(GateView::Waiting.label(), "Loading...");
        assert_eq!(GateView::Redirecting(Route::SignedOut).label(), "Redirecting...");
    }
}
