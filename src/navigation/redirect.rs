use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use crate::error::NoticaError;
use crate::session::Session;

use super::{Route, Router};

/// Schedules one delayed `replace` per dispatch.
///
/// The delay keeps navigation out of the render pass that produced the state
/// change. Each dispatch is independent: earlier pending navigations are not
/// cancelled. A zero delay navigates immediately.
#[derive(Clone)]
pub struct RedirectDispatcher {
    router: Arc<dyn Router>,
    delay: Duration,
    runtime: Handle,
}

impl fmt::Debug for RedirectDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedirectDispatcher")
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

impl RedirectDispatcher {
    /// Build a dispatcher on the current tokio runtime.
    pub fn new(router: Arc<dyn Router>, delay: Duration) -> Result<Self, NoticaError> {
        let runtime = Handle::try_current().map_err(|e| {
            NoticaError::Configuration(format!("redirect dispatcher needs a tokio runtime: {e}"))
        })?;
        Ok(Self::with_handle(router, delay, runtime))
    }

    pub fn with_handle(router: Arc<dyn Router>, delay: Duration, runtime: Handle) -> Self {
        Self {
            router,
            delay,
            runtime,
        }
    }

    /// Same router and runtime, different delay.
    pub fn with_delay(&self, delay: Duration) -> Self {
        Self {
            router: self.router.clone(),
            delay,
            runtime: self.runtime.clone(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Navigate to the area matching `session` after the configured delay.
    pub fn dispatch(&self, session: Option<&Session>) {
        let route = Route::for_session(session);
        tracing::debug!(%route, delay_ms = self.delay.as_millis() as u64, "redirect scheduled");

        if self.delay.is_zero() {
            self.router.replace(route);
            return;
        }

        let router = self.router.clone();
        let delay = self.delay;
        self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            router.replace(route);
        });
    }
}
