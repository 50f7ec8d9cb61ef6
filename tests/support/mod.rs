#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::subscriber::DefaultGuard;

use notica::auth::{AccountManager, SignInService};
use notica::coordinator::AuthCoordinator;
use notica::navigation::{RedirectDispatcher, StackRouter};
use notica::provider::GoogleConfig;
use notica::session::{LinkedProvider, ProviderKind, Session};
use notica::sim::{CallLog, InMemoryIdentityBackend, ScriptedAppleProvider, ScriptedGoogleProvider};

pub const REDIRECT_DELAY: Duration = Duration::from_millis(200);

/// Comfortably past any scheduled redirect.
pub const PAST_REDIRECT: Duration = Duration::from_millis(1_000);

/// Simulated collaborators sharing one call log.
pub struct Harness {
    pub log: CallLog,
    pub backend: Arc<InMemoryIdentityBackend>,
    pub apple: Arc<ScriptedAppleProvider>,
    pub google: Arc<ScriptedGoogleProvider>,
    pub router: Arc<StackRouter>,
}

impl Harness {
    pub fn new() -> Self {
        let log = CallLog::new();
        Self {
            backend: Arc::new(InMemoryIdentityBackend::new().with_call_log(log.clone())),
            apple: Arc::new(ScriptedAppleProvider::new().with_call_log(log.clone())),
            google: Arc::new(ScriptedGoogleProvider::new().with_call_log(log.clone())),
            router: Arc::new(StackRouter::new()),
            log,
        }
    }

    pub fn accounts(&self) -> AccountManager {
        AccountManager::builder()
            .backend(self.backend.clone())
            .apple(self.apple.clone())
            .google(self.google.clone())
            .build()
    }

    pub fn sign_in(&self) -> SignInService {
        SignInService::new(
            self.backend.clone(),
            self.apple.clone(),
            self.google.clone(),
            &GoogleConfig {
                web_client_id: "test-client.apps.googleusercontent.com".to_string(),
                offline_access: false,
            },
        )
    }

    /// Must be called inside a tokio runtime.
    pub fn coordinator(&self) -> AuthCoordinator {
        let dispatcher = RedirectDispatcher::new(self.router.clone(), REDIRECT_DELAY)
            .expect("tokio runtime");
        AuthCoordinator::new(dispatcher)
    }

    /// Calls recorded so far, excluding Google configuration.
    pub fn calls(&self) -> Vec<String> {
        self.log
            .calls()
            .into_iter()
            .filter(|call| call != "google.configure")
            .collect()
    }
}

pub fn session(kind: ProviderKind) -> Session {
    let provider_id = kind.provider_id().unwrap_or("password");
    Session::new(
        format!("uid-{kind}"),
        vec![LinkedProvider::new(provider_id, format!("{kind}-sub"))],
    )
    .expect("provider list is non-empty")
}

/// Log lines written while a [`LogCapture`] is installed on this thread.
#[derive(Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Install a plain-text subscriber for the current thread. Works with
    /// `#[tokio::test]`, whose runtime polls on the test thread.
    pub fn install() -> (Self, DefaultGuard) {
        let capture = Self::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish();
        (capture, tracing::subscriber::set_default(subscriber))
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }

    /// Lines at `level` (`"ERROR"`, `"WARN"`, ...).
    pub fn lines_at(&self, level: &str) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.contains(level))
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
