use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use strum::Display;

use crate::auth::Credential;
use crate::backend::{BackendError, IdentityBackend};
use crate::session::{LinkedProvider, Session, SessionPublisher, SessionStore};

use super::CallLog;

/// Backend calls that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum BackendOp {
    SignInWithCredential,
    SignOut,
    RevokeToken,
    DeleteCurrentUser,
}

/// Profile attached to sessions issued for a given provider token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimProfile {
    pub email: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Default)]
struct BackendState {
    /// Provider subject (`provider_id:token`) to backend uid.
    accounts: HashMap<String, String>,
    profiles: HashMap<String, SimProfile>,
    failures: HashMap<BackendOp, BackendError>,
    revoked_codes: Vec<String>,
}

/// Identity backend kept entirely in memory.
///
/// The store starts un-hydrated; call [`InMemoryIdentityBackend::restore`] to
/// resolve the launch-time session.
pub struct InMemoryIdentityBackend {
    publisher: SessionPublisher,
    state: Mutex<BackendState>,
    log: CallLog,
}

impl Default for InMemoryIdentityBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryIdentityBackend {
    pub fn new() -> Self {
        let (publisher, _) = SessionStore::channel();
        Self {
            publisher,
            state: Mutex::new(BackendState::default()),
            log: CallLog::new(),
        }
    }

    pub fn with_call_log(mut self, log: CallLog) -> Self {
        self.log = log;
        self
    }

    /// Profile returned for sessions created from `token`.
    pub fn with_profile(self, token: impl Into<String>, profile: SimProfile) -> Self {
        self.lock().profiles.insert(token.into(), profile);
        self
    }

    /// Resolve persisted auth state; the store's first notification.
    pub fn restore(&self, session: Option<Session>) {
        self.publisher.publish(session);
    }

    /// Make every later call of `op` fail with `error`.
    pub fn fail(&self, op: BackendOp, error: BackendError) {
        self.lock().failures.insert(op, error);
    }

    pub fn clear_failure(&self, op: BackendOp) {
        self.lock().failures.remove(&op);
    }

    pub fn revoked_codes(&self) -> Vec<String> {
        self.lock().revoked_codes.clone()
    }

    pub fn account_count(&self) -> usize {
        self.lock().accounts.len()
    }

    fn lock(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(&self, op: BackendOp) -> Result<(), BackendError> {
        self.log.record(format!("backend.{op}"));
        match self.lock().failures.get(&op) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl IdentityBackend for InMemoryIdentityBackend {
    fn sessions(&self) -> SessionStore {
        self.publisher.store()
    }

    async fn sign_in_with_credential(
        &self,
        credential: Credential,
    ) -> Result<Session, BackendError> {
        self.check(BackendOp::SignInWithCredential)?;

        let provider = credential.provider_kind();
        let token = match &credential {
            Credential::Apple { identity_token, .. } => identity_token,
            Credential::Google { id_token } => id_token,
        };
        if token.trim().is_empty() {
            return Err(BackendError::InvalidCredential("empty token".to_string()));
        }
        let provider_id = provider
            .provider_id()
            .ok_or_else(|| BackendError::InvalidCredential(format!("unsupported provider {provider}")))?;

        let session = {
            let mut state = self.lock();
            let subject = format!("{provider_id}:{token}");
            let uid = state
                .accounts
                .entry(subject)
                .or_insert_with(|| uuid::Uuid::new_v4().to_string())
                .clone();
            let profile = state.profiles.get(token).cloned().unwrap_or_default();

            let mut linked = LinkedProvider::new(provider_id, format!("{provider}-{uid}"));
            linked.email = profile.email.clone();
            linked.display_name = profile.display_name.clone();
            let mut session = Session::new(uid, vec![linked])
                .ok_or_else(|| BackendError::Other("session without provider".to_string()))?
                .with_last_sign_in_at(Utc::now());
            if let Some(email) = profile.email {
                session = session.with_email(email);
            }
            if let Some(name) = profile.display_name {
                session = session.with_display_name(name);
            }
            session
        };

        self.publisher.publish(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        self.check(BackendOp::SignOut)?;
        self.publisher.publish(None);
        Ok(())
    }

    async fn revoke_token(&self, authorization_code: &str) -> Result<(), BackendError> {
        self.check(BackendOp::RevokeToken)?;
        self.lock().revoked_codes.push(authorization_code.to_string());
        Ok(())
    }

    async fn delete_current_user(&self) -> Result<(), BackendError> {
        self.check(BackendOp::DeleteCurrentUser)?;
        let session = self.sessions().current().ok_or(BackendError::NoCurrentUser)?;
        self.lock()
            .accounts
            .retain(|_, uid| uid.as_str() != session.uid());
        self.publisher.publish(None);
        Ok(())
    }
}
