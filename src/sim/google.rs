use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::provider::{
    GoogleAuthProvider, GoogleConfig, GoogleSignInResponse, GoogleStatusCode, GoogleUser,
    ProviderError,
};

use super::CallLog;

#[derive(Default)]
struct GoogleState {
    config: Option<GoogleConfig>,
    signed_in: bool,
    play_services: Option<ProviderError>,
    queued: VecDeque<Result<GoogleSignInResponse, ProviderError>>,
    sign_out_failure: Option<ProviderError>,
    revoke_failure: Option<ProviderError>,
}

/// Google SDK stand-in.
///
/// With nothing queued, `sign_in` succeeds with a fixed ID token. Signing out
/// while not signed in fails with `SIGN_IN_REQUIRED`, as the SDK does.
pub struct ScriptedGoogleProvider {
    id_token: String,
    state: Mutex<GoogleState>,
    log: CallLog,
}

impl Default for ScriptedGoogleProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedGoogleProvider {
    pub fn new() -> Self {
        Self {
            id_token: "google-id-token".to_string(),
            state: Mutex::new(GoogleState::default()),
            log: CallLog::new(),
        }
    }

    pub fn with_id_token(mut self, token: impl Into<String>) -> Self {
        self.id_token = token.into();
        self
    }

    pub fn with_call_log(mut self, log: CallLog) -> Self {
        self.log = log;
        self
    }

    pub fn push_sign_in(&self, result: Result<GoogleSignInResponse, ProviderError>) {
        self.lock().queued.push_back(result);
    }

    pub fn without_play_services(self) -> Self {
        self.lock().play_services = Some(ProviderError::google(
            GoogleStatusCode::PlayServicesNotAvailable,
            "Google Play Services not available",
        ));
        self
    }

    pub fn fail_sign_out(&self, error: ProviderError) {
        self.lock().sign_out_failure = Some(error);
    }

    pub fn fail_revoke_access(&self, error: ProviderError) {
        self.lock().revoke_failure = Some(error);
    }

    pub fn configured(&self) -> Option<GoogleConfig> {
        self.lock().config.clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.lock().signed_in
    }

    fn lock(&self) -> MutexGuard<'_, GoogleState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn not_signed_in() -> ProviderError {
        ProviderError::google(GoogleStatusCode::SignInRequired, "no Google user is signed in")
    }
}

#[async_trait]
impl GoogleAuthProvider for ScriptedGoogleProvider {
    fn configure(&self, config: &GoogleConfig) {
        self.log.record("google.configure");
        self.lock().config = Some(config.clone());
    }

    async fn has_play_services(&self, _show_update_dialog: bool) -> Result<(), ProviderError> {
        self.log.record("google.has_play_services");
        match self.lock().play_services.clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn sign_in(&self) -> Result<GoogleSignInResponse, ProviderError> {
        self.log.record("google.sign_in");
        let mut state = self.lock();
        let result = state.queued.pop_front().unwrap_or_else(|| {
            Ok(GoogleSignInResponse::Success(GoogleUser {
                id: "google-user".to_string(),
                id_token: self.id_token.clone(),
                email: None,
                name: None,
            }))
        });
        if matches!(result, Ok(GoogleSignInResponse::Success(_))) {
            state.signed_in = true;
        }
        result
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.log.record("google.sign_out");
        let mut state = self.lock();
        if let Some(error) = state.sign_out_failure.clone() {
            return Err(error);
        }
        if !state.signed_in {
            return Err(Self::not_signed_in());
        }
        state.signed_in = false;
        Ok(())
    }

    async fn revoke_access(&self) -> Result<(), ProviderError> {
        self.log.record("google.revoke_access");
        let mut state = self.lock();
        if let Some(error) = state.revoke_failure.clone() {
            return Err(error);
        }
        if !state.signed_in {
            return Err(Self::not_signed_in());
        }
        state.signed_in = false;
        Ok(())
    }
}
