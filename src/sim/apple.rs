use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::provider::{
    AppleAuthProvider, AppleAuthRequest, AppleAuthResponse, AppleOperation, ProviderError,
};

use super::CallLog;

type Scripted = Result<AppleAuthResponse, ProviderError>;

#[derive(Default)]
struct AppleState {
    queued: VecDeque<Scripted>,
    requests: Vec<AppleAuthRequest>,
}

/// Apple SDK stand-in returning queued responses.
///
/// With nothing queued, a login yields an identity token and a refresh yields
/// an authorization code.
pub struct ScriptedAppleProvider {
    supported: bool,
    identity_token: String,
    state: Mutex<AppleState>,
    log: CallLog,
}

impl Default for ScriptedAppleProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedAppleProvider {
    pub fn new() -> Self {
        Self {
            supported: true,
            identity_token: "apple-identity-token".to_string(),
            state: Mutex::new(AppleState::default()),
            log: CallLog::new(),
        }
    }

    pub fn unsupported(mut self) -> Self {
        self.supported = false;
        self
    }

    pub fn with_identity_token(mut self, token: impl Into<String>) -> Self {
        self.identity_token = token.into();
        self
    }

    pub fn with_call_log(mut self, log: CallLog) -> Self {
        self.log = log;
        self
    }

    /// Queue the result of the next `perform_request`.
    pub fn push_response(&self, response: Scripted) {
        self.lock().queued.push_back(response);
    }

    pub fn requests(&self) -> Vec<AppleAuthRequest> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, AppleState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn default_response(&self, request: &AppleAuthRequest) -> AppleAuthResponse {
        match request.operation {
            Some(AppleOperation::Refresh) => AppleAuthResponse {
                authorization_code: Some("apple-authorization-code".to_string()),
                ..Default::default()
            },
            _ => AppleAuthResponse {
                user: Some("apple-user".to_string()),
                identity_token: Some(self.identity_token.clone()),
                authorization_code: Some("apple-authorization-code".to_string()),
                ..Default::default()
            },
        }
    }
}

#[async_trait]
impl AppleAuthProvider for ScriptedAppleProvider {
    fn is_supported(&self) -> bool {
        self.supported
    }

    async fn perform_request(
        &self,
        request: AppleAuthRequest,
    ) -> Result<AppleAuthResponse, ProviderError> {
        let operation = request
            .operation
            .map(|op| op.to_string())
            .unwrap_or_else(|| "implicit".to_string());
        self.log.record(format!("apple.perform_request({operation})"));

        if !self.supported {
            return Err(ProviderError::Unavailable(
                "Sign in with Apple is not supported on this device".to_string(),
            ));
        }

        let queued = {
            let mut state = self.lock();
            state.requests.push(request.clone());
            state.queued.pop_front()
        };
        queued.unwrap_or_else(|| Ok(self.default_response(&request)))
    }
}
