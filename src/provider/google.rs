use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::ProviderError;

/// Client configuration applied to the Google SDK before first use.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    pub web_client_id: String,
    pub offline_access: bool,
}

/// Status codes the Google SDK attaches to its failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum GoogleStatusCode {
    SignInCancelled,
    InProgress,
    PlayServicesNotAvailable,
    SignInRequired,
    Other,
}

/// Profile returned on a successful Google sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleUser {
    pub id: String,
    pub id_token: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Result of `sign_in`: the SDK reports dismissal as a value, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum GoogleSignInResponse {
    Success(GoogleUser),
    Cancelled,
}

impl GoogleSignInResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Google Sign-In SDK.
#[async_trait]
pub trait GoogleAuthProvider: Send + Sync {
    fn configure(&self, config: &GoogleConfig);

    /// Fails with [`GoogleStatusCode::PlayServicesNotAvailable`] when the
    /// device cannot run Google sign-in.
    async fn has_play_services(&self, show_update_dialog: bool) -> Result<(), ProviderError>;

    async fn sign_in(&self) -> Result<GoogleSignInResponse, ProviderError>;

    async fn sign_out(&self) -> Result<(), ProviderError>;

    async fn revoke_access(&self) -> Result<(), ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_in_response_uses_sdk_wire_shape() {
        let raw = r#"{"type":"success","data":{"id":"g-1","id_token":"tok","email":null,"name":null}}"#;
        let parsed: GoogleSignInResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.is_success());

        let cancelled: GoogleSignInResponse = serde_json::from_str(r#"{"type":"cancelled"}"#).unwrap();
        assert_eq!(cancelled, GoogleSignInResponse::Cancelled);
    }

    #[test]
    fn status_codes_render_like_the_sdk() {
        assert_eq!(GoogleStatusCode::SignInCancelled.to_string(), "SIGN_IN_CANCELLED");
        assert_eq!(
            "PLAY_SERVICES_NOT_AVAILABLE".parse::<GoogleStatusCode>().unwrap(),
            GoogleStatusCode::PlayServicesNotAvailable
        );
    }
}
