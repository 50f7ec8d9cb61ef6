use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::ProviderError;

/// Operation requested from Sign in with Apple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AppleOperation {
    Login,
    Refresh,
    Logout,
}

/// Data scopes requested on login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AppleScope {
    FullName,
    Email,
}

/// A request handed to the Apple SDK.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppleAuthRequest {
    pub operation: Option<AppleOperation>,
    pub scopes: Vec<AppleScope>,
    /// SHA-256 hex digest of the raw nonce, forwarded to Apple.
    pub hashed_nonce: Option<String>,
}

impl AppleAuthRequest {
    pub fn login(hashed_nonce: impl Into<String>) -> Self {
        Self {
            operation: Some(AppleOperation::Login),
            scopes: vec![AppleScope::FullName, AppleScope::Email],
            hashed_nonce: Some(hashed_nonce.into()),
        }
    }

    pub fn refresh() -> Self {
        Self {
            operation: Some(AppleOperation::Refresh),
            scopes: Vec::new(),
            hashed_nonce: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppleFullName {
    pub given_name: Option<String>,
    pub family_name: Option<String>,
}

impl AppleFullName {
    pub fn display(&self) -> Option<String> {
        let parts: Vec<&str> = [self.given_name.as_deref(), self.family_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    }
}

/// Fields returned by the Apple SDK. Every field may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppleAuthResponse {
    pub user: Option<String>,
    pub identity_token: Option<String>,
    pub nonce: Option<String>,
    pub authorization_code: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<AppleFullName>,
}

/// Sign in with Apple SDK.
#[async_trait]
pub trait AppleAuthProvider: Send + Sync {
    /// Apple sign-in is only offered where the platform supports it.
    fn is_supported(&self) -> bool;

    async fn perform_request(
        &self,
        request: AppleAuthRequest,
    ) -> Result<AppleAuthResponse, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_request_asks_for_name_and_email() {
        let request = AppleAuthRequest::login("abc");
        assert_eq!(request.operation, Some(AppleOperation::Login));
        assert_eq!(request.scopes, vec![AppleScope::FullName, AppleScope::Email]);
        assert_eq!(request.hashed_nonce.as_deref(), Some("abc"));
    }

    #[test]
    fn refresh_request_has_no_scopes() {
        let request = AppleAuthRequest::refresh();
        assert_eq!(request.operation, Some(AppleOperation::Refresh));
        assert!(request.scopes.is_empty());
    }

    #[test]
    fn full_name_joins_present_parts() {
        let name = AppleFullName {
            given_name: Some("Ada".into()),
            family_name: Some("Lovelace".into()),
        };
        assert_eq!(name.display().as_deref(), Some("Ada Lovelace"));
        assert_eq!(AppleFullName::default().display(), None);
    }
}
