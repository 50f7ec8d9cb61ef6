//! Provider sign-in results to federated credentials.

use std::fmt;

use crate::provider::{AppleAuthResponse, GoogleSignInResponse};
use crate::session::ProviderKind;

use super::error::AuthError;

/// Provider proof of identity accepted by the backend's credential exchange.
///
/// Consumed by the exchange call; never stored.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    Apple { identity_token: String, nonce: String },
    Google { id_token: String },
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Apple { nonce, .. } => f
                .debug_struct("Apple")
                .field("identity_token", &"..")
                .field("nonce_present", &!nonce.is_empty())
                .finish(),
            Self::Google { .. } => f.debug_struct("Google").field("id_token", &"..").finish(),
        }
    }
}

impl Credential {
    pub fn provider_kind(&self) -> ProviderKind {
        match self {
            Self::Apple { .. } => ProviderKind::Apple,
            Self::Google { .. } => ProviderKind::Google,
        }
    }
}

/// Raw provider result, tagged by the provider that produced it.
#[derive(Debug, Clone)]
pub enum ProviderSignIn {
    Apple(AppleAuthResponse),
    Google(GoogleSignInResponse),
}

impl ProviderSignIn {
    pub fn provider_kind(&self) -> ProviderKind {
        match self {
            Self::Apple(_) => ProviderKind::Apple,
            Self::Google(_) => ProviderKind::Google,
        }
    }
}

/// Adapter result: a credential, or the user backed out of the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialOutcome {
    Credential(Credential),
    Cancelled,
}

/// Convert a provider sign-in result into a backend credential.
///
/// Apple results must carry a non-empty identity token; the nonce is passed
/// through untouched. A Google result that is not `success` is reported as
/// [`CredentialOutcome::Cancelled`].
pub fn to_federated_credential(raw: ProviderSignIn) -> Result<CredentialOutcome, AuthError> {
    match raw {
        ProviderSignIn::Apple(response) => {
            let identity_token = response
                .identity_token
                .filter(|token| !token.is_empty())
                .ok_or(AuthError::MissingToken("identityToken"))?;
            Ok(CredentialOutcome::Credential(Credential::Apple {
                identity_token,
                nonce: response.nonce.unwrap_or_default(),
            }))
        }
        ProviderSignIn::Google(GoogleSignInResponse::Success(user)) => {
            Ok(CredentialOutcome::Credential(Credential::Google {
                id_token: user.id_token,
            }))
        }
        ProviderSignIn::Google(GoogleSignInResponse::Cancelled) => Ok(CredentialOutcome::Cancelled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::GoogleUser;

    fn apple(token: Option<&str>, nonce: Option<&str>) -> ProviderSignIn {
        ProviderSignIn::Apple(AppleAuthResponse {
            identity_token: token.map(String::from),
            nonce: nonce.map(String::from),
            ..Default::default()
        })
    }

    #[test]
    fn apple_without_identity_token_fails() {
        let err = to_federated_credential(apple(None, Some("n"))).unwrap_err();
        assert!(matches!(err, AuthError::MissingToken("identityToken")));
    }

    #[test]
    fn apple_with_empty_identity_token_fails() {
        let err = to_federated_credential(apple(Some(""), Some("n"))).unwrap_err();
        assert!(matches!(err, AuthError::MissingToken(_)));
    }

    #[test]
    fn apple_nonce_is_passed_through_unchecked() {
        for nonce in [None, Some(""), Some("not a real nonce")] {
            let outcome = to_federated_credential(apple(Some("id-tok"), nonce)).unwrap();
            assert_eq!(
                outcome,
                CredentialOutcome::Credential(Credential::Apple {
                    identity_token: "id-tok".to_string(),
                    nonce: nonce.unwrap_or_default().to_string(),
                })
            );
        }
    }

    #[test]
    fn google_cancel_is_not_an_error() {
        let outcome =
            to_federated_credential(ProviderSignIn::Google(GoogleSignInResponse::Cancelled))
                .unwrap();
        assert_eq!(outcome, CredentialOutcome::Cancelled);
    }

    #[test]
    fn google_success_keeps_id_token_unchanged() {
        let user = GoogleUser {
            id: "g-1".into(),
            id_token: "  raw.id.token ".into(),
            email: None,
            name: None,
        };
        let outcome =
            to_federated_credential(ProviderSignIn::Google(GoogleSignInResponse::Success(user)))
                .unwrap();
        match outcome {
            CredentialOutcome::Credential(credential) => {
                assert_eq!(credential.provider_kind(), ProviderKind::Google);
                assert_eq!(
                    credential,
                    Credential::Google {
                        id_token: "  raw.id.token ".into()
                    }
                );
            }
            other => panic!("expected credential, got {other:?}"),
        }
    }

    #[test]
    fn debug_output_redacts_tokens() {
        let credential = Credential::Apple {
            identity_token: "very-secret".into(),
            nonce: "n".into(),
        };
        assert!(!format!("{credential:?}").contains("very-secret"));
    }
}
