//! Tests for the error system.

use pretty_assertions::assert_eq;

use notica::auth::{AuthError, RevocationError, UserAction};
use notica::backend::BackendError;
use notica::error::NoticaError;
use notica::provider::{GoogleStatusCode, ProviderError};
use notica::session::ProviderKind;

#[test]
fn auth_errors_display_transparently() {
    let err: NoticaError = AuthError::NoActiveSession.into();
    assert_eq!(err.to_string(), "No user is currently signed in");
    assert!(matches!(err.as_auth(), Some(AuthError::NoActiveSession)));
}

#[test]
fn backend_failures_keep_their_source() {
    use std::error::Error;

    let err = AuthError::DeleteAccount(BackendError::RequiresRecentLogin);
    assert_eq!(
        err.to_string(),
        "Account deletion failed: Recent sign-in required"
    );
    assert!(err.source().is_some());
    assert!(err.is_backend_failure());
}

#[test]
fn provider_error_mentions_provider() {
    let err = AuthError::provider(
        ProviderKind::Google,
        ProviderError::google(GoogleStatusCode::InProgress, "busy"),
    );
    assert!(err.to_string().starts_with("google provider error"));
    assert!(!err.is_backend_failure());
}

#[test]
fn alerts_are_chosen_per_action() {
    struct Case {
        error: AuthError,
        action: UserAction,
        expected_title: Option<&'static str>,
    }

    let cases = vec![
        Case {
            error: AuthError::provider(
                ProviderKind::Google,
                ProviderError::google(GoogleStatusCode::SignInCancelled, "dismissed"),
            ),
            action: UserAction::SignInWithGoogle,
            expected_title: None,
        },
        Case {
            error: AuthError::SignOut(BackendError::Network("offline".into())),
            action: UserAction::SignOut,
            expected_title: Some("Error"),
        },
        Case {
            error: AuthError::MissingToken("identityToken"),
            action: UserAction::SignInWithApple,
            expected_title: Some("Sign-In Error"),
        },
        Case {
            error: AuthError::Revocation(RevocationError::Refresh(ProviderError::Apple(
                "refresh failed".into(),
            ))),
            action: UserAction::DeleteAccount,
            expected_title: Some("Error"),
        },
    ];

    for case in cases {
        let title = case.error.user_alert(case.action).map(|alert| alert.title);
        assert_eq!(title.as_deref(), case.expected_title, "{:?}", case.error);
    }
}

#[test]
fn revocation_display_includes_cause() {
    let err = AuthError::Revocation(RevocationError::Backend(BackendError::NoCurrentUser));
    assert_eq!(
        err.to_string(),
        "Token revocation failed: backend rejected the authorization code: No user is currently signed in"
    );

    let unsupported = AuthError::Revocation(RevocationError::Unsupported(ProviderKind::Google));
    assert_eq!(
        unsupported.to_string(),
        "Token revocation failed: not supported for google"
    );
}

#[test]
fn io_errors_convert() {
    let err: NoticaError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(err, NoticaError::Io(_)));
    assert!(err.as_auth().is_none());
}
