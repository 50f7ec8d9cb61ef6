//! `notica run` and `notica config` handlers.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::app::NoticaApp;
use crate::auth::{ConfirmDecision, ConfirmPrompt, ConfirmationGate, DeleteOutcome, SignInOutcome};
use crate::auth::{AuthError, UserAction, UserAlert};
use crate::config::{default_config_path, NoticaConfig};
use crate::error::NoticaError;
use crate::navigation::StackRouter;
use crate::provider::GoogleSignInResponse;
use crate::session::{LinkedProvider, ProviderKind, Session};
use crate::sim::{InMemoryIdentityBackend, ScriptedAppleProvider, ScriptedGoogleProvider, SimProfile};

use super::{ConfigArgs, Restore, RunArgs, Step};

/// Answers every confirmation prompt the same way.
struct FixedDecision(ConfirmDecision);

#[async_trait]
impl ConfirmationGate for FixedDecision {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> ConfirmDecision {
        println!("? {}: {} -> {:?}", prompt.title, prompt.message, self.0);
        self.0
    }
}

pub async fn handle_run(args: RunArgs) -> Result<(), NoticaError> {
    let mut config = NoticaConfig::load()?;
    if let Some(ms) = args.redirect_delay_ms {
        config.navigation.redirect_delay_ms = ms;
    }
    let settle_wait = config.navigation.redirect_delay() + Duration::from_millis(50);

    let backend = Arc::new(InMemoryIdentityBackend::new().with_profile(
        "google-id-token",
        SimProfile {
            email: Some("user@gmail.com".to_string()),
            display_name: Some("Google User".to_string()),
        },
    ));
    let apple = if args.no_apple {
        ScriptedAppleProvider::new().unsupported()
    } else {
        ScriptedAppleProvider::new()
    };
    let google = Arc::new(ScriptedGoogleProvider::new());
    let router = Arc::new(StackRouter::new());

    let mut app = NoticaApp::launch(
        config,
        backend.clone(),
        Arc::new(apple),
        google.clone(),
        router.clone(),
    )?;
    println!("entry: {}", app.entry_view().label());

    backend.restore(restored_session(args.restore));
    if let Some(route) = app.settle().await {
        tokio::time::sleep(app.config().navigation.launch_redirect_delay()).await;
        println!("launch -> {route}");
    }

    for step in args.steps {
        run_step(&app, &google, step).await;
        tokio::time::sleep(settle_wait).await;
        match router.current() {
            Some(route) => println!("  route: {route}"),
            None => println!("  route: -"),
        }
    }

    if args.json {
        let snapshot = app.snapshot();
        let body = serde_json::json!({
            "loading": snapshot.loading,
            "session": snapshot.session,
            "route": router.current(),
            "history": router.history(),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    }

    app.shutdown();
    Ok(())
}

async fn run_step(app: &NoticaApp, google: &ScriptedGoogleProvider, step: Step) {
    println!("> {step:?}");
    let result = match step {
        Step::SignInApple => {
            if !app.sign_in().apple_available() {
                println!("  Sign in with Apple is not available on this device");
                return;
            }
            report_sign_in(app.sign_in().sign_in_with_apple().await, UserAction::SignInWithApple)
        }
        Step::SignInGoogle => {
            report_sign_in(app.sign_in().sign_in_with_google().await, UserAction::SignInWithGoogle)
        }
        Step::CancelGoogle => {
            google.push_sign_in(Ok(GoogleSignInResponse::Cancelled));
            report_sign_in(app.sign_in().sign_in_with_google().await, UserAction::SignInWithGoogle)
        }
        Step::SignOut => app
            .accounts()
            .sign_out()
            .await
            .map(|()| Some(UserAlert::signed_out()))
            .map_err(|e| (e, UserAction::SignOut)),
        Step::DeleteAccount | Step::CancelDelete => {
            let decision = if step == Step::DeleteAccount {
                ConfirmDecision::Confirm
            } else {
                ConfirmDecision::Cancel
            };
            app.accounts()
                .confirm_and_delete_account(&FixedDecision(decision))
                .await
                .map(|outcome| match outcome {
                    DeleteOutcome::Deleted => Some(UserAlert::account_deleted()),
                    DeleteOutcome::Cancelled => None,
                })
                .map_err(|e| (e, UserAction::DeleteAccount))
        }
    };

    match result {
        Ok(Some(alert)) => print_alert(&alert),
        Ok(None) => {}
        Err((error, action)) => {
            tracing::error!(%action, error = %error, "action failed");
            if let Some(alert) = error.user_alert(action) {
                print_alert(&alert);
            }
        }
    }
}

fn report_sign_in(
    result: Result<SignInOutcome, AuthError>,
    action: UserAction,
) -> Result<Option<UserAlert>, (AuthError, UserAction)> {
    match result {
        Ok(SignInOutcome::SignedIn(session)) => {
            println!(
                "  {} (signed in with {})",
                session.greeting(),
                session.primary_kind().label()
            );
            Ok(None)
        }
        Ok(SignInOutcome::Cancelled) => Ok(None),
        Err(error) => Err((error, action)),
    }
}

fn print_alert(alert: &UserAlert) {
    println!("  [{}] {}", alert.title, alert.message);
}

fn restored_session(restore: Restore) -> Option<Session> {
    let kind = match restore {
        Restore::None => return None,
        Restore::Apple => ProviderKind::Apple,
        Restore::Google => ProviderKind::Google,
    };
    let provider_id = kind.provider_id()?;
    let uid = uuid::Uuid::new_v4().to_string();
    Session::new(uid.clone(), vec![LinkedProvider::new(provider_id, format!("{kind}-{uid}"))])
}

pub fn handle_config(args: ConfigArgs) -> Result<(), NoticaError> {
    if args.path {
        println!("{}", default_config_path().display());
        return Ok(());
    }
    let config = NoticaConfig::load()?;
    print!("{}", config.to_toml()?);
    Ok(())
}
