//! CLI entry point for notica.

pub mod run;

use clap::{Parser, Subcommand, ValueEnum};

/// Notica auth flow driver
#[derive(Parser, Debug)]
#[command(name = "notica", version, about = "Notica auth state and redirect driver")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a scripted auth session against the in-memory backend
    Run(RunArgs),
    /// Show the resolved configuration
    Config(ConfigArgs),
}

/// Session restored by the backend at launch.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restore {
    None,
    Apple,
    Google,
}

/// One user action in a scripted session.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    SignInApple,
    SignInGoogle,
    CancelGoogle,
    SignOut,
    DeleteAccount,
    CancelDelete,
}

/// Arguments for `notica run`.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Session the backend restores at launch
    #[arg(long, value_enum, default_value = "none")]
    pub restore: Restore,

    /// Actions to perform, in order
    #[arg(value_enum)]
    pub steps: Vec<Step>,

    /// Simulate a platform without Sign in with Apple
    #[arg(long)]
    pub no_apple: bool,

    /// Override the redirect delay in milliseconds
    #[arg(long)]
    pub redirect_delay_ms: Option<u64>,

    /// Print the final auth snapshot as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `notica config`.
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Print the config file location instead of its contents
    #[arg(long)]
    pub path: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_run_with_steps() {
        let cli = Cli::try_parse_from([
            "notica",
            "run",
            "--restore",
            "google",
            "sign-out",
            "sign-in-apple",
            "delete-account",
        ])
        .unwrap();
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.restore, Restore::Google);
                assert_eq!(
                    args.steps,
                    vec![Step::SignOut, Step::SignInApple, Step::DeleteAccount]
                );
                assert!(!args.json);
            }
            other => panic!("expected Run, got {other:?}"),
        }
    }

    #[test]
    fn parse_run_defaults() {
        let cli = Cli::try_parse_from(["notica", "run"]).unwrap();
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.restore, Restore::None);
                assert!(args.steps.is_empty());
                assert!(args.redirect_delay_ms.is_none());
            }
            other => panic!("expected Run, got {other:?}"),
        }
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::try_parse_from(["notica", "config", "--path"]).unwrap();
        assert!(matches!(cli.command, Commands::Config(ConfigArgs { path: true })));
    }

    #[test]
    fn parse_unknown_step_is_error() {
        assert!(Cli::try_parse_from(["notica", "run", "fly"]).is_err());
    }

    #[test]
    fn parse_missing_subcommand_is_error() {
        assert!(Cli::try_parse_from(["notica"]).is_err());
    }
}
