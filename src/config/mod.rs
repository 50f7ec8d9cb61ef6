//! Configuration system (layered: defaults < TOML file < environment).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::NoticaError;
use crate::provider::GoogleConfig;

const DEFAULT_REDIRECT_DELAY_MS: u64 = 200;
const DEFAULT_LAUNCH_REDIRECT_DELAY_MS: u64 = 100;

/// Redirect timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Delay before navigating after a sign-in or sign-out. `0` navigates
    /// straight from the state-change callback.
    pub redirect_delay_ms: u64,
    /// Delay before the entry screen's launch-time redirect.
    pub launch_redirect_delay_ms: u64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            redirect_delay_ms: DEFAULT_REDIRECT_DELAY_MS,
            launch_redirect_delay_ms: DEFAULT_LAUNCH_REDIRECT_DELAY_MS,
        }
    }
}

impl NavigationConfig {
    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }

    pub fn launch_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.launch_redirect_delay_ms)
    }
}

/// App configuration.
///
/// # Example
/// ```no_run
/// use notica::config::NoticaConfig;
///
/// let config = NoticaConfig::load()?;
/// println!("{:?}", config.navigation.redirect_delay());
/// # Ok::<(), notica::error::NoticaError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NoticaConfig {
    pub google: GoogleConfig,
    pub navigation: NavigationConfig,
}

impl NoticaConfig {
    /// Defaults, then the config file (`NOTICA_CONFIG` or the default path)
    /// if it exists, then environment overrides.
    pub fn load() -> Result<Self, NoticaError> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let path = std::env::var_os("NOTICA_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(default_config_path);
        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, NoticaError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, NoticaError> {
        Ok(toml::from_str(raw)?)
    }

    /// Apply `NOTICA_*` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), NoticaError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(id) = lookup("NOTICA_GOOGLE_WEB_CLIENT_ID") {
            self.google.web_client_id = id;
        }
        if let Some(raw) = lookup("NOTICA_GOOGLE_OFFLINE_ACCESS") {
            self.google.offline_access = parse_env("NOTICA_GOOGLE_OFFLINE_ACCESS", &raw)?;
        }
        if let Some(raw) = lookup("NOTICA_REDIRECT_DELAY_MS") {
            self.navigation.redirect_delay_ms = parse_env("NOTICA_REDIRECT_DELAY_MS", &raw)?;
        }
        if let Some(raw) = lookup("NOTICA_LAUNCH_REDIRECT_DELAY_MS") {
            self.navigation.launch_redirect_delay_ms =
                parse_env("NOTICA_LAUNCH_REDIRECT_DELAY_MS", &raw)?;
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, NoticaError> {
        toml::to_string_pretty(self).map_err(|e| NoticaError::Configuration(e.to_string()))
    }
}

pub fn default_config_path() -> PathBuf {
    directories::ProjectDirs::from("app", "notica", "notica")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from(".notica/config.toml"))
}

fn parse_env<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, NoticaError> {
    raw.trim()
        .parse()
        .map_err(|_| NoticaError::Configuration(format!("invalid value for {key}: {raw:?}")))
}
