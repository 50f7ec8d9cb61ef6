use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identity provider family a session (or credential) originates from.
///
/// Parsed from the backend provider id (`apple.com`, `google.com`); any other
/// id maps to [`ProviderKind::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProviderKind {
    Apple,
    Google,
    Unknown,
}

impl ProviderKind {
    /// Resolve a backend provider id such as `apple.com`.
    pub fn from_provider_id(provider_id: &str) -> Self {
        match provider_id {
            "apple.com" => Self::Apple,
            "google.com" => Self::Google,
            _ => Self::Unknown,
        }
    }

    /// The backend provider id for this kind, if it has one.
    pub fn provider_id(&self) -> Option<&'static str> {
        match self {
            Self::Apple => Some("apple.com"),
            Self::Google => Some("google.com"),
            Self::Unknown => None,
        }
    }

    /// Human readable label shown on the signed-in screen.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Apple => "Apple",
            Self::Google => "Google",
            Self::Unknown => "Unknown Provider",
        }
    }
}

/// One identity provider linked to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedProvider {
    pub provider_id: String,
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl LinkedProvider {
    pub fn new(provider_id: impl Into<String>, uid: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            uid: uid.into(),
            email: None,
            display_name: None,
        }
    }

    pub fn kind(&self) -> ProviderKind {
        ProviderKind::from_provider_id(&self.provider_id)
    }
}

/// An authenticated identity issued by the identity backend.
///
/// Signed-out state is `Option::<Session>::None`; a `Session` value always
/// carries at least one linked provider, the first being the primary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    uid: String,
    display_name: Option<String>,
    email: Option<String>,
    providers: Vec<LinkedProvider>,
    created_at: DateTime<Utc>,
    last_sign_in_at: DateTime<Utc>,
}

impl Session {
    /// Build a session. Returns `None` when `providers` is empty.
    pub fn new(uid: impl Into<String>, providers: Vec<LinkedProvider>) -> Option<Self> {
        if providers.is_empty() {
            return None;
        }
        let now = Utc::now();
        Some(Self {
            uid: uid.into(),
            display_name: None,
            email: None,
            providers,
            created_at: now,
            last_sign_in_at: now,
        })
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_last_sign_in_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_sign_in_at = at;
        self
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn providers(&self) -> &[LinkedProvider] {
        &self.providers
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_sign_in_at(&self) -> DateTime<Utc> {
        self.last_sign_in_at
    }

    /// The provider that established this session.
    pub fn primary_provider(&self) -> &LinkedProvider {
        // Non-empty by construction.
        &self.providers[0]
    }

    pub fn primary_kind(&self) -> ProviderKind {
        self.primary_provider().kind()
    }

    /// Greeting line for the signed-in screen.
    pub fn greeting(&self) -> String {
        match self.display_name() {
            Some(name) => format!("Hello, {name}"),
            None => "Hello!".to_string(),
        }
    }
}
