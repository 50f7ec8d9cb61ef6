//! Notica: authentication state and redirect coordination.
//!
//! Bridges Apple / Google sign-in into a federated identity backend, observes
//! the backend's session store, and drives one-way navigation between the
//! signed-out and signed-in areas of the app.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use notica::prelude::*;
//! use notica::sim::{InMemoryIdentityBackend, ScriptedAppleProvider, ScriptedGoogleProvider};
//!
//! # async fn example() -> notica::error::Result<()> {
//! let backend = Arc::new(InMemoryIdentityBackend::new());
//! let router = Arc::new(StackRouter::new());
//! let mut app = NoticaApp::launch(
//!     NoticaConfig::default(),
//!     backend.clone(),
//!     Arc::new(ScriptedAppleProvider::new()),
//!     Arc::new(ScriptedGoogleProvider::new()),
//!     router.clone(),
//! )?;
//!
//! backend.restore(None);
//! app.settle().await;
//! app.sign_in().sign_in_with_google().await?;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod auth;
pub mod backend;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod navigation;
pub mod prelude;
pub mod provider;
pub mod session;
pub mod sim;

pub use app::NoticaApp;

#[cfg(feature = "cli")]
pub mod cli;
