//! Session model and the observable session store.

pub mod model;
pub mod store;

pub use model::{LinkedProvider, ProviderKind, Session};
pub use store::{SessionListener, SessionPublisher, SessionStore, Subscription};
