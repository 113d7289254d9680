//! Session layer for the hosteldamel client.
//!
//! Owns the authentication lifecycle: startup hydration from durable
//! storage, password login, registration, logout, and the Google OAuth
//! redirect + callback exchange. The [`AuthSession`] it exports is the sole
//! writer of authenticated-user state; the presentation layer receives one
//! instance at startup and reads through it.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use hdm_api::{ApiClient, ClientConfig, EnvironmentConfig, FileTokenStore, SessionStore};
//! use hdm_session::{AuthSession, SessionState};
//!
//! #[tokio::main]
//! async fn main() -> hdm_api::Result<()> {
//!     let environment = EnvironmentConfig::from_process_env(None);
//!     let backend = FileTokenStore::new(FileTokenStore::default_storage_dir()?).await?;
//!     let store = SessionStore::with_backend(Arc::new(backend));
//!     let client = ApiClient::new(ClientConfig::new(&environment), store)?;
//!
//!     let session = AuthSession::new(client);
//!     session.hydrate().await;
//!
//!     match session.state() {
//!         SessionState::Authenticated(user) => println!("Olá, {}!", user.nome),
//!         _ => println!("Faça login para continuar."),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod callback;
pub mod errors;
pub mod session;

// Re-export main types
pub use callback::{
    CallbackHandler, CallbackOutcome, CallbackParams, LOGIN_REDIRECT_DELAY, Notice, Route,
};
pub use errors::{AuthError, Result};
pub use session::{AuthSession, SessionState};
