//! Request layer for the hosteldamel client.
//!
//! This crate resolves the active deployment environment, talks to the
//! hosteldamel REST backend with bearer authentication, and owns the session
//! token storage the rest of the client reads through.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use hdm_api::{ApiClient, ClientConfig, EnvironmentConfig, FileTokenStore, SessionStore};
//!
//! #[tokio::main]
//! async fn main() -> hdm_api::Result<()> {
//!     // Resolve environment and base URL once at startup
//!     let environment = EnvironmentConfig::from_process_env(None);
//!
//!     // Durable token storage under the user's config directory
//!     let backend = FileTokenStore::new(FileTokenStore::default_storage_dir()?).await?;
//!     let store = SessionStore::with_backend(Arc::new(backend));
//!
//!     let client = ApiClient::new(ClientConfig::new(&environment), store)?;
//!
//!     // Authenticated calls pick the bearer up from the store
//!     let pets = client.pets().await?;
//!     println!("{} pets registered", pets.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Response normalization
//!
//! Replies are reduced to three outcomes: a parsed JSON payload, an
//! empty/non-JSON fallback, or a typed [`ApiError::Http`] whose message is
//! extracted from the backend's JSON error envelope (status text otherwise).
//! A success body that claims JSON but fails to parse is the fallback case,
//! never a hard failure.

pub mod client;
pub mod config;
pub mod errors;
pub mod file_store;
pub mod models;
pub mod store;

// Re-export main types
pub use client::ApiClient;
pub use config::{ClientConfig, Environment, EnvironmentConfig, HttpTimeouts};
pub use errors::{ApiError, ErrorDetails, GENERIC_ERROR_MESSAGE, Result, format_error};
pub use file_store::FileTokenStore;
pub use models::{
    AuthResponse, Document, DocumentKind, Pet, PetRegisterRequest, RegisterRequest, User,
};
pub use store::{MemoryTokenStore, SessionStore, TokenStore};
