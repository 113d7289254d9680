use std::fmt;
use std::sync::{Arc, RwLock};

use tracing::warn;

use crate::errors::{ApiError, Result};

/// Durable backend for the session token.
///
/// Exactly one token is stored at a time; a save replaces whatever was
/// there. Read failures are absence, never a crash.
#[async_trait::async_trait]
pub trait TokenStore: Send + Sync {
    /// Read the persisted token, if any.
    async fn load(&self) -> Option<String>;

    /// Persist the token, replacing any previous one.
    async fn save(&self, token: &str) -> Result<()>;

    /// Remove the persisted token. A no-op when nothing is stored.
    async fn clear(&self) -> Result<()>;
}

/// In-memory token store for tests and storage-less contexts.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    token: Arc<RwLock<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Option<String> {
        self.token.read().ok()?.clone()
    }

    async fn save(&self, token: &str) -> Result<()> {
        *self
            .token
            .write()
            .map_err(|_| ApiError::InvalidResponse("Lock poisoned".to_string()))? =
            Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self
            .token
            .write()
            .map_err(|_| ApiError::InvalidResponse("Lock poisoned".to_string()))? = None;
        Ok(())
    }
}

/// Owner of the active session token.
///
/// Keeps an in-memory copy and writes through to an optional durable
/// backend. Every mutation updates both layers before returning, so the two
/// never observably diverge. The backend is optional: without one the store
/// behaves identically minus persistence.
#[derive(Clone)]
pub struct SessionStore {
    cached: Arc<RwLock<Option<String>>>,
    backend: Option<Arc<dyn TokenStore>>,
}

impl SessionStore {
    /// Store with no durable backend.
    pub fn in_memory() -> Self {
        Self {
            cached: Arc::new(RwLock::new(None)),
            backend: None,
        }
    }

    /// Store that writes through to a durable backend.
    pub fn with_backend(backend: Arc<dyn TokenStore>) -> Self {
        Self {
            cached: Arc::new(RwLock::new(None)),
            backend: Some(backend),
        }
    }

    /// Current token: the in-memory value first, then the backend (cached on
    /// a hit). Storage failures read as "no token"; this never raises.
    pub async fn token(&self) -> Option<String> {
        if let Some(token) = self.cached.read().ok().and_then(|slot| slot.clone()) {
            return Some(token);
        }

        let token = self.backend.as_ref()?.load().await?;
        if let Ok(mut slot) = self.cached.write() {
            *slot = Some(token.clone());
        }
        Some(token)
    }

    /// Replace the active token, writing through to the backend when
    /// `persist` is set. Last write wins.
    pub async fn set_token(&self, token: &str, persist: bool) -> Result<()> {
        if let Ok(mut slot) = self.cached.write() {
            *slot = Some(token.to_string());
        }

        if persist && let Some(backend) = &self.backend {
            backend.save(token).await?;
        }

        Ok(())
    }

    /// Drop the active token from memory and the backend. Idempotent.
    pub async fn clear_token(&self) -> Result<()> {
        if let Ok(mut slot) = self.cached.write() {
            *slot = None;
        }

        if let Some(backend) = &self.backend {
            backend.clear().await?;
        }

        Ok(())
    }

    /// Whether durable storage is available in this context.
    pub fn is_durable(&self) -> bool {
        self.backend.is_some()
    }

    /// Clear only the in-memory copy, keeping durable state untouched.
    pub fn drop_cached(&self) {
        match self.cached.write() {
            Ok(mut slot) => *slot = None,
            Err(_) => warn!("token cache lock poisoned"),
        }
    }
}

// Tokens are credentials; Debug must not print them.
impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field(
                "cached",
                &self
                    .cached
                    .read()
                    .map(|slot| slot.is_some())
                    .unwrap_or(false),
            )
            .field("durable", &self.backend.is_some())
            .finish()
    }
}
