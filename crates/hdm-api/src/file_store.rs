use std::path::{Path, PathBuf};

use fs2::FileExt;
use tokio::fs;
use tracing::warn;

use crate::errors::{ApiError, Result};
use crate::store::TokenStore;

/// Single durable key holding the bearer token.
const TOKEN_FILE: &str = "auth_token";

/// File-based durable token store.
///
/// Persists the opaque bearer string in one file under the user's config
/// directory, so the session survives restarts but stays scoped to the
/// local profile.
///
/// # Directory Structure
/// ```text
/// ~/.config/hosteldamel/session/
/// ├── auth_token             # The bearer string
/// └── lock                   # Advisory lock file
/// ```
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    storage_dir: PathBuf,
    token_file: PathBuf,
    lock_file: PathBuf,
}

impl FileTokenStore {
    /// Create a store rooted at `storage_dir`, creating it if needed.
    pub async fn new(storage_dir: impl AsRef<Path>) -> Result<Self> {
        let storage_dir = storage_dir.as_ref().to_path_buf();

        fs::create_dir_all(&storage_dir).await?;

        // Keep the credential directory private (Unix only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o700);
            std::fs::set_permissions(&storage_dir, perms)?;
        }

        let token_file = storage_dir.join(TOKEN_FILE);
        let lock_file = storage_dir.join("lock");

        Ok(Self {
            storage_dir,
            token_file,
            lock_file,
        })
    }

    /// Get default storage directory for the current platform.
    pub fn default_storage_dir() -> Result<PathBuf> {
        let project_dirs = directories::ProjectDirs::from("", "", "hosteldamel").ok_or_else(|| {
            ApiError::InvalidResponse("Could not determine config directory".to_string())
        })?;

        Ok(project_dirs.config_dir().join("session"))
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// Acquire an exclusive advisory lock on the storage.
    fn acquire_lock(&self) -> Result<std::fs::File> {
        let lock_file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .open(&self.lock_file)?;

        lock_file.try_lock_exclusive()?;

        Ok(lock_file)
    }

    async fn read_token(&self) -> Result<Option<String>> {
        if !self.token_file.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.token_file).await?;
        let token = raw.trim();

        if token.is_empty() {
            Ok(None)
        } else {
            Ok(Some(token.to_string()))
        }
    }

    async fn write_token(&self, token: &str) -> Result<()> {
        // Atomic write: write to temp file, then rename
        let temp_path = self.token_file.with_extension("tmp");
        fs::write(&temp_path, token).await?;

        let file = std::fs::File::open(&temp_path)?;
        file.sync_all()?;

        fs::rename(&temp_path, &self.token_file).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.token_file, perms)?;
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Option<String> {
        match self.read_token().await {
            Ok(token) => token,
            Err(e) => {
                warn!("Failed to read stored token: {}", e);
                None
            }
        }
    }

    async fn save(&self, token: &str) -> Result<()> {
        let _lock = self.acquire_lock()?;
        self.write_token(token).await
    }

    async fn clear(&self) -> Result<()> {
        let _lock = self.acquire_lock()?;

        if self.token_file.exists() {
            fs::remove_file(&self.token_file).await?;
        }

        Ok(())
    }
}
