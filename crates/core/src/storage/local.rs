//! Local filesystem fallback.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use opendal::{Operator, services};

use super::error::StorageError;

/// Writes files under a base directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at `root`. Nothing touches the disk until a write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Full path a file named `name` is written to.
    #[must_use]
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Create the base directory (recursively). Existing directories are fine.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub async fn ensure_root(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            StorageError::local_io(format!(
                "cannot create directory {}: {e}",
                self.root.display()
            ))
        })
    }

    /// Write `content` to `{root}/{name}` and return the full path.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the write fails.
    pub async fn write(&self, name: &str, content: Bytes) -> Result<PathBuf, StorageError> {
        self.ensure_root().await?;

        let root = tokio::fs::canonicalize(&self.root)
            .await
            .map_err(|e| StorageError::local_io(e.to_string()))?;
        Self::operator(&root)?
            .write(name, content)
            .await
            .map_err(|e| StorageError::local_io(e.to_string()))?;

        Ok(self.path_for(name))
    }

    fn operator(root: &Path) -> Result<Operator, StorageError> {
        let root = root
            .to_str()
            .ok_or_else(|| StorageError::configuration("invalid path"))?;

        Ok(Operator::new(services::Fs::default().root(root))
            .map_err(|e| StorageError::local_io(e.to_string()))?
            .finish())
    }
}
