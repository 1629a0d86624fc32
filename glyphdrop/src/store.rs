//! Filesystem scratch area for uploads and generated documents.
//!
//! The directory is flat. Images are stored under their sanitised client
//! filename and outputs under `<stem>.<ext>`; a later write with the same name
//! replaces the earlier file. Stored files are copies for inspection: requests
//! never read them back.

use std::path::{Path, PathBuf};

use crate::error::{GlyphError, Result};

#[derive(Debug, Clone)]
pub struct TransientStore {
    root: PathBuf,
}

impl TransientStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the scratch directory if it does not exist yet.
    pub async fn ensure(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `name` inside the store. `name` must already be sanitised.
    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains(&['/', '\\'][..]) || name == "." || name == ".." {
            return Err(GlyphError::Validation("Invalid file name".to_string()));
        }
        Ok(self.root.join(name))
    }

    pub async fn write(&self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path_for(name)?;
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Wrote file to store");
        Ok(path)
    }

    /// Remove a file, ignoring files that are already gone.
    pub async fn remove(&self, path: &Path) -> Result<()> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
