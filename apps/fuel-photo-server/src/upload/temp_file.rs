//! Request-scoped temporary files
//!
//! A `TempImage` owns its file on disk: dropping it unlinks the file, so every
//! exit path of a request releases what it wrote.

use std::path::{Path, PathBuf};

use uuid::Uuid;

#[derive(Debug)]
pub struct TempImage {
    path: PathBuf,
}

impl TempImage {
    /// Create a new, uniquely named empty file in `dir`
    pub async fn create(dir: &Path) -> std::io::Result<(Self, tokio::fs::File)> {
        tokio::fs::create_dir_all(dir).await?;

        let path = dir.join(format!("upload_{}", Uuid::new_v4()));
        let file = tokio::fs::File::create(&path).await?;

        Ok((Self { path }, file))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempImage {
    fn drop(&mut self) {
        // Synchronous so the file is gone before the handler's response is built.
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::trace!(path = %self.path.display(), "Removed temporary file"),
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                "Failed to remove temporary file: {}",
                e
            ),
        }
    }
}
