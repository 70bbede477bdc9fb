use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::utils::secure_file_name;

/// Uploaded files belonging to one request. Every tracked file is removed
/// when the guard is dropped, whether the request succeeded or not.
pub struct UploadGuard {
    token: String,
    paths: Vec<PathBuf>,
}

impl UploadGuard {
    pub fn new() -> Self {
        Self {
            token: uuid::Uuid::new_v4().simple().to_string(),
            paths: Vec::new(),
        }
    }

    /// Path the upload of form field `field` named `original_name` is stored
    /// under. The name is sanitized and prefixed with this request's token and
    /// the field, so two fields carrying the same file name stay apart.
    pub fn target_path(&self, dir: &Path, field: &str, original_name: &str) -> PathBuf {
        dir.join(format!(
            "{}_{}_{}",
            self.token,
            secure_file_name(field),
            secure_file_name(original_name)
        ))
    }

    pub async fn store(
        &mut self,
        dir: &Path,
        field: &str,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<PathBuf> {
        let path = self.target_path(dir, field, original_name);
        // Track before writing so a half-written file is still removed
        self.paths.push(path.clone());
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to store upload: {}", path.display()))?;
        Ok(path)
    }
}

impl Default for UploadGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for UploadGuard {
    fn drop(&mut self) {
        for path in &self.paths {
            match std::fs::remove_file(path) {
                Ok(()) => log::debug!("Removed upload {}", path.display()),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => log::warn!("Failed to remove upload {}: {}", path.display(), e),
            }
        }
    }
}
