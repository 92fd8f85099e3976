//! Filesystem-based resource provider for locally stored evidence.
//!
//! # Security
//!
//! The provider validates that all resolved paths remain within the base path
//! to prevent directory traversal attacks (e.g., `../../../etc/passwd`).

use async_trait::async_trait;
use dossier_traits::{ResourceError, ResourceProvider, SharedResourceData};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// A resource provider that loads image files from a base directory.
///
/// Evidence URLs are interpreted as paths relative to the base, with an
/// optional `file://` prefix. Absolute paths and paths that escape the base
/// directory are rejected as `NotFound`.
#[derive(Debug)]
pub struct FilesystemResourceProvider {
    base_path: PathBuf,
    /// Canonicalized base path for security checks
    canonical_base: Option<PathBuf>,
}

impl FilesystemResourceProvider {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        let base = base_path.as_ref().to_path_buf();
        // May fail if the directory doesn't exist yet
        let canonical = base.canonicalize().ok();
        Self {
            base_path: base,
            canonical_base: canonical,
        }
    }

    pub fn base(&self) -> &Path {
        &self.base_path
    }

    /// Returns `None` if the path would escape the base directory.
    fn resolve_path_safe(&self, uri: &str) -> Option<PathBuf> {
        let path = uri.strip_prefix("file://").unwrap_or(uri);
        if Path::new(path).is_absolute() {
            return None;
        }

        let full_path = self.base_path.join(path);

        if let Ok(canonical) = full_path.canonicalize()
            && let Some(ref base) = self.canonical_base
        {
            return canonical.starts_with(base).then_some(canonical);
        }

        // The file doesn't exist (or the base couldn't be canonicalized):
        // fall back to rejecting any parent-dir component.
        if Path::new(path)
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return None;
        }

        Some(full_path)
    }
}

#[async_trait]
impl ResourceProvider for FilesystemResourceProvider {
    async fn load(&self, uri: &str) -> Result<SharedResourceData, ResourceError> {
        let full_path = self
            .resolve_path_safe(uri)
            .ok_or_else(|| ResourceError::NotFound(format!("{} (path traversal blocked)", uri)))?;

        log::debug!("Reading {} from {}", uri, full_path.display());
        tokio::fs::read(&full_path)
            .await
            .map(Arc::new)
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ResourceError::NotFound(uri.to_string())
                } else {
                    ResourceError::LoadFailed {
                        path: uri.to_string(),
                        message: e.to_string(),
                    }
                }
            })
    }

    fn name(&self) -> &'static str {
        "FilesystemResourceProvider"
    }
}
