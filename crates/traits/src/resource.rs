//! ResourceProvider trait for abstracting image acquisition.
//!
//! The renderer never talks to the network or the filesystem directly: every
//! evidence image is loaded through a provider, which keeps rendering testable
//! and lets the host application decide where bytes come from.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use thiserror::Error;

/// Error type for resource loading operations.
///
/// All variants are per-resource: a failed load is recorded against the item
/// that asked for it and never aborts a render.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Request for '{uri}' failed with status {status}")]
    Status { uri: String, status: u16 },

    #[error("Request for '{uri}' timed out after {}s", .after.as_secs_f32())]
    Timeout { uri: String, after: Duration },

    #[error("Failed to load resource '{path}': {message}")]
    LoadFailed { path: String, message: String },

    #[error("Unsupported resource location: {0}")]
    UnsupportedUri(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ResourceError {
    fn from(err: std::io::Error) -> Self {
        ResourceError::Io(err.to_string())
    }
}

/// Shared resource data type (reference-counted bytes).
pub type SharedResourceData = Arc<Vec<u8>>;

/// A source of image bytes addressed by URL or path.
///
/// # Implementations
///
/// - `HttpResourceProvider` (dossier-resource): remote `http(s)://` URLs
/// - `FilesystemResourceProvider` (dossier-resource): files under a base directory
/// - [`InMemoryResourceProvider`]: pre-populated map, used by tests and callers
///   that already hold the bytes
///
/// Implementations must be safe to call concurrently; the renderer issues up to
/// one batch of loads at a time.
#[async_trait]
pub trait ResourceProvider: Send + Sync + Debug {
    /// Load a resource by its URL or path.
    async fn load(&self, uri: &str) -> Result<SharedResourceData, ResourceError>;

    /// Returns a human-readable name for this provider (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// An in-memory resource provider.
///
/// Resources must be added before rendering. Lookups are exact string matches
/// on the URI.
#[derive(Debug, Default)]
pub struct InMemoryResourceProvider {
    resources: RwLock<HashMap<String, SharedResourceData>>,
}

impl InMemoryResourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource to the in-memory store.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::LoadFailed` if the internal lock is poisoned.
    pub fn add(&self, uri: impl Into<String>, data: Vec<u8>) -> Result<(), ResourceError> {
        self.add_shared(uri, Arc::new(data))
    }

    /// Add a resource from shared data.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::LoadFailed` if the internal lock is poisoned.
    pub fn add_shared(
        &self,
        uri: impl Into<String>,
        data: SharedResourceData,
    ) -> Result<(), ResourceError> {
        let uri = uri.into();
        let mut resources = self
            .resources
            .write()
            .map_err(|_| ResourceError::LoadFailed {
                path: uri.clone(),
                message: "resource store lock poisoned".to_string(),
            })?;
        resources.insert(uri, data);
        Ok(())
    }

    /// Remove a resource from the store.
    ///
    /// Returns `None` if the lock is poisoned or the resource doesn't exist.
    pub fn remove(&self, uri: &str) -> Option<SharedResourceData> {
        self.resources.write().ok()?.remove(uri)
    }

    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.resources.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ResourceProvider for InMemoryResourceProvider {
    async fn load(&self, uri: &str) -> Result<SharedResourceData, ResourceError> {
        let resources = self
            .resources
            .read()
            .map_err(|_| ResourceError::LoadFailed {
                path: uri.to_string(),
                message: "resource store lock poisoned".to_string(),
            })?;
        resources
            .get(uri)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(uri.to_string()))
    }

    fn name(&self) -> &'static str {
        "InMemoryResourceProvider"
    }
}
