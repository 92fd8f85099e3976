//! Batched, failure-isolated image acquisition.
//!
//! Evidence images are fetched a batch at a time: every fetch in a batch runs
//! concurrently under its own timeout, and the caller assembles the batch's
//! pages before asking for the next one. A failed fetch is recorded against
//! its item and never affects its neighbours.

mod thumbnail;

pub use thumbnail::{make_thumbnail, thumbnail_or_fallback, ThumbnailSpec};

use crate::config::RenderConfig;
use dossier_traits::{ResourceError, ResourceProvider, SharedResourceData};
use dossier_types::EvidenceItem;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;

/// What happened when acquiring one evidence item's image.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageOutcome {
    /// The item has no image URL.
    NoImage,
    Fetched {
        original: SharedResourceData,
        thumbnail: Option<Vec<u8>>,
    },
    Failed {
        url: String,
        error: ResourceError,
    },
}

impl ImageOutcome {
    /// Byte size counted against an appendix part. Failures count as zero.
    pub fn byte_size(&self) -> u64 {
        match self {
            ImageOutcome::Fetched { original, .. } => original.len() as u64,
            _ => 0,
        }
    }

    pub fn has_image_url(&self) -> bool {
        !matches!(self, ImageOutcome::NoImage)
    }
}

/// Fetches evidence images through a [`ResourceProvider`].
#[derive(Debug, Clone)]
pub struct ImagePipeline {
    provider: Arc<dyn ResourceProvider>,
    batch_size: usize,
    timeout: Duration,
    thumbnail: ThumbnailSpec,
}

impl ImagePipeline {
    pub fn new(provider: Arc<dyn ResourceProvider>, config: &RenderConfig) -> Self {
        Self {
            provider,
            batch_size: config.effective_batch_size(),
            timeout: config.fetch_timeout(),
            thumbnail: ThumbnailSpec {
                width: config.thumbnail_width,
                quality: config.thumbnail_quality,
                fallback_max_bytes: config.thumbnail_fallback_max_bytes,
            },
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Loads one URL under the configured timeout.
    pub async fn fetch_original(&self, url: &str) -> Result<SharedResourceData, ResourceError> {
        match tokio::time::timeout(self.timeout, self.provider.load(url)).await {
            Ok(result) => result,
            Err(_) => Err(ResourceError::Timeout {
                uri: url.to_string(),
                after: self.timeout,
            }),
        }
    }

    /// Fetches one item's image and derives its thumbnail.
    pub async fn acquire(&self, item: &EvidenceItem) -> ImageOutcome {
        let Some(url) = item.image_url() else {
            return ImageOutcome::NoImage;
        };

        let original = match self.fetch_original(url).await {
            Ok(bytes) => bytes,
            Err(error) => {
                log::warn!(
                    "Evidence {}: image fetch failed: {}",
                    item.evidence_code,
                    error
                );
                return ImageOutcome::Failed {
                    url: url.to_string(),
                    error,
                };
            }
        };

        let spec = self.thumbnail;
        let source = Arc::clone(&original);
        let thumbnail =
            match tokio::task::spawn_blocking(move || thumbnail_or_fallback(&source, &spec)).await
            {
                Ok(thumbnail) => thumbnail,
                Err(e) => {
                    log::warn!(
                        "Evidence {}: thumbnail task failed: {}",
                        item.evidence_code,
                        e
                    );
                    None
                }
            };

        log::debug!(
            "Evidence {}: fetched {} bytes (thumbnail: {})",
            item.evidence_code,
            original.len(),
            thumbnail.as_ref().map_or(0, Vec::len)
        );
        ImageOutcome::Fetched {
            original,
            thumbnail,
        }
    }

    /// Acquires every item of one batch concurrently. The result is aligned
    /// with `items`.
    pub async fn acquire_batch(&self, items: &[EvidenceItem]) -> Vec<ImageOutcome> {
        join_all(items.iter().map(|item| self.acquire(item))).await
    }
}
