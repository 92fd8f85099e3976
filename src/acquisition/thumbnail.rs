use dossier_render_lopdf::{encode_jpeg, ImageEmbedError};
use image::imageops::FilterType;

/// How citation thumbnails are produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbnailSpec {
    pub width: u32,
    pub quality: u8,
    pub fallback_max_bytes: usize,
}

/// Downsamples `bytes` to at most `spec.width` pixels wide and re-encodes it
/// as a JPEG. Smaller images keep their size.
pub fn make_thumbnail(bytes: &[u8], spec: &ThumbnailSpec) -> Result<Vec<u8>, ImageEmbedError> {
    let decoded = image::load_from_memory(bytes)?;
    let resized = if decoded.width() > spec.width {
        decoded.resize(spec.width, u32::MAX, FilterType::Triangle)
    } else {
        decoded
    };
    encode_jpeg(&resized, spec.quality)
}

/// A thumbnail for `bytes`, or the original itself when thumbnailing fails
/// and the original is small enough to show as-is.
pub fn thumbnail_or_fallback(bytes: &[u8], spec: &ThumbnailSpec) -> Option<Vec<u8>> {
    match make_thumbnail(bytes, spec) {
        Ok(thumbnail) => Some(thumbnail),
        Err(e) if bytes.len() < spec.fallback_max_bytes => {
            log::debug!("Thumbnail failed ({}), using {}-byte original", e, bytes.len());
            Some(bytes.to_vec())
        }
        Err(e) => {
            log::warn!("Thumbnail failed and original is too large to substitute: {}", e);
            None
        }
    }
}
