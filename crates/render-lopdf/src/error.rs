use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF generation error: {0}")]
    Pdf(String),
    #[error("Other rendering error: {0}")]
    Other(String),
}

impl From<lopdf::Error> for RenderError {
    fn from(err: lopdf::Error) -> Self {
        RenderError::Pdf(err.to_string())
    }
}

/// Failure to turn image bytes into an embeddable XObject. Recoverable: the
/// caller draws a placeholder instead.
#[derive(Error, Debug)]
pub enum ImageEmbedError {
    #[error("Unsupported or corrupt image data: {0}")]
    Decode(String),
    #[error("Failed to re-encode image: {0}")]
    Encode(String),
}

impl From<image::ImageError> for ImageEmbedError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Encoding(e) => ImageEmbedError::Encode(e.to_string()),
            other => ImageEmbedError::Decode(other.to_string()),
        }
    }
}
