use dossier_pdf_composer::ComposerError;
use dossier_render_lopdf::RenderError;
use thiserror::Error;

/// Errors that abort a whole render call. Per-image failures never show up
/// here; they are drawn as placeholders instead.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("PDF composition failed: {0}")]
    Compose(#[from] ComposerError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<lopdf::Error> for ReportError {
    fn from(err: lopdf::Error) -> Self {
        ReportError::Render(RenderError::from(err))
    }
}
