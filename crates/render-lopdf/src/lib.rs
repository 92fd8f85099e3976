//! Paginating PDF writer using lopdf.
//!
//! [`PageWriter`] owns one PDF document under construction together with a
//! vertical cursor. Drawing calls move the cursor down the page and open a new
//! page whenever the next line or image would cross the bottom margin.

mod error;
mod embed;
mod writer;

pub use error::{ImageEmbedError, RenderError};
pub use embed::{encode_jpeg, EmbeddedImage};
pub use writer::{DocumentInfo, ImageHandle, PageWriter};
