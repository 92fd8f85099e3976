//! Case report composition engine.
//!
//! A [`ReportDocument`] (built with [`DocumentBuilder`] or deserialized from
//! JSON) goes in; PDF bytes come out. [`ReportRenderer::render`] produces a
//! single flat report, [`ReportRenderer::render_package`] a main report plus
//! appendix parts bounded by image count and byte size.
//!
//! Images are loaded through a [`ResourceProvider`], so the host decides
//! whether they come from HTTP, the filesystem or memory.

pub mod acquisition;
pub mod config;
pub mod error;
pub mod renderer;

pub use acquisition::{ImageOutcome, ImagePipeline};
pub use crate::config::RenderConfig;
pub use error::ReportError;
pub use renderer::{PartFile, RenderedPackage, ReportRenderer};

pub use dossier_layout::PageGeometry;
pub use dossier_resource::{FilesystemResourceProvider, HttpResourceProvider};
pub use dossier_traits::{InMemoryResourceProvider, ResourceError, ResourceProvider};
pub use dossier_types::*;
