//! Document model for Dossier case reports.
//!
//! Upstream mappers translate domain records into these types, usually through
//! [`DocumentBuilder`], and hand the finished [`ReportDocument`] to the renderer.
//! The model is plain data: the only behavior it carries is the derivation of the
//! economy summary.

pub mod builder;
pub mod document;
pub mod economy;
pub mod evidence;

pub use builder::DocumentBuilder;
pub use document::{
    ContentBlock, DocumentMetadata, DocumentType, Party, ReportDocument, Section,
};
pub use economy::{EconomyLine, EconomySummary};
pub use evidence::{Attachment, AttachmentKind, EvidenceItem};
