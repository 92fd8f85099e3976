//! Text handling and page geometry for the Dossier pagination writer.
//!
//! Reports are drawn with the PDF standard 14 Helvetica faces in
//! WinAnsiEncoding, so everything here works on the printable ASCII and
//! Latin-1 subset: [`sanitize`] folds arbitrary input into that subset,
//! [`FontMetrics`] measures it, and [`wrap_paragraph`] breaks it into lines.

pub mod config;
pub mod metrics;
pub mod text;
pub mod wrapper;

pub use config::{PageGeometry, TypeScale};
pub use metrics::{FontFace, FontMetrics, HelveticaMetrics};
pub use text::{encode_win_ansi, sanitize, sanitize_line};
pub use wrapper::{wrap_paragraph, wrap_text, WrappedLine};
