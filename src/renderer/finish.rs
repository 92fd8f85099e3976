//! Post-assembly steps shared by the main report and appendix parts.

use crate::error::ReportError;
use dossier_layout::{FontFace, FontMetrics, HelveticaMetrics, PageGeometry};
use dossier_pdf_composer::{stamp_footers, ComposerError, Footer};
use dossier_render_lopdf::DocumentInfo;
use dossier_types::DocumentMetadata;
use lopdf::Document;

const FOOTER_SIZE: f32 = 9.0;

/// Info dictionary values derived from the metadata only, so repeated renders
/// of the same document are byte-identical.
pub(crate) fn document_info(metadata: &DocumentMetadata) -> DocumentInfo {
    DocumentInfo {
        title: Some(format!(
            "{} report {}",
            metadata.document_type.label(),
            metadata.case_number
        )),
        subject: Some(metadata.reference_id.clone()),
        author: Some(metadata.responsible.clone()),
        creator: Some("dossier".to_string()),
        producer: Some(format!("dossier {}", env!("CARGO_PKG_VERSION"))),
        creation_date: Some(metadata.created_at.format("D:%Y%m%d%H%M%SZ").to_string()),
        mod_date: Some(metadata.updated_at.format("D:%Y%m%d%H%M%SZ").to_string()),
    }
}

/// Stamps a right-aligned "Page N of M" footer inside the bottom margin of
/// every page.
pub(crate) fn stamp_page_numbers(
    document: &mut Document,
    geometry: &PageGeometry,
) -> Result<usize, ComposerError> {
    let metrics = HelveticaMetrics;
    let right = geometry.width - geometry.margin;
    let y = geometry.bottom_margin / 2.0;
    stamp_footers(document, |page, total| {
        let text = format!("Page {} of {}", page, total);
        let width = metrics.measure_width(&text, FontFace::Regular, FOOTER_SIZE);
        Some(Footer {
            text,
            x: right - width,
            y,
            size: FOOTER_SIZE,
        })
    })
}

/// Serializes a document, replacing its info dictionary when one is given.
pub(crate) fn save(mut document: Document, info: Option<DocumentInfo>) -> Result<Vec<u8>, ReportError> {
    if let Some(info) = info {
        let info_id = document.add_object(info.to_dictionary());
        document.trailer.set("Info", info_id);
    }
    let mut out = Vec::new();
    document.save_to(&mut out)?;
    Ok(out)
}
