//! Drawing of the report's fixed building blocks onto a [`PageWriter`].

use crate::acquisition::ImageOutcome;
use dossier_layout::{FontFace, TypeScale};
use dossier_render_lopdf::{EmbeddedImage, PageWriter, RenderError};
use dossier_traits::{ResourceError, SharedResourceData};
use dossier_types::{
    ContentBlock, DocumentMetadata, EconomyLine, EconomySummary, EvidenceItem, ReportDocument,
    Section,
};
use rust_decimal::Decimal;
use std::collections::HashMap;

const LIST_INDENT: f32 = 14.0;
const DETAIL_INDENT: f32 = 12.0;
/// Bounding box for citation thumbnails in the main report.
const THUMBNAIL_BOX: f32 = 150.0;

/// How `Image` blocks inside sections are drawn.
pub(crate) enum InlineImages<'a> {
    /// Images were fetched up front; draw them at full width.
    Embedded(&'a HashMap<String, Result<SharedResourceData, ResourceError>>),
    /// Only reference the image; the picture itself lives in an appendix part.
    Referenced,
}

pub(crate) fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

pub(crate) fn draw_header(
    writer: &mut PageWriter,
    metadata: &DocumentMetadata,
) -> Result<(), RenderError> {
    writer.draw_line(
        &format!(
            "{} report {}",
            metadata.document_type.label(),
            metadata.case_number
        ),
        TypeScale::TITLE,
        FontFace::Bold,
    )?;

    let fields = [
        ("Case number", metadata.case_number.as_str()),
        ("Reference", metadata.reference_id.as_str()),
        ("Status", metadata.status.as_str()),
        ("Responsible", metadata.responsible.as_str()),
    ];
    for (label, value) in fields {
        writer.draw_wrapped_text(
            &format!("{}: {}", label, value),
            TypeScale::BODY,
            FontFace::Regular,
        )?;
    }
    writer.draw_line(
        &format!(
            "Created: {}   Updated: {}",
            metadata.created_at.format("%Y-%m-%d %H:%M UTC"),
            metadata.updated_at.format("%Y-%m-%d %H:%M UTC")
        ),
        TypeScale::BODY,
        FontFace::Regular,
    )?;

    if !metadata.parties.is_empty() {
        writer.draw_line("Parties", TypeScale::heading(3), FontFace::Bold)?;
        for party in &metadata.parties {
            let line = match &party.contact {
                Some(contact) if !contact.trim().is_empty() => {
                    format!("{}: {} ({})", party.role, party.name, contact)
                }
                _ => format!("{}: {}", party.role, party.name),
            };
            writer.draw_wrapped_text_indented(
                &line,
                DETAIL_INDENT,
                TypeScale::BODY,
                FontFace::Regular,
            )?;
        }
    }
    writer.draw_rule()
}

/// Draws the section tree depth-first. Top-level sections are depth 1.
pub(crate) fn draw_sections(
    writer: &mut PageWriter,
    document: &ReportDocument,
    images: &InlineImages<'_>,
) -> Result<(), RenderError> {
    for section in &document.sections {
        draw_section(writer, document, section, 1, images)?;
    }
    Ok(())
}

fn draw_section(
    writer: &mut PageWriter,
    document: &ReportDocument,
    section: &Section,
    depth: u8,
    images: &InlineImages<'_>,
) -> Result<(), RenderError> {
    writer.advance(TypeScale::LINE_GAP);
    writer.draw_wrapped_text(&section.title, TypeScale::heading(depth), FontFace::Bold)?;

    for block in &section.blocks {
        draw_block(writer, document, block, images)?;
    }
    for child in &section.children {
        draw_section(writer, document, child, depth.saturating_add(1), images)?;
    }
    Ok(())
}

fn draw_block(
    writer: &mut PageWriter,
    document: &ReportDocument,
    block: &ContentBlock,
    images: &InlineImages<'_>,
) -> Result<(), RenderError> {
    match block {
        ContentBlock::Paragraph { text } => {
            writer.draw_wrapped_text(text, TypeScale::BODY, FontFace::Regular)
        }
        ContentBlock::Heading { text, level } => {
            writer.draw_wrapped_text(text, TypeScale::heading(*level), FontFace::Bold)
        }
        ContentBlock::List { items } => {
            for item in items {
                writer.draw_wrapped_text_indented(
                    &format!("- {}", item),
                    LIST_INDENT,
                    TypeScale::BODY,
                    FontFace::Regular,
                )?;
            }
            Ok(())
        }
        ContentBlock::Image {
            evidence_id,
            caption,
            image_url,
        } => match images {
            InlineImages::Embedded(fetched) => {
                match fetched.get(image_url.as_str()) {
                    Some(Ok(bytes)) => draw_full_image(writer, bytes, image_url)?,
                    Some(Err(error)) => draw_unavailable(writer, image_url, &error.to_string())?,
                    None => draw_unavailable(writer, image_url, "image was not fetched")?,
                }
                if !caption.trim().is_empty() {
                    writer.draw_wrapped_text(caption, TypeScale::SMALL, FontFace::Regular)?;
                }
                Ok(())
            }
            InlineImages::Referenced => {
                let evidence = evidence_id
                    .as_deref()
                    .and_then(|id| document.evidence_by_id(id));
                let reference = match evidence {
                    Some(item) => format!("[Image: see evidence {}]", item.evidence_code),
                    None => format!("[Image: {}]", image_url),
                };
                if !caption.trim().is_empty() {
                    writer.draw_wrapped_text(caption, TypeScale::BODY, FontFace::Regular)?;
                }
                writer.draw_wrapped_text(&reference, TypeScale::SMALL, FontFace::Regular)
            }
        },
    }
}

/// Embeds and draws an image at up to full content width. Undecodable bytes
/// become an "image unavailable" line.
pub(crate) fn draw_full_image(
    writer: &mut PageWriter,
    bytes: &[u8],
    url: &str,
) -> Result<(), RenderError> {
    match EmbeddedImage::from_bytes(bytes) {
        Ok(image) => {
            let handle = writer.add_image(image);
            let geometry = *writer.geometry();
            writer.draw_image(&handle, geometry.content_width(), geometry.content_height())?;
            Ok(())
        }
        Err(e) => {
            log::warn!("Could not embed image {}: {}", url, e);
            draw_unavailable(writer, url, &e.to_string())
        }
    }
}

pub(crate) fn draw_unavailable(
    writer: &mut PageWriter,
    url: &str,
    error: &str,
) -> Result<(), RenderError> {
    writer.draw_wrapped_text(
        &format!("[Image unavailable: {} ({})]", url, error),
        TypeScale::SMALL,
        FontFace::Regular,
    )
}

/// One line per item: code, title and date.
pub(crate) fn draw_evidence_index(
    writer: &mut PageWriter,
    evidence: &[EvidenceItem],
) -> Result<(), RenderError> {
    if evidence.is_empty() {
        return Ok(());
    }
    writer.new_page()?;
    writer.draw_line("Evidence index", TypeScale::heading(1), FontFace::Bold)?;
    for item in evidence {
        let line = match item.date {
            Some(date) => format!("{}  {}  ({})", item.evidence_code, item.title, date),
            None => format!("{}  {}", item.evidence_code, item.title),
        };
        writer.draw_wrapped_text(&line, TypeScale::BODY, FontFace::Regular)?;
    }
    Ok(())
}

pub(crate) fn draw_economy(
    writer: &mut PageWriter,
    lines: &[EconomyLine],
    summary: &EconomySummary,
) -> Result<(), RenderError> {
    if lines.is_empty() {
        return Ok(());
    }
    writer.new_page()?;
    writer.draw_line("Economy", TypeScale::heading(1), FontFace::Bold)?;

    for line in lines {
        writer.draw_wrapped_text(
            &format!("{}: {}", line.description, format_amount(line.amount)),
            TypeScale::BODY,
            FontFace::Regular,
        )?;
        let mut details = Vec::new();
        if let Some(party) = line.party.as_deref().filter(|p| !p.trim().is_empty()) {
            details.push(format!("Party: {}", party));
        }
        if let Some(date) = line.interest_from_date {
            details.push(format!("Interest from: {}", date));
        }
        if !details.is_empty() {
            writer.draw_wrapped_text_indented(
                &details.join("   "),
                DETAIL_INDENT,
                TypeScale::SMALL,
                FontFace::Regular,
            )?;
        }
    }

    writer.advance(TypeScale::LINE_GAP);
    writer.draw_line(
        &format!("Total: {}", format_amount(summary.total_amount)),
        TypeScale::BODY,
        FontFace::Bold,
    )?;

    if let Some(per_party) = &summary.per_party {
        writer.draw_line("Per party", TypeScale::heading(3), FontFace::Bold)?;
        for (party, amount) in per_party {
            writer.draw_line(
                &format!("{}: {}", party, format_amount(*amount)),
                TypeScale::BODY,
                FontFace::Regular,
            )?;
        }
    }
    Ok(())
}

pub(crate) fn draw_attachments(
    writer: &mut PageWriter,
    document: &ReportDocument,
) -> Result<(), RenderError> {
    if document.attachments.is_empty() {
        return Ok(());
    }
    writer.new_page()?;
    writer.draw_line("Attachments", TypeScale::heading(1), FontFace::Bold)?;
    for attachment in &document.attachments {
        let title = match attachment.reference.as_deref() {
            Some(reference) if !reference.trim().is_empty() => format!(
                "{} [{}] ({})",
                attachment.title,
                attachment.kind.label(),
                reference
            ),
            _ => format!("{} [{}]", attachment.title, attachment.kind.label()),
        };
        writer.draw_wrapped_text(&title, TypeScale::BODY, FontFace::Regular)?;
        writer.draw_wrapped_text_indented(
            &attachment.url,
            DETAIL_INDENT,
            TypeScale::SMALL,
            FontFace::Regular,
        )?;
    }
    Ok(())
}

/// Draws one evidence citation into the main report: heading line, details,
/// thumbnail (or a placeholder) and the appendix part reference.
pub(crate) fn draw_citation(
    writer: &mut PageWriter,
    item: &EvidenceItem,
    outcome: &ImageOutcome,
    part_number: Option<usize>,
) -> Result<(), RenderError> {
    writer.draw_wrapped_text(
        &format!("{} {}", item.evidence_code, item.title),
        TypeScale::heading(3),
        FontFace::Bold,
    )?;

    let details = [
        ("Date", item.date.map(|d| d.to_string())),
        ("Category", item.category.clone()),
        ("Source", item.source.clone()),
    ];
    for (label, value) in details {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            writer.draw_line(
                &format!("{}: {}", label, value),
                TypeScale::SMALL,
                FontFace::Regular,
            )?;
        }
    }
    if let Some(description) = item.description.as_deref().filter(|d| !d.trim().is_empty()) {
        writer.draw_wrapped_text(description, TypeScale::BODY, FontFace::Regular)?;
    }

    match outcome {
        ImageOutcome::NoImage => {}
        ImageOutcome::Fetched {
            thumbnail: Some(thumbnail),
            ..
        } => match EmbeddedImage::from_bytes(thumbnail) {
            Ok(image) => {
                let handle = writer.add_image(image);
                writer.draw_image(&handle, THUMBNAIL_BOX, THUMBNAIL_BOX)?;
            }
            Err(e) => {
                log::debug!("Evidence {}: thumbnail not embeddable: {}", item.evidence_code, e);
                writer.draw_line("[No thumbnail available]", TypeScale::SMALL, FontFace::Regular)?;
            }
        },
        ImageOutcome::Fetched {
            thumbnail: None, ..
        } => {
            writer.draw_line("[No thumbnail available]", TypeScale::SMALL, FontFace::Regular)?;
        }
        ImageOutcome::Failed { url, .. } => {
            writer.draw_wrapped_text(
                &format!("[Image unavailable: {}]", url),
                TypeScale::SMALL,
                FontFace::Regular,
            )?;
        }
    }

    if let Some(number) = part_number {
        writer.draw_line(
            &format!("See Appendix Part {}", number),
            TypeScale::BODY,
            FontFace::Regular,
        )?;
    }
    writer.advance(TypeScale::LINE_GAP);
    Ok(())
}
