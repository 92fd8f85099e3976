//! Splitting evidence images into size-bounded appendix parts.

use super::finish::{document_info, save};
use crate::acquisition::ImageOutcome;
use crate::config::RenderConfig;
use crate::error::ReportError;
use dossier_layout::{FontFace, PageGeometry, TypeScale};
use dossier_pdf_composer::prepend_document;
use dossier_render_lopdf::{EmbeddedImage, PageWriter};
use dossier_types::{DocumentMetadata, EvidenceItem};

/// One finished appendix part.
#[derive(Debug, Clone, PartialEq)]
pub struct PartFile {
    /// File name, `<case-number-slug>-appendix-part-<N>.pdf`.
    pub name: String,
    /// `Appendix Part N`.
    pub title: String,
    pub data: Vec<u8>,
    pub first_code: String,
    pub last_code: String,
    /// Evidence items in this part, including ones whose image failed.
    pub entries: usize,
    /// Sum of the fetched original image sizes.
    pub image_bytes: u64,
}

/// Output of split rendering: the main report plus its appendix parts.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPackage {
    pub main: Vec<u8>,
    pub parts: Vec<PartFile>,
}

impl RenderedPackage {
    /// Combined size of the main report and every part.
    pub fn total_bytes(&self) -> usize {
        self.main.len() + self.parts.iter().map(|p| p.data.len()).sum::<usize>()
    }

    pub fn total_entries(&self) -> usize {
        self.parts.iter().map(|p| p.entries).sum()
    }
}

pub fn part_title(number: usize) -> String {
    format!("Appendix Part {}", number)
}

pub fn part_file_name(case_number: &str, number: usize) -> String {
    let slug = slug::slugify(case_number);
    let stem = if slug.is_empty() { "report" } else { slug.as_str() };
    format!("{}-appendix-part-{}.pdf", stem, number)
}

/// Ceilings for a single part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartLimits {
    pub max_images: usize,
    pub max_bytes: u64,
}

impl PartLimits {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            max_images: config.max_part_images,
            max_bytes: config.max_part_bytes,
        }
    }

    /// Whether a part holding `entries` items and `bytes` bytes must be closed
    /// before an item of `incoming` bytes is added. An empty part always
    /// accepts, so a single oversized item still gets a part of its own.
    pub fn must_close(&self, entries: usize, bytes: u64, incoming: u64) -> bool {
        entries > 0
            && (entries >= self.max_images.max(1)
                || bytes.saturating_add(incoming) > self.max_bytes)
    }
}

struct OpenPart {
    number: usize,
    writer: PageWriter,
    first_code: String,
    last_code: String,
    entries: usize,
    image_bytes: u64,
}

/// Accumulates appendix pages and closes parts as the limits demand.
pub(crate) struct PartAssembler<'a> {
    metadata: &'a DocumentMetadata,
    geometry: PageGeometry,
    limits: PartLimits,
    current: Option<OpenPart>,
    finished: Vec<PartFile>,
}

impl<'a> PartAssembler<'a> {
    pub(crate) fn new(metadata: &'a DocumentMetadata, config: &RenderConfig) -> Self {
        Self {
            metadata,
            geometry: config.page,
            limits: PartLimits::from_config(config),
            current: None,
            finished: Vec::new(),
        }
    }

    /// Adds an item's full-size image page (or failure placeholder) and
    /// returns the number of the part that received it.
    pub(crate) fn admit(
        &mut self,
        item: &EvidenceItem,
        outcome: &ImageOutcome,
    ) -> Result<usize, ReportError> {
        let incoming = outcome.byte_size();
        let must_close = self
            .current
            .as_ref()
            .is_some_and(|part| self.limits.must_close(part.entries, part.image_bytes, incoming));
        if must_close {
            self.close_current()?;
        }

        let next_number = self.finished.len() + 1;
        let geometry = self.geometry;
        let part = self.current.get_or_insert_with(|| OpenPart {
            number: next_number,
            writer: PageWriter::new(geometry),
            first_code: item.evidence_code.clone(),
            last_code: item.evidence_code.clone(),
            entries: 0,
            image_bytes: 0,
        });

        if part.entries > 0 {
            part.writer.new_page()?;
        }
        draw_image_page(&mut part.writer, item, outcome)?;
        part.entries += 1;
        part.image_bytes += incoming;
        part.last_code = item.evidence_code.clone();
        Ok(part.number)
    }

    fn close_current(&mut self) -> Result<(), ReportError> {
        let Some(part) = self.current.take() else {
            return Ok(());
        };
        let title = part_title(part.number);
        let mut document = part.writer.into_document()?;

        let mut cover = PageWriter::new(self.geometry);
        draw_title_page(&mut cover, self.metadata, &part.first_code, &part.last_code, part.entries, &title)?;
        prepend_document(&mut document, &cover.into_document()?)?;

        let mut info = document_info(self.metadata);
        info.title = Some(format!("{} - {}", self.metadata.case_number, title));
        let data = save(document, Some(info))?;

        log::info!(
            "Closed {} ({} entries, {} image bytes, {} bytes on disk)",
            title,
            part.entries,
            part.image_bytes,
            data.len()
        );
        self.finished.push(PartFile {
            name: part_file_name(&self.metadata.case_number, part.number),
            title,
            data,
            first_code: part.first_code,
            last_code: part.last_code,
            entries: part.entries,
            image_bytes: part.image_bytes,
        });
        Ok(())
    }

    /// Closes the last part, if it holds anything, and returns all parts.
    pub(crate) fn finish(mut self) -> Result<Vec<PartFile>, ReportError> {
        self.close_current()?;
        Ok(self.finished)
    }
}

fn draw_title_page(
    writer: &mut PageWriter,
    metadata: &DocumentMetadata,
    first_code: &str,
    last_code: &str,
    entries: usize,
    title: &str,
) -> Result<(), ReportError> {
    writer.draw_line(title, TypeScale::TITLE, FontFace::Bold)?;
    writer.draw_line(
        &format!("Case number: {}", metadata.case_number),
        TypeScale::BODY,
        FontFace::Regular,
    )?;
    writer.draw_line(
        &format!("Evidence {} - {}", first_code, last_code),
        TypeScale::BODY,
        FontFace::Regular,
    )?;
    writer.draw_line(
        &format!("{} item(s)", entries),
        TypeScale::BODY,
        FontFace::Regular,
    )?;
    Ok(())
}

fn draw_image_page(
    writer: &mut PageWriter,
    item: &EvidenceItem,
    outcome: &ImageOutcome,
) -> Result<(), ReportError> {
    writer.draw_wrapped_text(
        &format!("{} {}", item.evidence_code, item.title),
        TypeScale::heading(2),
        FontFace::Bold,
    )?;
    match outcome {
        ImageOutcome::Fetched { original, .. } => match EmbeddedImage::from_bytes(original) {
            Ok(image) => {
                let handle = writer.add_image(image);
                let remaining = writer.cursor_y() - writer.geometry().bottom_margin;
                let width = writer.geometry().content_width();
                writer.draw_image(&handle, width, remaining)?;
            }
            Err(e) => {
                let url = item.image_url().unwrap_or_default();
                log::warn!("Evidence {}: could not embed {}: {}", item.evidence_code, url, e);
                draw_failure(writer, url, &e.to_string())?;
            }
        },
        ImageOutcome::Failed { url, error } => draw_failure(writer, url, &error.to_string())?,
        ImageOutcome::NoImage => {}
    }
    Ok(())
}

fn draw_failure(writer: &mut PageWriter, url: &str, error: &str) -> Result<(), ReportError> {
    writer.draw_line("Image unavailable", TypeScale::BODY, FontFace::Bold)?;
    writer.draw_wrapped_text(&format!("URL: {}", url), TypeScale::BODY, FontFace::Regular)?;
    writer.draw_wrapped_text(&format!("Error: {}", error), TypeScale::BODY, FontFace::Regular)?;
    Ok(())
}
