//! Turns a [`ReportDocument`] into PDF bytes.
//!
//! Two modes are offered:
//!
//! - [`ReportRenderer::render`] writes everything into one file, fetching
//!   inline section images at full size. There is no size ceiling, so it is
//!   meant for reports with few images.
//! - [`ReportRenderer::render_package`] writes a main report with thumbnails
//!   and citations, and moves full-size evidence images into appendix parts
//!   bounded by image count and byte size.

mod content;
mod finish;
mod package;

pub use package::{part_file_name, part_title, PartFile, PartLimits, RenderedPackage};

use crate::acquisition::ImagePipeline;
use crate::config::RenderConfig;
use crate::error::ReportError;
use content::InlineImages;
use dossier_render_lopdf::PageWriter;
use dossier_traits::{ResourceError, ResourceProvider, SharedResourceData};
use dossier_types::{ContentBlock, ReportDocument, Section};
use dossier_layout::{FontFace, TypeScale};
use futures::future::join_all;
use package::PartAssembler;
use std::collections::HashMap;
use std::sync::Arc;

/// Renders report documents. Holds no per-render state, so one instance can
/// serve any number of concurrent renders.
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    pipeline: ImagePipeline,
    config: RenderConfig,
}

impl ReportRenderer {
    pub fn new(provider: Arc<dyn ResourceProvider>) -> Self {
        Self::with_config(provider, RenderConfig::default())
    }

    pub fn with_config(provider: Arc<dyn ResourceProvider>, config: RenderConfig) -> Self {
        Self {
            pipeline: ImagePipeline::new(provider, &config),
            config,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Renders the whole document into a single PDF.
    pub async fn render(&self, document: &ReportDocument) -> Result<Vec<u8>, ReportError> {
        if document.evidence_index.len() > self.config.max_part_images {
            log::warn!(
                "Flat render of {} with {} evidence items; output size is unbounded, consider render_package",
                document.metadata.case_number,
                document.evidence_index.len()
            );
        }

        let fetched = self.fetch_inline_images(&document.sections).await;

        let mut writer = self.main_writer(document);
        content::draw_header(&mut writer, &document.metadata)?;
        content::draw_sections(&mut writer, document, &InlineImages::Embedded(&fetched))?;
        self.draw_appendices(&mut writer, document)?;

        let data = self.finish_main(writer)?;
        log::info!(
            "Rendered {} ({} bytes)",
            document.metadata.case_number,
            data.len()
        );
        Ok(data)
    }

    /// Renders the main report plus size-bounded appendix parts.
    ///
    /// Evidence images are fetched one batch at a time; each batch is fully
    /// assembled into the main report and the current part before the next
    /// batch is requested.
    pub async fn render_package(
        &self,
        document: &ReportDocument,
    ) -> Result<RenderedPackage, ReportError> {
        let mut main = self.main_writer(document);
        content::draw_header(&mut main, &document.metadata)?;
        content::draw_sections(&mut main, document, &InlineImages::Referenced)?;

        let mut parts = PartAssembler::new(&document.metadata, &self.config);
        if !document.evidence_index.is_empty() {
            main.new_page()?;
            main.draw_line("Evidence", TypeScale::heading(1), FontFace::Bold)?;
        }
        for batch in document.evidence_index.chunks(self.pipeline.batch_size()) {
            let outcomes = self.pipeline.acquire_batch(batch).await;
            for (item, outcome) in batch.iter().zip(&outcomes) {
                let part_number = if outcome.has_image_url() {
                    Some(parts.admit(item, outcome)?)
                } else {
                    None
                };
                content::draw_citation(&mut main, item, outcome, part_number)?;
            }
        }
        let parts = parts.finish()?;

        self.draw_appendices(&mut main, document)?;
        let main = self.finish_main(main)?;

        let package = RenderedPackage { main, parts };
        log::info!(
            "Rendered package {}: main {} bytes, {} part(s), {} bytes total",
            document.metadata.case_number,
            package.main.len(),
            package.parts.len(),
            package.total_bytes()
        );
        Ok(package)
    }

    fn main_writer(&self, document: &ReportDocument) -> PageWriter {
        let mut writer = PageWriter::new(self.config.page);
        writer.set_info(finish::document_info(&document.metadata));
        writer
    }

    fn draw_appendices(
        &self,
        writer: &mut PageWriter,
        document: &ReportDocument,
    ) -> Result<(), ReportError> {
        content::draw_evidence_index(writer, &document.evidence_index)?;
        content::draw_economy(writer, &document.economy_lines, &document.economy_summary)?;
        content::draw_attachments(writer, document)?;
        Ok(())
    }

    fn finish_main(&self, writer: PageWriter) -> Result<Vec<u8>, ReportError> {
        let mut document = writer.into_document()?;
        if self.config.page_numbers {
            finish::stamp_page_numbers(&mut document, &self.config.page)?;
        }
        finish::save(document, None)
    }

    /// Fetches every distinct section image URL, batch by batch.
    async fn fetch_inline_images(
        &self,
        sections: &[Section],
    ) -> HashMap<String, Result<SharedResourceData, ResourceError>> {
        let mut urls = Vec::new();
        collect_image_urls(sections, &mut urls);

        let mut fetched = HashMap::with_capacity(urls.len());
        for batch in urls.chunks(self.pipeline.batch_size()) {
            let results =
                join_all(batch.iter().map(|url| self.pipeline.fetch_original(url))).await;
            for (url, result) in batch.iter().zip(results) {
                if let Err(e) = &result {
                    log::warn!("Inline image {} unavailable: {}", url, e);
                }
                fetched.insert(url.clone(), result);
            }
        }
        fetched
    }
}

fn collect_image_urls(sections: &[Section], urls: &mut Vec<String>) {
    for section in sections {
        for block in &section.blocks {
            if let ContentBlock::Image { image_url, .. } = block
                && !image_url.trim().is_empty()
                && !urls.contains(image_url)
            {
                urls.push(image_url.clone());
            }
        }
        collect_image_urls(&section.children, urls);
    }
}
