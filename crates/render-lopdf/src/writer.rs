use crate::embed::EmbeddedImage;
use crate::error::RenderError;
use dossier_layout::{
    encode_win_ansi, sanitize_line, wrap_text, FontFace, HelveticaMetrics,
    PageGeometry, TypeScale,
};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

/// Values for the PDF `/Info` dictionary. Dates must already be in PDF date
/// syntax (`D:YYYYMMDDHHmmSSZ`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub author: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub mod_date: Option<String>,
}

impl DocumentInfo {
    /// The `/Info` dictionary, with only the populated entries.
    pub fn to_dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        let entries = [
            ("Title", &self.title),
            ("Subject", &self.subject),
            ("Author", &self.author),
            ("Creator", &self.creator),
            ("Producer", &self.producer),
            ("CreationDate", &self.creation_date),
            ("ModDate", &self.mod_date),
        ];
        for (key, value) in entries {
            if let Some(value) = value {
                dict.set(
                    key,
                    Object::String(encode_win_ansi(&sanitize_line(value)), StringFormat::Literal),
                );
            }
        }
        dict
    }
}

/// An image XObject registered with a [`PageWriter`].
#[derive(Debug, Clone, PartialEq)]
pub struct ImageHandle {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

/// Builds a PDF top to bottom, opening pages as content overflows.
///
/// The cursor is the baseline of the next line, in PDF user space (origin at
/// the bottom-left). A fresh page puts it at `height - top_margin`.
pub struct PageWriter {
    document: Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    geometry: PageGeometry,
    metrics: HelveticaMetrics,
    page_ids: Vec<ObjectId>,
    operations: Vec<Operation>,
    xobjects: Dictionary,
    image_count: usize,
    y: f32,
    info: Option<DocumentInfo>,
}

impl PageWriter {
    pub fn new(geometry: PageGeometry) -> Self {
        let mut document = Document::with_version("1.7");
        let pages_id = document.new_object_id();
        let resources_id = document.new_object_id();
        Self {
            document,
            pages_id,
            resources_id,
            y: geometry.top(),
            geometry,
            metrics: HelveticaMetrics,
            page_ids: Vec::new(),
            operations: Vec::new(),
            xobjects: Dictionary::new(),
            image_count: 0,
            info: None,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn cursor_y(&self) -> f32 {
        self.y
    }

    /// Pages written so far, including the one currently open.
    pub fn page_count(&self) -> usize {
        self.page_ids.len() + 1
    }

    pub fn set_info(&mut self, info: DocumentInfo) {
        self.info = Some(info);
    }

    /// Opens a new page when `needed` points would cross the bottom margin.
    /// A page the cursor has not moved on is never abandoned, so oversized
    /// content cannot produce blank pages.
    pub fn ensure_space(&mut self, needed: f32) -> Result<(), RenderError> {
        if self.y - needed < self.geometry.bottom_margin && !self.page_is_untouched() {
            self.new_page()?;
        }
        Ok(())
    }

    /// Nothing drawn and no space consumed. Blank lines only move the
    /// cursor, so they count as touching the page.
    fn page_is_untouched(&self) -> bool {
        self.operations.is_empty() && self.y >= self.geometry.top()
    }

    /// Closes the current page and starts another one.
    pub fn new_page(&mut self) -> Result<(), RenderError> {
        self.flush_page()?;
        self.y = self.geometry.top();
        Ok(())
    }

    /// Moves the cursor down without drawing.
    pub fn advance(&mut self, amount: f32) {
        self.y -= amount;
    }

    /// Draws one line at the left margin and advances by `size + 6`.
    pub fn draw_line(&mut self, text: &str, size: f32, face: FontFace) -> Result<(), RenderError> {
        self.draw_line_at(self.geometry.margin, text, size, face)
    }

    fn draw_line_at(
        &mut self,
        x: f32,
        text: &str,
        size: f32,
        face: FontFace,
    ) -> Result<(), RenderError> {
        let line_height = TypeScale::line_height(size);
        self.ensure_space(line_height)?;
        let text = sanitize_line(text);
        if !text.is_empty() {
            self.push_text(x, self.y, &text, size, face);
        }
        self.y -= line_height;
        Ok(())
    }

    /// Wraps `text` to the content width and draws every resulting line.
    pub fn draw_wrapped_text(
        &mut self,
        text: &str,
        size: f32,
        face: FontFace,
    ) -> Result<(), RenderError> {
        self.draw_wrapped_text_indented(text, 0.0, size, face)
    }

    pub fn draw_wrapped_text_indented(
        &mut self,
        text: &str,
        indent: f32,
        size: f32,
        face: FontFace,
    ) -> Result<(), RenderError> {
        let x = self.geometry.margin + indent;
        let max_width = (self.geometry.content_width() - indent).max(size);
        for line in wrap_text(text, max_width, &self.metrics, face, size) {
            self.draw_line_at(x, &line.text, size, face)?;
        }
        Ok(())
    }

    /// Draws a thin horizontal rule across the content width.
    pub fn draw_rule(&mut self) -> Result<(), RenderError> {
        self.ensure_space(TypeScale::LINE_GAP)?;
        let y = self.y + TypeScale::LINE_GAP / 2.0;
        let left = self.geometry.margin;
        let right = self.geometry.width - self.geometry.margin;
        self.operations.extend([
            Operation::new("q", vec![]),
            Operation::new("w", vec![0.5f32.into()]),
            Operation::new("m", vec![left.into(), y.into()]),
            Operation::new("l", vec![right.into(), y.into()]),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ]);
        self.y -= TypeScale::LINE_GAP;
        Ok(())
    }

    /// Registers a JPEG image XObject. The same handle can be drawn any number
    /// of times on any page.
    pub fn add_image(&mut self, image: EmbeddedImage) -> ImageHandle {
        self.image_count += 1;
        let name = format!("Im{}", self.image_count);
        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => image.width as i64,
                "Height" => image.height as i64,
                "ColorSpace" => image.color_space,
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            image.data,
        );
        let id = self.document.add_object(stream);
        self.xobjects.set(name.as_bytes(), id);
        ImageHandle {
            name,
            width: image.width,
            height: image.height,
        }
    }

    /// Draws an image at the left margin, scaled down to fit within
    /// `max_width` by `max_height` (and never taller than a page's content
    /// area). Returns the drawn size.
    pub fn draw_image(
        &mut self,
        handle: &ImageHandle,
        max_width: f32,
        max_height: f32,
    ) -> Result<(f32, f32), RenderError> {
        if handle.width == 0 || handle.height == 0 {
            return Err(RenderError::Other(format!(
                "Image {} has no pixels",
                handle.name
            )));
        }
        let max_width = max_width.min(self.geometry.content_width());
        let max_height = max_height.min(self.geometry.content_height());
        let (w, h) = (handle.width as f32, handle.height as f32);
        let scale = (max_width / w).min(max_height / h).min(1.0);
        let (draw_w, draw_h) = (w * scale, h * scale);

        self.ensure_space(draw_h)?;
        let x = self.geometry.margin;
        let y = self.y - draw_h;
        self.operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    draw_w.into(),
                    0.into(),
                    0.into(),
                    draw_h.into(),
                    x.into(),
                    y.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(handle.name.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ]);
        self.y = y - TypeScale::LINE_GAP;
        Ok((draw_w, draw_h))
    }

    fn push_text(&mut self, x: f32, y: f32, text: &str, size: f32, face: FontFace) {
        self.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(face.resource_name().as_bytes().to_vec()), size.into()],
            ),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ]);
    }

    fn flush_page(&mut self) -> Result<(), RenderError> {
        let content = Content {
            operations: std::mem::take(&mut self.operations),
        };
        let content_id = self
            .document
            .add_object(Stream::new(Dictionary::new(), content.encode()?));
        let page = dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), self.geometry.width.into(), self.geometry.height.into()],
            "Contents" => content_id,
            "Resources" => self.resources_id,
        };
        let page_id = self.document.add_object(page);
        self.page_ids.push(page_id);
        log::trace!("Closed page {}", self.page_ids.len());
        Ok(())
    }

    /// Closes the open page and assembles the page tree, shared resources,
    /// catalog and optional info dictionary.
    pub fn into_document(mut self) -> Result<Document, RenderError> {
        self.flush_page()?;

        let mut fonts = Dictionary::new();
        for face in FontFace::all() {
            fonts.set(
                face.resource_name(),
                dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => face.base_font(),
                    "Encoding" => "WinAnsiEncoding",
                },
            );
        }
        let mut resources = dictionary! { "Font" => fonts };
        if !self.xobjects.is_empty() {
            resources.set("XObject", std::mem::take(&mut self.xobjects));
        }
        self.document
            .objects
            .insert(self.resources_id, Object::Dictionary(resources));

        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::from(*id)).collect();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i64,
        };
        self.document
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self
            .document
            .add_object(dictionary! { "Type" => "Catalog", "Pages" => self.pages_id });
        self.document.trailer.set("Root", catalog_id);

        if let Some(info) = &self.info {
            let info_id = self.document.add_object(info.to_dictionary());
            self.document.trailer.set("Info", info_id);
        }

        Ok(self.document)
    }

    /// Serializes the finished document.
    pub fn finish(self) -> Result<Vec<u8>, RenderError> {
        let mut document = self.into_document()?;
        let mut out = Vec::new();
        document.save_to(&mut out)?;
        Ok(out)
    }
}
