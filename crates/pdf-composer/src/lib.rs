//! PDF composition utilities for merging and overlaying PDF documents.
//!
//! This crate provides low-level PDF manipulation using lopdf:
//! - Deep page copying between documents
//! - Cover pages (prepending one document's pages to another)
//! - Content overlaying (page-number footers)

mod copy;
mod error;

pub use error::ComposerError;

use copy::ObjectCopier;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

/// Resource name under which [`stamp_footers`] registers its font.
pub const FOOTER_FONT: &str = "FFtr";

/// Copies every page of `source` in front of the pages of `target`.
///
/// Each page is deep-copied together with its content streams, resources,
/// fonts and images under fresh object ids, then linked into the target's
/// root page tree. Returns the number of pages inserted.
pub fn prepend_document(target: &mut Document, source: &Document) -> Result<usize, ComposerError> {
    // get_pages is keyed by page number, so iteration is already in order.
    let source_pages: Vec<ObjectId> = source.get_pages().into_values().collect();
    if source_pages.is_empty() {
        return Ok(0);
    }

    let mut copier = ObjectCopier::new(source, target);
    let mut copied = Vec::with_capacity(source_pages.len());
    for page_id in source_pages {
        copied.push(copier.copy_page(page_id)?);
    }

    let pages_id = root_pages_id(target)?;
    for page_id in &copied {
        if let Ok(Object::Dictionary(page)) = target.get_object_mut(*page_id) {
            page.set("Parent", Object::Reference(pages_id));
        }
    }

    let pages_dict = target.get_object_mut(pages_id)?.as_dict_mut()?;
    let existing = pages_dict.get(b"Kids")?.as_array()?.clone();
    let count = pages_dict.get(b"Count")?.as_i64()?;
    let kids: Vec<Object> = copied
        .iter()
        .map(|id| Object::Reference(*id))
        .chain(existing)
        .collect();
    pages_dict.set("Kids", Object::Array(kids));
    pages_dict.set("Count", count + copied.len() as i64);

    log::debug!("Prepended {} page(s)", copied.len());
    Ok(copied.len())
}

fn root_pages_id(doc: &Document) -> Result<ObjectId, ComposerError> {
    let root_id = doc.trailer.get(b"Root")?.as_reference()?;
    Ok(doc.get_dictionary(root_id)?.get(b"Pages")?.as_reference()?)
}

/// Adds a new content stream to an existing page, drawn on top of what is
/// already there.
pub fn overlay_content(
    doc: &mut Document,
    page_id: ObjectId,
    content_stream: Vec<u8>,
) -> Result<(), ComposerError> {
    let new_content_id = doc.add_object(Stream::new(dictionary! {}, content_stream));
    let page_dict = doc.get_object_mut(page_id)?.as_dict_mut()?;

    let mut contents = match page_dict.get(b"Contents") {
        Ok(Object::Array(items)) => items.clone(),
        Ok(single) => vec![single.clone()],
        Err(_) => return Err(ComposerError::MissingContents(page_id)),
    };
    contents.push(Object::Reference(new_content_id));
    page_dict.set("Contents", Object::Array(contents));
    Ok(())
}

/// One line of footer text at an absolute position on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Footer {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

/// Overlays a footer on every page. `footer` receives the 1-based page
/// number and the total page count; returning `None` leaves the page alone.
///
/// The footer is drawn in Helvetica, registered on each page's font
/// resources as [`FOOTER_FONT`].
pub fn stamp_footers<F>(doc: &mut Document, footer: F) -> Result<usize, ComposerError>
where
    F: Fn(usize, usize) -> Option<Footer>,
{
    let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
    let total = pages.len();
    let mut stamped = 0;
    for (index, page_id) in pages.into_iter().enumerate() {
        let Some(footer) = footer(index + 1, total) else {
            continue;
        };
        ensure_font(doc, page_id, FOOTER_FONT, "Helvetica")?;
        overlay_content(doc, page_id, footer_stream(&footer))?;
        stamped += 1;
    }
    Ok(stamped)
}

fn footer_stream(footer: &Footer) -> Vec<u8> {
    let text: Vec<u8> = footer
        .text
        .chars()
        .map(|c| if (c as u32) <= 0xFF { c as u8 } else { b'?' })
        .collect();
    let mut out = Vec::with_capacity(text.len() + 48);
    out.extend_from_slice(
        format!(
            "BT /{} {} Tf {} {} Td (",
            FOOTER_FONT, footer.size, footer.x, footer.y
        )
        .as_bytes(),
    );
    for byte in text {
        if matches!(byte, b'(' | b')' | b'\\') {
            out.push(b'\\');
        }
        out.push(byte);
    }
    out.extend_from_slice(b") Tj ET");
    out
}

/// Makes sure the page's font resources contain `name`.
///
/// Resources are looked up on the page first and then up the page tree. An
/// indirect resource dictionary is updated in place, so every page sharing it
/// sees the font; an inline one is copied onto the page itself.
fn ensure_font(
    doc: &mut Document,
    page_id: ObjectId,
    name: &str,
    base_font: &str,
) -> Result<(), ComposerError> {
    let (resources_ref, mut resources) = find_resources(doc, page_id)?;

    let fonts_ref = resources.get(b"Font").and_then(Object::as_reference).ok();
    let mut fonts = match fonts_ref {
        Some(id) => doc.get_dictionary(id)?.clone(),
        None => resources
            .get(b"Font")
            .and_then(Object::as_dict)
            .cloned()
            .unwrap_or_else(|_| Dictionary::new()),
    };
    if fonts.has(name.as_bytes()) {
        return Ok(());
    }
    fonts.set(
        name,
        dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => base_font,
            "Encoding" => "WinAnsiEncoding",
        },
    );

    match fonts_ref {
        Some(id) => {
            doc.objects.insert(id, Object::Dictionary(fonts));
        }
        None => resources.set("Font", fonts),
    }
    match resources_ref {
        Some(id) => {
            doc.objects.insert(id, Object::Dictionary(resources));
        }
        None => doc
            .get_object_mut(page_id)?
            .as_dict_mut()?
            .set("Resources", resources),
    }
    Ok(())
}

fn find_resources(
    doc: &Document,
    page_id: ObjectId,
) -> Result<(Option<ObjectId>, Dictionary), ComposerError> {
    let mut node = Some(page_id);
    // Depth guard against malformed, cyclic trees.
    for _ in 0..32 {
        let Some(id) = node else { break };
        let dict = doc.get_dictionary(id)?;
        match dict.get(b"Resources") {
            Ok(Object::Reference(res_id)) => {
                return Ok((Some(*res_id), doc.get_dictionary(*res_id)?.clone()));
            }
            Ok(Object::Dictionary(inline)) => return Ok((None, inline.clone())),
            _ => node = dict.get(b"Parent").and_then(Object::as_reference).ok(),
        }
    }
    Ok((None, Dictionary::new()))
}
