//! MuPDF document backend.
//!
//! Links are read straight from the page's `/Annots` array so the URI is
//! the one stored in the file, and a matched link is removed from that
//! array in memory. Redactions are registered as PDF redaction annotations
//! and applied with `pdf_redact_page`, which physically removes the covered
//! content; the fill and replacement text are then drawn over each region.

use std::path::Path;

use mupdf::pdf::{PdfAnnotationType, PdfDocument, PdfObject, PdfPage, PdfWriteOptions};
use mupdf::{Buffer, Matrix, Point};
use tracing::{debug, info};

use super::plan::RedactionAction;
use super::stamp;
use super::strategy::{DocumentBackend, RedactableDocument, RedactablePage};
use crate::domain::{Link, Rectangle};
use crate::error::{RedactorError, RedactorResult};

/// Garbage collection level used when saving: compact, renumber and
/// deduplicate objects.
const GARBAGE_LEVEL: i32 = 3;

/// Opens documents with MuPDF.
#[derive(Debug, Clone, Copy, Default)]
pub struct MuPdfBackend;

impl MuPdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentBackend for MuPdfBackend {
    type Document = MuPdfDocument;

    fn open(&self, path: &Path) -> RedactorResult<MuPdfDocument> {
        let path_str = utf8_path(path, "input")?;
        let doc = PdfDocument::open(path_str).map_err(|e| RedactorError::PdfProcessing {
            message: "Failed to open PDF with MuPDF".to_string(),
            page: None,
            source: Some(Box::new(e)),
        })?;

        Ok(MuPdfDocument { doc })
    }

    fn name(&self) -> &str {
        "MuPDF"
    }
}

/// A document opened with MuPDF.
pub struct MuPdfDocument {
    doc: PdfDocument,
}

impl RedactableDocument for MuPdfDocument {
    type Page = MuPdfPage;

    fn page_count(&self) -> RedactorResult<usize> {
        let count = self
            .doc
            .page_count()
            .map_err(|e| RedactorError::mupdf("Failed to get page count", e))?;
        Ok(count.max(0) as usize)
    }

    fn load_page(&self, index: usize) -> RedactorResult<MuPdfPage> {
        let page = self
            .doc
            .load_page(index as i32)
            .map_err(|e| page_error(index, format!("Failed to load page {}", index + 1), e))?;

        let page = PdfPage::try_from(page).map_err(|e| RedactorError::PdfProcessing {
            message: "Page does not support annotations".to_string(),
            page: Some(index + 1),
            source: Some(Box::new(e)),
        })?;

        Ok(MuPdfPage {
            index,
            page,
            staged: Vec::new(),
        })
    }

    fn finish_page(&mut self, _index: usize, _page: MuPdfPage) -> RedactorResult<()> {
        // Page edits are made on objects owned by the document.
        Ok(())
    }

    fn save(&mut self, output: &Path) -> RedactorResult<()> {
        let output_str = utf8_path(output, "output")?;

        let mut options = PdfWriteOptions::default();
        options.set_garbage_level(GARBAGE_LEVEL).set_compress(true);

        self.doc
            .save_with_options(output_str, options)
            .map_err(|e| RedactorError::PdfProcessing {
                message: "Failed to save redacted PDF".to_string(),
                page: None,
                source: Some(Box::new(e)),
            })?;

        info!(output = %output.display(), "saved document");
        Ok(())
    }
}

/// A single PDF page plus the redactions staged on it.
pub struct MuPdfPage {
    index: usize,
    page: PdfPage,
    staged: Vec<RedactionAction>,
}

fn page_error(index: usize, message: impl Into<String>, source: mupdf::Error) -> RedactorError {
    RedactorError::PdfProcessing {
        message: message.into(),
        page: Some(index + 1),
        source: Some(Box::new(source)),
    }
}

impl MuPdfPage {
    /// URI links on the page with their position in `/Annots`.
    fn uri_links(&self) -> RedactorResult<Vec<(i32, Link)>> {
        scan_uri_links(&self.page)
            .map_err(|e| page_error(self.index, "Failed to read link annotations", e))
    }

    /// Paints the fill and replacement text over every applied region.
    fn draw_overlay(&mut self, actions: &[RedactionAction]) -> RedactorResult<()> {
        let index = self.index;
        let ctm = self
            .page
            .ctm()
            .map_err(|e| page_error(index, "Failed to read page transform", e))?;
        let to_user = stamp::invert([ctm.a, ctm.b, ctm.c, ctm.d, ctm.e, ctm.f]).ok_or_else(|| {
            RedactorError::PdfProcessing {
                message: "Page transform is not invertible".to_string(),
                page: Some(index + 1),
                source: None,
            }
        })?;

        let content = stamp::overlay_content(actions, to_user)?;
        append_overlay(&self.page, &content)
            .map_err(|e| page_error(index, "Failed to draw redaction overlay", e))
    }
}

impl RedactablePage for MuPdfPage {
    fn links(&self) -> RedactorResult<Vec<Link>> {
        Ok(self.uri_links()?.into_iter().map(|(_, link)| link).collect())
    }

    fn delete_link(&mut self, link: &Link) -> RedactorResult<()> {
        let index = self.index;
        let slot = self
            .uri_links()?
            .into_iter()
            .find(|(_, candidate)| candidate == link)
            .map(|(slot, _)| slot)
            .ok_or_else(|| RedactorError::PdfProcessing {
                message: format!("Link to '{}' is no longer on the page", link.uri),
                page: Some(index + 1),
                source: None,
            })?;

        let annots = self
            .page
            .object()
            .get_dict("Annots")
            .map_err(|e| page_error(index, "Failed to read link annotations", e))?;
        if let Some(mut annots) = annots {
            annots
                .array_delete(slot)
                .map_err(|e| page_error(index, "Failed to remove link", e))?;
        }

        debug!(page = index + 1, uri = %link.uri, slot, "removed link");
        Ok(())
    }

    fn search_for(&self, needle: &str, max_hits: u32) -> RedactorResult<Vec<Rectangle>> {
        let hits = self.page.search(needle, max_hits).map_err(|e| {
            RedactorError::mupdf(format!("Search failed for pattern: {}", needle), e)
        })?;

        let mut regions = Vec::new();
        for quad in hits {
            regions.push(Rectangle::from_quad(&quad));
        }
        Ok(regions)
    }

    fn add_redaction(&mut self, action: &RedactionAction) -> RedactorResult<()> {
        let index = self.index;
        let annot = self
            .page
            .create_annotation(PdfAnnotationType::Redact)
            .map_err(|e| page_error(index, "Failed to create redaction annotation", e))?;

        unsafe {
            ffi::set_annotation_rect(&annot, action.region)?;
        }
        self.staged.push(action.clone());
        Ok(())
    }

    fn apply_redactions(&mut self) -> RedactorResult<()> {
        let index = self.index;
        self.page
            .redact()
            .map_err(|e| page_error(index, "Failed to apply redactions", e))?;

        let actions = std::mem::take(&mut self.staged);
        self.draw_overlay(&actions)
    }
}

fn utf8_path<'a>(path: &'a Path, parameter: &str) -> RedactorResult<&'a str> {
    path.to_str().ok_or_else(|| RedactorError::InvalidInput {
        parameter: parameter.to_string(),
        reason: "Path contains invalid UTF-8".to_string(),
    })
}

/// Link annotations with a `/URI` action, keyed by their `/Annots` index.
///
/// GoTo, GoToR, Launch and other actions carry no web address and are
/// skipped.
fn scan_uri_links(page: &PdfPage) -> Result<Vec<(i32, Link)>, mupdf::Error> {
    let Some(annots) = page.object().get_dict("Annots")? else {
        return Ok(Vec::new());
    };
    if !annots.is_array()? {
        return Ok(Vec::new());
    }

    let ctm = page.ctm()?;
    let mut links = Vec::new();
    for slot in 0..annots.len()? as i32 {
        let Some(annot) = annots.get_array(slot)? else {
            continue;
        };
        if let Some(link) = uri_link(&annot, &ctm)? {
            links.push((slot, link));
        }
    }
    Ok(links)
}

fn uri_link(annot: &PdfObject, ctm: &Matrix) -> Result<Option<Link>, mupdf::Error> {
    if !has_name(annot, "Subtype", b"Link")? {
        return Ok(None);
    }
    let Some(action) = annot.get_dict("A")? else {
        return Ok(None);
    };
    if !has_name(&action, "S", b"URI")? {
        return Ok(None);
    }
    let Some(uri) = action.get_dict("URI")? else {
        return Ok(None);
    };
    if !uri.is_string()? {
        return Ok(None);
    }

    let uri = String::from_utf8_lossy(uri.as_bytes()?).into_owned();
    let region = annot_rect(annot)?.map(|rect| to_page_space(rect, ctm));
    Ok(Some(Link::new(uri, region)))
}

fn has_name(dict: &PdfObject, key: &str, expected: &[u8]) -> Result<bool, mupdf::Error> {
    Ok(match dict.get_dict(key)? {
        Some(value) => value.is_name()? && value.as_name()? == expected,
        None => false,
    })
}

/// The annotation's `/Rect` in user space, if well formed.
fn annot_rect(annot: &PdfObject) -> Result<Option<[f32; 4]>, mupdf::Error> {
    let Some(rect) = annot.get_dict("Rect")? else {
        return Ok(None);
    };
    if !rect.is_array()? || rect.len()? < 4 {
        return Ok(None);
    }

    let mut values = [0.0f32; 4];
    for (i, value) in values.iter_mut().enumerate() {
        match rect.get_array(i as i32)? {
            Some(number) if number.is_number()? => *value = number.as_float()?,
            _ => return Ok(None),
        }
    }
    Ok(Some(values))
}

fn to_page_space([x0, y0, x1, y1]: [f32; 4], ctm: &Matrix) -> Rectangle {
    Rectangle::enclosing(
        [(x0, y0), (x1, y0), (x0, y1), (x1, y1)].map(|(x, y)| Point::new(x, y).transform(ctm)),
    )
}

/// Wraps the existing content in `q`/`Q` and appends `overlay` after it.
fn append_overlay(page: &PdfPage, overlay: &[u8]) -> Result<(), mupdf::Error> {
    let mut page_obj = page.object();
    let mut doc = page_obj
        .document()
        .ok_or(mupdf::Error::InvalidPdfDocument)?;

    register_overlay_font(&mut doc, &mut page_obj)?;

    let mut contents = doc.new_array()?;
    contents.array_push(new_stream(&mut doc, b"q\n")?)?;
    if let Some(existing) = page_obj.get_dict("Contents")? {
        if existing.is_array()? {
            for i in 0..existing.len()? as i32 {
                if let Some(part) = existing.get_array(i)? {
                    contents.array_push(part)?;
                }
            }
        } else {
            contents.array_push(existing)?;
        }
    }

    let mut tail = b"Q\n".to_vec();
    tail.extend_from_slice(overlay);
    contents.array_push(new_stream(&mut doc, &tail)?)?;

    page_obj.dict_put("Contents", contents)
}

fn register_overlay_font(
    doc: &mut PdfDocument,
    page_obj: &mut PdfObject,
) -> Result<(), mupdf::Error> {
    let mut resources = match page_obj.get_dict_inheritable("Resources")? {
        Some(resources) => resources,
        None => {
            page_obj.dict_put("Resources", doc.new_dict()?)?;
            page_obj
                .get_dict("Resources")?
                .ok_or(mupdf::Error::UnexpectedNullPtr)?
        }
    };

    let mut fonts = match resources.get_dict("Font")? {
        Some(fonts) => fonts,
        None => {
            resources.dict_put("Font", doc.new_dict()?)?;
            resources
                .get_dict("Font")?
                .ok_or(mupdf::Error::UnexpectedNullPtr)?
        }
    };

    let font = doc.new_object_from_str(stamp::OVERLAY_FONT_DICT)?;
    let font = doc.add_object(&font)?;
    fonts.dict_put(stamp::OVERLAY_FONT, font)
}

fn new_stream(doc: &mut PdfDocument, bytes: &[u8]) -> Result<PdfObject, mupdf::Error> {
    let dict = doc.new_dict()?;
    let mut stream = doc.add_object(&dict)?;
    stream.write_stream_buffer(&Buffer::from_bytes(bytes)?)?;
    Ok(stream)
}

/// FFI helpers for MuPDF annotation operations.
mod ffi {
    use mupdf::pdf::PdfAnnotation;

    use crate::domain::Rectangle;
    use crate::error::{RedactorError, RedactorResult};

    /// Sets the area a redaction annotation covers, in page space.
    ///
    /// # Safety
    /// This function uses unsafe FFI calls to access MuPDF's C API.
    /// The annotation must be valid.
    pub unsafe fn set_annotation_rect(
        annot: &PdfAnnotation,
        region: Rectangle,
    ) -> RedactorResult<()> {
        #[repr(C)]
        struct PdfAnnotRaw {
            inner: *mut mupdf_sys::pdf_annot,
        }

        let annot_raw = std::mem::transmute::<&PdfAnnotation, &PdfAnnotRaw>(annot);
        let ctx = require_context(mupdf_sys::mupdf_new_base_context())?;

        let fz_rect = mupdf_sys::fz_rect {
            x0: region.x0,
            y0: region.y0,
            x1: region.x1,
            y1: region.y1,
        };
        mupdf_sys::pdf_set_annot_rect(ctx, annot_raw.inner, fz_rect);
        mupdf_sys::mupdf_drop_base_context(ctx);
        Ok(())
    }

    pub(super) fn require_context(
        ctx: *mut mupdf_sys::fz_context,
    ) -> RedactorResult<*mut mupdf_sys::fz_context> {
        if ctx.is_null() {
            return Err(RedactorError::BackendError {
                backend: "MuPDF".to_string(),
                message: "Failed to create a context for the redaction area".to_string(),
                source: None,
            });
        }
        Ok(ctx)
    }
}
