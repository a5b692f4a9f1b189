//! Test fixtures and PDF builders.
//!
//! PDFs are assembled object by object with lopdf so tests control exactly
//! where text sits and which link annotations cover it. Coordinates are PDF
//! user space (origin bottom-left) on a 612x792 Letter page.

use anyhow::Result;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::path::{Path, PathBuf};

pub const PAGE_WIDTH: i64 = 612;
pub const PAGE_HEIGHT: i64 = 792;
pub const FONT_SIZE: i64 = 12;

#[derive(Debug, Clone)]
enum LinkTarget {
    Uri(String),
    /// Zero-based page inside the same document.
    Page(usize),
}

#[derive(Debug, Clone, Default)]
struct PageSpec {
    lines: Vec<(i64, i64, String)>,
    links: Vec<([i64; 4], LinkTarget)>,
}

/// Builder for creating test PDFs with positioned text and links.
///
/// # Example
///
/// ```no_run
/// # use std::path::Path;
/// # fn main() -> anyhow::Result<()> {
/// TestPdfBuilder::new()
///     .text(72, 700, "click here")
///     .link([70, 695, 140, 712], "http://evil.example/track?x=1")
///     .new_page()
///     .text(72, 400, "page two")
///     .build(Path::new("/tmp/test.pdf"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TestPdfBuilder {
    pages: Vec<PageSpec>,
}

impl TestPdfBuilder {
    /// Creates a builder holding one empty page.
    pub fn new() -> Self {
        Self {
            pages: vec![PageSpec::default()],
        }
    }

    /// Starts a new page; later calls add to it.
    pub fn new_page(mut self) -> Self {
        self.pages.push(PageSpec::default());
        self
    }

    /// Places a line of Helvetica text with its baseline at (`x`, `y`).
    pub fn text(mut self, x: i64, y: i64, text: &str) -> Self {
        self.current().lines.push((x, y, text.to_string()));
        self
    }

    /// Adds a URI link annotation over `rect` (`[x0, y0, x1, y1]`).
    pub fn link(mut self, rect: [i64; 4], uri: &str) -> Self {
        self.current()
            .links
            .push((rect, LinkTarget::Uri(uri.to_string())));
        self
    }

    /// Adds an internal GoTo link over `rect` jumping to zero-based `page`.
    pub fn goto_link(mut self, rect: [i64; 4], page: usize) -> Self {
        self.current().links.push((rect, LinkTarget::Page(page)));
        self
    }

    fn current(&mut self) -> &mut PageSpec {
        self.pages.last_mut().expect("builder always has a page")
    }

    /// Builds the PDF and writes it to the specified path.
    pub fn build(self, output_path: &Path) -> Result<PathBuf> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let page_ids: Vec<ObjectId> = self.pages.iter().map(|_| doc.new_object_id()).collect();

        for (spec, page_id) in self.pages.iter().zip(&page_ids) {
            let mut operations = Vec::new();
            for (x, y, text) in &spec.lines {
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new(
                    "Tf",
                    vec!["F1".into(), Object::Integer(FONT_SIZE)],
                ));
                operations.push(Operation::new(
                    "Td",
                    vec![Object::Integer(*x), Object::Integer(*y)],
                ));
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(text.as_str())],
                ));
                operations.push(Operation::new("ET", vec![]));
            }
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

            let mut annots: Vec<Object> = Vec::new();
            for (rect, target) in &spec.links {
                let action = match target {
                    LinkTarget::Uri(uri) => dictionary! {
                        "S" => "URI",
                        "URI" => Object::string_literal(uri.as_str()),
                    },
                    LinkTarget::Page(page) => dictionary! {
                        "S" => "GoTo",
                        "D" => vec![Object::Reference(page_ids[*page]), "Fit".into()],
                    },
                };
                let annot_id = doc.add_object(dictionary! {
                    "Type" => "Annot",
                    "Subtype" => "Link",
                    "Rect" => rect.iter().map(|v| Object::Integer(*v)).collect::<Vec<Object>>(),
                    "Border" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(0)],
                    "A" => action,
                });
                annots.push(annot_id.into());
            }

            let mut page = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            };
            if !annots.is_empty() {
                page.set("Annots", annots);
            }
            doc.objects.insert(*page_id, Object::Dictionary(page));
        }

        let kids: Vec<Object> = page_ids.iter().map(|id| (*id).into()).collect();
        let count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(PAGE_WIDTH),
                Object::Integer(PAGE_HEIGHT),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();
        doc.save(output_path)?;

        Ok(output_path.to_path_buf())
    }
}

impl Default for TestPdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The tracking-link brochure: a link to `http://evil.example/track?x=1`
/// over "click here", and an unrelated plain-text mention further down.
pub fn create_tracking_brochure(path: &Path) -> Result<PathBuf> {
    TestPdfBuilder::new()
        .text(72, 720, "Spring catalogue")
        .text(72, 700, "click here")
        .link([70, 695, 140, 712], "http://evil.example/track?x=1")
        .text(72, 400, "Questions? Write to evil.example support")
        .build(path)
}

/// Two pages without any occurrence of the usual test patterns.
pub fn create_plain_document(path: &Path) -> Result<PathBuf> {
    TestPdfBuilder::new()
        .text(72, 700, "Quarterly summary")
        .link([70, 600, 200, 615], "https://example.org/about")
        .text(72, 605, "About us")
        .new_page()
        .text(72, 700, "Appendix")
        .build(path)
}
