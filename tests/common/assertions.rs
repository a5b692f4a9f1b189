//! Custom assertions for scrubbing tests.
//!
//! Provides domain-specific assertions that make tests more readable
//! and provide better error messages.

use lopdf::{Document, Object};
use std::path::Path;

/// Asserts that `pattern` no longer appears in the extracted text.
///
/// # Panics
/// Panics if the pattern is still found in the PDF text.
pub fn assert_redacted(pdf_path: &Path, pattern: &str) {
    let text = extract_text_or_panic(pdf_path);
    assert!(
        !text.contains(pattern),
        "Pattern '{}' should be redacted but was found in '{}'.\nExtracted text: {:?}",
        pattern,
        pdf_path.display(),
        text
    );
}

/// Asserts that `pattern` is still present in the extracted text.
///
/// # Panics
/// Panics if the pattern is not found in the PDF.
pub fn assert_preserved(pdf_path: &Path, pattern: &str) {
    let text = extract_text_or_panic(pdf_path);
    assert!(
        text.contains(pattern),
        "Pattern '{}' should be preserved but was not found in '{}'",
        pattern,
        pdf_path.display()
    );
}

/// Asserts that the file loads as a PDF with `pages` pages.
pub fn assert_valid_pdf(pdf_path: &Path, pages: usize) {
    let doc = Document::load(pdf_path)
        .unwrap_or_else(|e| panic!("'{}' is not a valid PDF: {}", pdf_path.display(), e));
    assert_eq!(
        doc.get_pages().len(),
        pages,
        "unexpected page count in '{}'",
        pdf_path.display()
    );
}

/// URIs of every link annotation in the document, in page order.
pub fn link_uris(pdf_path: &Path) -> Vec<String> {
    let doc = Document::load(pdf_path)
        .unwrap_or_else(|e| panic!("'{}' is not a valid PDF: {}", pdf_path.display(), e));

    let mut uris = Vec::new();
    for (_, page_id) in doc.get_pages() {
        let page = doc.get_dictionary(page_id).expect("page dictionary");
        for entry in page_annots(&doc, page) {
            let Some(annot) = resolve(&doc, entry) else {
                continue;
            };
            let is_link = annot
                .get(b"Subtype")
                .and_then(Object::as_name)
                .map_or(false, |name| name == b"Link");
            if !is_link {
                continue;
            }
            let action = annot.get(b"A").ok().and_then(|a| resolve(&doc, a));
            if let Some(Ok(Object::String(bytes, _))) = action.map(|a| a.get(b"URI")) {
                uris.push(String::from_utf8_lossy(bytes).into_owned());
            }
        }
    }
    uris
}

/// Number of link annotations of any kind, URI or not.
pub fn link_annotation_count(pdf_path: &Path) -> usize {
    let doc = Document::load(pdf_path)
        .unwrap_or_else(|e| panic!("'{}' is not a valid PDF: {}", pdf_path.display(), e));

    let mut count = 0;
    for (_, page_id) in doc.get_pages() {
        let page = doc.get_dictionary(page_id).expect("page dictionary");
        for entry in page_annots(&doc, page) {
            let is_link = resolve(&doc, entry)
                .and_then(|annot| annot.get(b"Subtype").and_then(Object::as_name).ok())
                .map_or(false, |name| name == b"Link");
            if is_link {
                count += 1;
            }
        }
    }
    count
}

fn page_annots<'a>(doc: &'a Document, page: &'a lopdf::Dictionary) -> &'a [Object] {
    let annots = match page.get(b"Annots") {
        Ok(Object::Reference(id)) => doc.get_object(*id).and_then(Object::as_array).ok(),
        Ok(obj) => obj.as_array().ok(),
        Err(_) => None,
    };
    annots.map_or(&[][..], Vec::as_slice)
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a lopdf::Dictionary> {
    match obj {
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        other => other.as_dict().ok(),
    }
}

fn extract_text_or_panic(pdf_path: &Path) -> String {
    let bytes = std::fs::read(pdf_path)
        .unwrap_or_else(|e| panic!("Failed to read '{}': {}", pdf_path.display(), e));
    pdf_extract::extract_text_from_mem(&bytes).unwrap_or_else(|e| {
        panic!(
            "Failed to extract text from PDF '{}': {}",
            pdf_path.display(),
            e
        )
    })
}
