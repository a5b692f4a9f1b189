//! In-memory pages for exercising the engine without MuPDF.

use std::path::{Path, PathBuf};

use super::plan::RedactionAction;
use super::strategy::{DocumentBackend, RedactableDocument, RedactablePage};
use crate::domain::{Link, Rectangle};
use crate::error::{RedactorError, RedactorResult};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FakePage {
    pub links: Vec<Link>,
    pub text: Vec<(String, Rectangle)>,
    pub staged: Vec<RedactionAction>,
    pub applied: Vec<RedactionAction>,
    pub apply_calls: usize,
    fail_apply: bool,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    pub fn with_text(mut self, text: &str, region: Rectangle) -> Self {
        self.text.push((text.to_string(), region));
        self
    }

    pub fn failing_on_apply(mut self) -> Self {
        self.fail_apply = true;
        self
    }
}

impl RedactablePage for FakePage {
    fn links(&self) -> RedactorResult<Vec<Link>> {
        Ok(self.links.clone())
    }

    fn delete_link(&mut self, link: &Link) -> RedactorResult<()> {
        if let Some(pos) = self.links.iter().position(|l| l == link) {
            self.links.remove(pos);
        }
        Ok(())
    }

    fn search_for(&self, needle: &str, max_hits: u32) -> RedactorResult<Vec<Rectangle>> {
        Ok(self
            .text
            .iter()
            .filter(|(text, _)| text.contains(needle))
            .map(|(_, region)| *region)
            .take(max_hits as usize)
            .collect())
    }

    fn add_redaction(&mut self, action: &RedactionAction) -> RedactorResult<()> {
        self.staged.push(action.clone());
        Ok(())
    }

    fn apply_redactions(&mut self) -> RedactorResult<()> {
        if self.fail_apply {
            return Err(RedactorError::PdfProcessing {
                message: "apply failed".to_string(),
                page: None,
                source: None,
            });
        }
        let staged = std::mem::take(&mut self.staged);
        self.text
            .retain(|(_, region)| !staged.iter().any(|a| a.region.intersects(region)));
        self.applied.extend(staged);
        self.apply_calls += 1;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeDocument {
    pub pages: Vec<FakePage>,
    pub saved_to: Option<PathBuf>,
}

impl RedactableDocument for FakeDocument {
    type Page = FakePage;

    fn page_count(&self) -> RedactorResult<usize> {
        Ok(self.pages.len())
    }

    fn load_page(&self, index: usize) -> RedactorResult<FakePage> {
        self.pages
            .get(index)
            .cloned()
            .ok_or_else(|| RedactorError::PdfProcessing {
                message: "no such page".to_string(),
                page: Some(index + 1),
                source: None,
            })
    }

    fn finish_page(&mut self, index: usize, page: FakePage) -> RedactorResult<()> {
        self.pages[index] = page;
        Ok(())
    }

    fn save(&mut self, output: &Path) -> RedactorResult<()> {
        self.saved_to = Some(output.to_path_buf());
        Ok(())
    }
}

/// Hands out a copy of a fixed document on every open.
#[derive(Debug, Clone, Default)]
pub struct FakeBackend {
    pub document: FakeDocument,
}

impl DocumentBackend for FakeBackend {
    type Document = FakeDocument;

    fn open(&self, _path: &Path) -> RedactorResult<FakeDocument> {
        Ok(self.document.clone())
    }

    fn name(&self) -> &str {
        "Fake"
    }
}
