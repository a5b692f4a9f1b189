//! Backend abstraction and supporting types.
//!
//! The planner and executor only talk to documents through the traits in
//! this module, so the decision engine can run against MuPDF in production
//! and against in-memory pages in tests.

use std::path::{Path, PathBuf};

use super::plan::RedactionAction;
use crate::domain::{Link, Rectangle, Rgb};
use crate::error::RedactorResult;

/// Label reported when regions are blanked without replacement text.
pub const BLANK_LABEL: &str = "[BLANK]";

/// Hits requested from the search primitive on the first attempt.
///
/// Uncapped searches double the request until a page returns fewer hits
/// than were asked for.
pub const SEARCH_BATCH: u32 = 1000;

/// What to look for and how to redact it.
#[derive(Debug, Clone)]
pub struct RedactionOptions {
    /// Literal text matched in page text and, case-insensitively, in link URIs
    pub pattern: String,

    /// Text stamped into each redacted region
    pub replacement: Option<String>,

    /// Count matches without touching the document
    pub dry_run: bool,

    /// Hard cap on text hits per page; `None` collects every hit
    pub max_hits: Option<u32>,

    /// Color painted over each redacted region
    pub fill: Rgb,

    /// Color of the replacement text
    pub text_color: Rgb,
}

impl RedactionOptions {
    /// Creates options for `pattern` with a blank white fill and red text.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: None,
            dry_run: false,
            max_hits: None,
            fill: Rgb::WHITE,
            text_color: Rgb::RED,
        }
    }

    /// Sets the replacement text. An empty string behaves like no replacement.
    pub fn with_replacement(mut self, replacement: Option<String>) -> Self {
        self.replacement = replacement.filter(|text| !text.is_empty());
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Caps the number of text hits redacted per page.
    pub fn with_max_hits(mut self, max_hits: Option<u32>) -> Self {
        self.max_hits = max_hits;
        self
    }

    pub fn with_colors(mut self, fill: Rgb, text_color: Rgb) -> Self {
        self.fill = fill;
        self.text_color = text_color;
        self
    }

    /// Text actually stamped into regions; empty when blanking.
    pub fn replacement_text(&self) -> &str {
        self.replacement.as_deref().unwrap_or("")
    }

    /// Replacement as shown to the user.
    pub fn replacement_label(&self) -> &str {
        self.replacement.as_deref().unwrap_or(BLANK_LABEL)
    }
}

/// Counters accumulated across every page of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RedactionSummary {
    /// Links whose target matched (removed, or to be removed on a dry run)
    pub links_removed: usize,

    /// Link regions plus standalone text hits redacted
    pub text_instances_redacted: usize,

    /// Pages visited
    pub pages_processed: usize,

    /// Pages with at least one link removal or redaction
    pub pages_modified: usize,
}

impl RedactionSummary {
    /// Returns true if anything matched.
    pub fn has_matches(&self) -> bool {
        self.links_removed > 0 || self.text_instances_redacted > 0
    }
}

/// Outcome of a whole-document run.
#[derive(Debug, Clone)]
pub struct RedactionReport {
    pub summary: RedactionSummary,

    /// Where the sanitized copy was written; `None` on a dry run
    pub output: Option<PathBuf>,

    pub dry_run: bool,
}

/// A single page as seen by the redaction engine.
pub trait RedactablePage {
    /// Hyperlinks on the page, in annotation order.
    fn links(&self) -> RedactorResult<Vec<Link>>;

    /// Detaches `link` so the saved document no longer carries it.
    fn delete_link(&mut self, link: &Link) -> RedactorResult<()>;

    /// Bounding boxes of literal occurrences of `needle`, at most `max_hits`.
    fn search_for(&self, needle: &str, max_hits: u32) -> RedactorResult<Vec<Rectangle>>;

    /// Stages one redaction; nothing changes until [`apply_redactions`](Self::apply_redactions).
    fn add_redaction(&mut self, action: &RedactionAction) -> RedactorResult<()>;

    /// Executes every staged redaction on the page in one pass.
    fn apply_redactions(&mut self) -> RedactorResult<()>;
}

/// An open document exclusively owned by one run.
pub trait RedactableDocument {
    type Page: RedactablePage;

    fn page_count(&self) -> RedactorResult<usize>;

    /// Loads the page at zero-based `index`.
    fn load_page(&self, index: usize) -> RedactorResult<Self::Page>;

    /// Hands a processed page back so its changes are kept for saving.
    fn finish_page(&mut self, index: usize, page: Self::Page) -> RedactorResult<()>;

    /// Writes the document to `output`, garbage collected and compressed.
    fn save(&mut self, output: &Path) -> RedactorResult<()>;
}

/// Opens documents for redaction.
pub trait DocumentBackend {
    type Document: RedactableDocument;

    fn open(&self, path: &Path) -> RedactorResult<Self::Document>;

    /// Returns a human-readable name for this backend.
    fn name(&self) -> &str;
}
