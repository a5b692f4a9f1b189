//! Redaction planning, execution and output.
//!
//! [`RedactionService`] walks a document page by page: each page is scanned
//! into a [`PagePlan`], driven through the [`executor`] state machine, and
//! handed back to the document. On a live run the document is then saved
//! next to the input.

pub mod executor;
pub mod output;
pub mod plan;
pub mod secure;
pub mod stamp;
pub mod strategy;

#[cfg(test)]
pub(crate) mod fake;

pub use executor::{execute_page, ExecutionState, PageExecutor};
pub use output::output_path_for;
pub use plan::{PagePlan, RedactionAction, RegionSource};
pub use secure::MuPdfBackend;
pub use strategy::{
    DocumentBackend, RedactableDocument, RedactablePage, RedactionOptions, RedactionReport,
    RedactionSummary,
};

use std::path::Path;

use tracing::{debug, info, instrument};

use crate::domain::LinkMatcher;
use crate::error::{RedactorError, RedactorResult};

/// Redaction service coordinating a backend and the per-page engine.
pub struct RedactionService<B: DocumentBackend = MuPdfBackend> {
    backend: B,
}

impl<B: DocumentBackend> RedactionService<B> {
    /// Creates a new redaction service over the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Removes matching links and redacts matching text from `input`.
    ///
    /// On a live run the sanitized copy is written to
    /// [`output_path_for(input)`](output_path_for); the input is never
    /// modified. A dry run only counts. Any failure aborts the whole run.
    #[instrument(skip(self, options), fields(backend = self.backend.name(), dry_run = options.dry_run))]
    pub fn redact(
        &self,
        input: &Path,
        options: &RedactionOptions,
    ) -> RedactorResult<RedactionReport> {
        if !input.exists() {
            return Err(RedactorError::FileNotFound {
                path: input.to_path_buf(),
            });
        }
        let matcher = LinkMatcher::new(&options.pattern)?;

        let mut doc = self.backend.open(input)?;
        let page_count = doc.page_count()?;
        debug!(page_count, "opened document");

        let mut summary = RedactionSummary::default();
        for index in 0..page_count {
            let mut page = doc.load_page(index)?;
            let plan = PagePlan::build(index, &page, &matcher, options)?;
            execute_page(&mut page, plan, options.dry_run, &mut summary)?;
            doc.finish_page(index, page)?;
        }

        let output = if options.dry_run {
            None
        } else {
            let output = output_path_for(input);
            doc.save(&output)?;
            Some(output)
        };

        info!(
            links_removed = summary.links_removed,
            text_instances = summary.text_instances_redacted,
            pages_modified = summary.pages_modified,
            "finished"
        );

        Ok(RedactionReport {
            summary,
            output,
            dry_run: options.dry_run,
        })
    }
}

impl RedactionService<MuPdfBackend> {
    /// Creates a service backed by MuPDF (physical content removal).
    pub fn with_mupdf() -> Self {
        Self::new(MuPdfBackend::new())
    }
}

impl Default for RedactionService<MuPdfBackend> {
    fn default() -> Self {
        Self::with_mupdf()
    }
}
