//! Remove hyperlinks and redact text matching a pattern from PDF documents.
//!
//! Given a search string, every link whose target contains it (ignoring
//! case) is removed, the link's clickable area is blanked, and every other
//! literal occurrence of the string in the page text is blanked too. Content
//! is physically removed with MuPDF's redaction API, each region is painted
//! over and optionally stamped with replacement text, and the result is
//! written to a compressed copy next to the input.
//!
//! # Architecture
//!
//! - [`domain`]: Rectangles, links, link matching and overlap reconciliation
//! - [`redaction`]: Per-page planning, the executor state machine, the MuPDF
//!   backend, overlay stamping and output naming
//! - [`error`]: Error taxonomy
//!
//! # Quick Start
//!
//! ```no_run
//! use pdf_scrub::{RedactionOptions, RedactionService};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = RedactionService::with_mupdf();
//! let options = RedactionOptions::new("evil.example")
//!     .with_replacement(Some("[REDACTED]".to_string()));
//!
//! let report = service.redact(Path::new("brochure.pdf"), &options)?;
//! println!("removed {} links", report.summary.links_removed);
//! # Ok(())
//! # }
//! ```
//!
//! # Planning without a document
//!
//! ```
//! use pdf_scrub::domain::{Link, LinkMatcher, Rectangle};
//! use pdf_scrub::{PagePlan, RedactionOptions};
//!
//! let link_area = Rectangle::new(72.0, 100.0, 140.0, 114.0);
//! let links = vec![Link::new("http://evil.example/track", Some(link_area))];
//! let text_hits = vec![Rectangle::new(72.0, 400.0, 160.0, 414.0)];
//!
//! let options = RedactionOptions::new("evil.example");
//! let matcher = LinkMatcher::new(&options.pattern).unwrap();
//! let plan = PagePlan::from_scan(0, &links, &text_hits, &matcher, &options);
//!
//! assert_eq!(plan.links_removed(), 1);
//! assert_eq!(plan.text_instances(), 2);
//! ```

pub mod domain;
pub mod error;
pub mod redaction;

pub use domain::{Link, LinkMatcher, Rectangle, Rgb};
pub use error::{ErrorKind, RedactorError, RedactorResult};
pub use redaction::{
    output_path_for, DocumentBackend, MuPdfBackend, PagePlan, RedactableDocument,
    RedactablePage, RedactionAction, RedactionOptions, RedactionReport, RedactionService,
    RedactionSummary, RegionSource,
};
