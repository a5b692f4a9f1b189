//! Error types for the scrubbing library.
//!
//! Errors fall into two groups: problems with what the user asked for
//! (missing file, empty pattern) and failures while processing the document.
//! Both are fatal to the run.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for scrubbing operations.
pub type RedactorResult<T> = Result<T, RedactorError>;

/// Boxed source error carried by backend failures.
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Coarse classification used by the CLI to report failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request itself is invalid; raised before any document is opened.
    UserInput,
    /// Opening, scanning, staging, committing or saving failed.
    Processing,
}

/// Error type for all scrubbing operations.
#[derive(Debug, Error)]
pub enum RedactorError {
    /// Input document does not exist
    #[error("File '{}' not found.", path.display())]
    FileNotFound { path: PathBuf },

    /// Invalid configuration or parameters
    #[error("Invalid input for '{parameter}': {reason}")]
    InvalidInput { parameter: String, reason: String },

    /// Error occurred during PDF processing
    #[error("PDF processing error{}: {message}", on_page(.page))]
    PdfProcessing {
        message: String,
        page: Option<usize>,
        #[source]
        source: Option<BoxedSource>,
    },

    /// A page was driven through an illegal redaction state change
    #[error("Cannot {action} page {page} while it is {state}")]
    InvalidTransition {
        page: usize,
        state: &'static str,
        action: &'static str,
    },

    /// Backend-specific error (MuPDF, or lopdf while encoding overlays)
    #[error("{backend} backend error: {message}")]
    BackendError {
        backend: String,
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },
}

fn on_page(page: &Option<usize>) -> String {
    match page {
        Some(p) => format!(" on page {}", p),
        None => String::new(),
    }
}

impl RedactorError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileNotFound { .. } | Self::InvalidInput { .. } => ErrorKind::UserInput,
            _ => ErrorKind::Processing,
        }
    }

    /// Shorthand for a MuPDF failure.
    pub(crate) fn mupdf(message: impl Into<String>, source: mupdf::Error) -> Self {
        Self::BackendError {
            backend: "MuPDF".to_string(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl From<lopdf::Error> for RedactorError {
    fn from(err: lopdf::Error) -> Self {
        Self::BackendError {
            backend: "LoPDF".to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}
