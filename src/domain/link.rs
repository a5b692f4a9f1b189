//! Hyperlinks and URI matching.

use regex::{Regex, RegexBuilder};

use super::Rectangle;
use crate::error::{RedactorError, RedactorResult};

/// A hyperlink read from a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    /// Target URI as reported by the document backend.
    pub uri: String,
    /// Clickable area on the page. `None` when the annotation has no usable
    /// rectangle; such links are still removed but leave nothing to blank.
    pub region: Option<Rectangle>,
}

impl Link {
    pub fn new(uri: impl Into<String>, region: Option<Rectangle>) -> Self {
        Self {
            uri: uri.into(),
            region: region.and_then(Rectangle::non_empty),
        }
    }
}

/// Case-insensitive substring matcher for link targets.
///
/// The pattern is matched literally; regex metacharacters in it carry no
/// special meaning.
#[derive(Debug, Clone)]
pub struct LinkMatcher {
    needle: Regex,
}

impl LinkMatcher {
    /// Builds a matcher for `pattern`, which must not be empty.
    pub fn new(pattern: &str) -> RedactorResult<Self> {
        if pattern.is_empty() {
            return Err(RedactorError::InvalidInput {
                parameter: "pattern".to_string(),
                reason: "Pattern must not be empty".to_string(),
            });
        }

        let needle = RegexBuilder::new(&regex::escape(pattern))
            .case_insensitive(true)
            .build()
            .map_err(|e| RedactorError::InvalidInput {
                parameter: "pattern".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self { needle })
    }

    /// Returns `true` if `uri` contains the pattern, ignoring case.
    pub fn is_match(&self, uri: &str) -> bool {
        self.needle.is_match(uri)
    }

    /// Returns the links whose URI contains the pattern, in page order.
    pub fn matching<'a>(&self, links: &'a [Link]) -> Vec<&'a Link> {
        links.iter().filter(|link| self.is_match(&link.uri)).collect()
    }
}
