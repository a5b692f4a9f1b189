//! Per-page redaction planning.
//!
//! A plan is computed from a read-only view of the page: which links match,
//! which text hits they already cover, and the ordered list of regions to
//! blank. Link regions come first, then standalone text hits.

use tracing::{debug, warn};

use super::strategy::{RedactablePage, RedactionOptions, SEARCH_BATCH};
use crate::domain::{partition_text_regions, Link, LinkMatcher, Rectangle, Rgb};
use crate::error::RedactorResult;

/// Why a region is being redacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionSource {
    /// The clickable area of a matched link
    Link,
    /// A text hit not covered by any matched link
    Text,
}

/// A pending instruction to blank one rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct RedactionAction {
    pub region: Rectangle,
    /// Stamped into the region after removal; empty to leave it blank
    pub replacement: String,
    pub fill: Rgb,
    pub text_color: Rgb,
    pub source: RegionSource,
}

/// Everything decided for one page before any mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct PagePlan {
    /// Zero-based page index
    pub page: usize,
    /// Links whose target matched, including those without a region
    pub matched_links: Vec<Link>,
    /// Text hits suppressed because a link region covers them
    pub covered_text: Vec<Rectangle>,
    /// Regions to blank, in application order
    pub actions: Vec<RedactionAction>,
}

impl PagePlan {
    /// Scans `page` and builds its plan.
    pub fn build<P: RedactablePage>(
        index: usize,
        page: &P,
        matcher: &LinkMatcher,
        options: &RedactionOptions,
    ) -> RedactorResult<Self> {
        let links = page.links()?;
        let text_hits = collect_text_hits(index, page, &options.pattern, options.max_hits)?;
        Ok(Self::from_scan(index, &links, &text_hits, matcher, options))
    }

    /// Builds a plan from already scanned links and text hits.
    pub fn from_scan(
        index: usize,
        links: &[Link],
        text_hits: &[Rectangle],
        matcher: &LinkMatcher,
        options: &RedactionOptions,
    ) -> Self {
        let matched_links: Vec<Link> = matcher.matching(links).into_iter().cloned().collect();
        let link_regions: Vec<Rectangle> =
            matched_links.iter().filter_map(|link| link.region).collect();
        let partition = partition_text_regions(&link_regions, text_hits);

        let action = |region: Rectangle, source: RegionSource| RedactionAction {
            region,
            replacement: options.replacement_text().to_string(),
            fill: options.fill,
            text_color: options.text_color,
            source,
        };
        let actions: Vec<RedactionAction> = link_regions
            .iter()
            .map(|region| action(*region, RegionSource::Link))
            .chain(
                partition
                    .standalone
                    .iter()
                    .map(|region| action(*region, RegionSource::Text)),
            )
            .collect();

        debug!(
            page = index + 1,
            links = links.len(),
            matched_links = matched_links.len(),
            text_hits = text_hits.len(),
            covered = partition.covered.len(),
            actions = actions.len(),
            "planned page"
        );

        Self {
            page: index,
            matched_links,
            covered_text: partition.covered,
            actions,
        }
    }

    pub fn links_removed(&self) -> usize {
        self.matched_links.len()
    }

    /// Link regions plus standalone text hits.
    pub fn text_instances(&self) -> usize {
        self.actions.len()
    }

    /// Returns true if nothing on the page needs to change.
    pub fn is_noop(&self) -> bool {
        self.matched_links.is_empty() && self.actions.is_empty()
    }
}

/// Searches `page` for `needle`.
///
/// With a cap, at most `cap` hits come back and reaching it is logged.
/// Without one, the request grows until the page returns fewer hits than
/// were asked for.
fn collect_text_hits<P: RedactablePage>(
    index: usize,
    page: &P,
    needle: &str,
    cap: Option<u32>,
) -> RedactorResult<Vec<Rectangle>> {
    if let Some(cap) = cap {
        let hits = page.search_for(needle, cap)?;
        if hits.len() >= cap as usize {
            warn!(
                page = index + 1,
                cap, "text hit limit reached, further matches left in place"
            );
        }
        return Ok(hits);
    }

    let mut limit = SEARCH_BATCH;
    loop {
        let hits = page.search_for(needle, limit)?;
        if hits.len() < limit as usize || limit == u32::MAX {
            return Ok(hits);
        }
        debug!(page = index + 1, limit, "search saturated, retrying");
        limit = limit.saturating_mul(2);
    }
}
