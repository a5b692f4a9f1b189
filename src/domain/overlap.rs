//! Reconciliation of link regions against independent text hits.
//!
//! A text hit that shares any area with a matched link's region is treated
//! as the same logical content and is not redacted a second time. This can
//! suppress a hit that merely overlaps a link without being its text; that
//! trade-off is accepted.

use super::Rectangle;

/// Text hits split by whether a link region already covers them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextPartition {
    pub covered: Vec<Rectangle>,
    pub standalone: Vec<Rectangle>,
}

/// Splits `text` hits into those covered by some rectangle in `links` and
/// those standing alone. Order within each group follows `text`.
pub fn partition_text_regions(links: &[Rectangle], text: &[Rectangle]) -> TextPartition {
    let mut partition = TextPartition::default();
    for hit in text {
        if links.iter().any(|region| region.intersects(hit)) {
            partition.covered.push(*hit);
        } else {
            partition.standalone.push(*hit);
        }
    }
    partition
}

/// Text hits that no link region intersects.
pub fn standalone_regions(links: &[Rectangle], text: &[Rectangle]) -> Vec<Rectangle> {
    partition_text_regions(links, text).standalone
}
