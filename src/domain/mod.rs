//! Domain models and matching logic.
//!
//! This module holds the value types the engine reasons about (rectangles
//! and links) together with the two pure decisions it makes: which links
//! match the pattern, and which text hits are not already covered by a link.

pub mod geometry;
pub mod link;
pub mod overlap;

pub use geometry::Rectangle;
pub use link::{Link, LinkMatcher};
pub use overlap::{partition_text_regions, standalone_regions, TextPartition};

/// An RGB color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub const WHITE: Rgb = Rgb(1.0, 1.0, 1.0);
    pub const RED: Rgb = Rgb(1.0, 0.0, 0.0);

    /// Components as an array, in the order the PDF color operators expect.
    pub fn components(&self) -> [f32; 3] {
        [self.0, self.1, self.2]
    }
}
