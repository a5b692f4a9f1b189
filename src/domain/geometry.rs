//! Page-space rectangles.

use mupdf::{Point, Quad};

/// Axis-aligned bounding box in page coordinates.
///
/// Coordinates follow MuPDF's page space: origin at the top-left corner,
/// `y` growing downward. A rectangle with `x0 >= x1` or `y0 >= y1` is empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rectangle {
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Returns `true` if the rectangle encloses no area.
    pub fn is_empty(&self) -> bool {
        !(self.x0 < self.x1 && self.y0 < self.y1)
    }

    /// Returns `Some(self)` unless the rectangle is empty.
    pub fn non_empty(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    /// Returns `true` if both rectangles share a region of positive area.
    ///
    /// Rectangles that only touch along an edge do not intersect, and an
    /// empty rectangle intersects nothing.
    pub fn intersects(&self, other: &Rectangle) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x0 < other.x1 && other.x0 < self.x1 && self.y0 < other.y1 && other.y0 < self.y1
    }
}

impl Rectangle {
    /// Smallest rectangle containing all four corners.
    pub fn enclosing(corners: [Point; 4]) -> Self {
        let mut rect = Self::new(f32::MAX, f32::MAX, f32::MIN, f32::MIN);
        for p in corners {
            rect.x0 = rect.x0.min(p.x);
            rect.y0 = rect.y0.min(p.y);
            rect.x1 = rect.x1.max(p.x);
            rect.y1 = rect.y1.max(p.y);
        }
        rect
    }

    /// Bounding box of a (possibly rotated) search hit.
    pub fn from_quad(quad: &Quad) -> Self {
        Self::enclosing([quad.ul, quad.ur, quad.ll, quad.lr])
    }
}
