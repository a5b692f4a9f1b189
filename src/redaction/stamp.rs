//! Overlay drawn over redacted regions.
//!
//! Removing content leaves a hole; the overlay paints each region with its
//! fill color and, when a replacement is set, writes that text inside it in
//! the text color. Regions are in page space (origin top-left, y down) while
//! content streams are in PDF user space, so the whole overlay runs under a
//! single `cm` that maps one onto the other.

use lopdf::content::{Content, Operation};
use lopdf::Object;

use super::plan::RedactionAction;
use crate::domain::Rgb;
use crate::error::RedactorResult;

/// Resource name under which the overlay font is registered on the page.
pub const OVERLAY_FONT: &str = "ScrubHelv";

/// Font dictionary for [`OVERLAY_FONT`].
pub const OVERLAY_FONT_DICT: &str =
    "<</Type/Font/Subtype/Type1/BaseFont/Helvetica/Encoding/WinAnsiEncoding>>";

const MAX_FONT_SIZE: f32 = 11.0;
const MIN_FONT_SIZE: f32 = 4.0;
/// Average Helvetica advance as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.55;

/// Affine transform in PDF order `[a b c d e f]`.
pub type Affine = [f32; 6];

/// Inverts `m`, or returns `None` when it is singular.
pub fn invert(m: Affine) -> Option<Affine> {
    let [a, b, c, d, e, f] = m;
    let det = a * d - b * c;
    if det.abs() < f32::EPSILON {
        return None;
    }
    let ia = d / det;
    let ib = -b / det;
    let ic = -c / det;
    let id = a / det;
    Some([ia, ib, ic, id, -(e * ia + f * ic), -(e * ib + f * id)])
}

/// Encodes the overlay for `actions` as a content stream.
///
/// `page_to_user` maps page space onto the page's user space. The stream
/// saves and restores the graphics state around everything it draws.
pub fn overlay_content(
    actions: &[RedactionAction],
    page_to_user: Affine,
) -> RedactorResult<Vec<u8>> {
    let mut operations = vec![
        Operation::new("q", vec![]),
        Operation::new("cm", page_to_user.iter().map(|v| real(*v)).collect()),
    ];

    for action in actions {
        let region = action.region;
        let (width, height) = (region.x1 - region.x0, region.y1 - region.y0);

        operations.push(color_op(action.fill));
        operations.push(Operation::new(
            "re",
            vec![real(region.x0), real(region.y0), real(width), real(height)],
        ));
        operations.push(Operation::new("f", vec![]));

        if action.replacement.is_empty() {
            continue;
        }
        let text = win_ansi(&action.replacement);
        let size = font_size(width, height, text.len());
        let baseline = region.y0 + (height + size * 0.7) / 2.0;

        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![Object::from(OVERLAY_FONT), real(size)],
        ));
        operations.push(color_op(action.text_color));
        // Glyphs point up in page space, which is y-down.
        operations.push(Operation::new(
            "Tm",
            vec![
                real(1.0),
                real(0.0),
                real(0.0),
                real(-1.0),
                real(region.x0 + 1.0),
                real(baseline),
            ],
        ));
        operations.push(Operation::new("Tj", vec![Object::string_literal(text)]));
        operations.push(Operation::new("ET", vec![]));
    }

    operations.push(Operation::new("Q", vec![]));
    Ok(Content { operations }.encode()?)
}

fn real(value: f32) -> Object {
    Object::Real(value)
}

fn color_op(color: Rgb) -> Operation {
    Operation::new("rg", color.components().iter().map(|c| real(*c)).collect())
}

/// Largest size up to [`MAX_FONT_SIZE`] that fits the region.
fn font_size(width: f32, height: f32, chars: usize) -> f32 {
    let by_height = height * 0.8;
    let by_width = width / (AVG_GLYPH_WIDTH * chars.max(1) as f32);
    by_height.min(by_width).clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

/// Encodes `text` for a WinAnsi simple font; unmappable characters become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            code @ (0x20..=0x7e | 0xa0..=0xff) => code as u8,
            _ => b'?',
        })
        .collect()
}
