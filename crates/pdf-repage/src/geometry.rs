//! Page placement geometry
//!
//! Computes the content-stream transformation that draws a source page,
//! rotated clockwise by a quarter-turn multiple, centred inside a target
//! rectangle with its aspect ratio preserved.

use crate::types::Rotation;

/// A rectangular area in points, origin at the bottom-left
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (bottom edge)
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge y coordinate
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Size after applying a rotation
    pub fn rotated_size(&self, rotation: Rotation) -> (f32, f32) {
        if rotation.swaps_axes() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }
}

/// A PDF transformation matrix `[a b c d e f]`
pub type Matrix = [f32; 6];

/// Matrix mapping `source` (a page box) into `target`.
///
/// The page is rotated clockwise by `rotation`, scaled uniformly to the
/// largest size that fits, and centred on the free axis.
pub fn placement_matrix(source: Rect, rotation: Rotation, target: Rect) -> Matrix {
    let Rect {
        x: x0,
        y: y0,
        width: w,
        height: h,
    } = source;
    let (rotated_w, rotated_h) = source.rotated_size(rotation);

    let scale = if rotated_w > 0.0 && rotated_h > 0.0 {
        (target.width / rotated_w).min(target.height / rotated_h)
    } else {
        1.0
    };
    let ox = target.x + (target.width - scale * rotated_w) / 2.0;
    let oy = target.y + (target.height - scale * rotated_h) / 2.0;
    let s = scale;

    match rotation {
        Rotation::None => [s, 0.0, 0.0, s, ox - s * x0, oy - s * y0],
        Rotation::Clockwise90 => [0.0, -s, s, 0.0, ox - s * y0, oy + s * (w + x0)],
        Rotation::Clockwise180 => [-s, 0.0, 0.0, -s, ox + s * (w + x0), oy + s * (h + y0)],
        Rotation::Clockwise270 => [0.0, s, -s, 0.0, ox + s * (h + y0), oy - s * x0],
    }
}

/// Apply a matrix to a point
pub fn transform(matrix: &Matrix, x: f32, y: f32) -> (f32, f32) {
    let [a, b, c, d, e, f] = *matrix;
    (a * x + c * y + e, b * x + d * y + f)
}
