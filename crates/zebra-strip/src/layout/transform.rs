//! Placement transform
//!
//! Builds the matrix that carries the effective bounds of the source page
//! (raw coordinates, y up) onto the content rectangle of the strip. The
//! rotation is the declared rotation followed by the normalization rotation,
//! both clockwise as seen on screen.

use crate::types::{InputPage, Rotation};

use super::{LayoutPlan, Matrix};

/// Compute the transform placing a page on the strip described by `plan`.
///
/// Only `plan` is read: it already carries the page's effective bounds, and
/// `render` rejects a plan resolved for other bounds. The crop origin is moved to (0, 0), the page is turned clockwise by the
/// total rotation and shifted back into the positive quadrant, then scaled and
/// moved to the top-left content anchor.
pub fn placement_matrix(_input: &InputPage, plan: &LayoutPlan) -> Matrix {
    let bounds = plan.effective_bounds;
    let (x0, y0) = (bounds.x, bounds.y);
    let (x1, y1) = (bounds.right(), bounds.top());
    let s = plan.scale;
    let anchor = plan.content_rect();
    let (ex, ey) = (anchor.x, anchor.y);

    match plan.total_rotation() {
        // (u, v) → (u, v)
        Rotation::None => Matrix {
            a: s,
            b: 0.0,
            c: 0.0,
            d: s,
            e: ex - s * x0,
            f: ey - s * y0,
        },
        // (u, v) → (v, w - u)
        Rotation::Clockwise90 => Matrix {
            a: 0.0,
            b: -s,
            c: s,
            d: 0.0,
            e: ex - s * y0,
            f: ey + s * x1,
        },
        // (u, v) → (w - u, h - v)
        Rotation::Clockwise180 => Matrix {
            a: -s,
            b: 0.0,
            c: 0.0,
            d: -s,
            e: ex + s * x1,
            f: ey + s * y1,
        },
        // (u, v) → (h - v, u)
        Rotation::Clockwise270 => Matrix {
            a: 0.0,
            b: s,
            c: -s,
            d: 0.0,
            e: ex + s * y1,
            f: ey - s * x0,
        },
    }
}
