//! Layout data types for strip generation
//!
//! These types represent the intermediate layout calculations between
//! reading the input page and rendering the output PDF.

use crate::types::Rotation;
use std::fmt;

/// A rectangular area in points (or raw input units for source geometry)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (bottom edge)
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
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

    /// Build a rectangle from two opposite corners (x0, y0) and (x1, y1).
    ///
    /// The corners are taken as given: an inverted pair yields a negative
    /// width or height, which the resolver rejects.
    pub fn from_corners(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge y coordinate
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Whether `other` lies inside this rectangle, allowing `tolerance` on each edge
    pub fn contains(&self, other: &Rect, tolerance: f32) -> bool {
        other.x >= self.x - tolerance
            && other.y >= self.y - tolerance
            && other.right() <= self.right() + tolerance
            && other.top() <= self.top() + tolerance
    }
}

/// The resolved geometry of one strip job.
///
/// All lengths are in points. The page is laid out with the content anchored
/// at the top-left corner; the trailing margin occupies the right edge and the
/// bottom edge (the end of the feed direction).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutPlan {
    /// Total output width (content + margin), identical for every job
    pub page_width: f32,
    /// Total output length along the feed direction (content + margin)
    pub page_length: f32,
    /// Printable content width
    pub content_width: f32,
    /// Scaled content length
    pub content_length: f32,
    /// Trailing margin, never scaled
    pub margin: f32,
    /// Uniform factor from raw input units to points
    pub scale: f32,
    /// Rotation declared by the source page
    pub declared_rotation: Rotation,
    /// Extra rotation that turns the visual page into portrait
    pub rotation_to_apply: Rotation,
    /// Crop box (or media box) in raw input units
    pub effective_bounds: Rect,
    /// Width and height of the page as displayed, in raw input units
    pub visual_width: f32,
    pub visual_height: f32,
}

impl LayoutPlan {
    /// Rotation from raw input coordinates to output coordinates
    pub fn total_rotation(&self) -> Rotation {
        self.declared_rotation.then(self.rotation_to_apply)
    }

    /// Where the scaled content lands on the output page
    pub fn content_rect(&self) -> Rect {
        Rect::new(
            0.0,
            self.page_length - self.content_length,
            self.content_width,
            self.content_length,
        )
    }

    /// Blank strip at the end of the feed direction
    pub fn trailing_margin_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.page_width, self.margin)
    }

    /// Page size rounded up to whole points, as printers expect custom sizes
    pub fn page_size_pt(&self) -> (u32, u32) {
        (
            self.page_width.ceil() as u32,
            self.page_length.ceil() as u32,
        )
    }
}

impl fmt::Display for LayoutPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1}×{:.1} {}° ⇒ {:.1}×{:.1}pt, rotate {}°, scale {:.1}%",
            self.visual_width,
            self.visual_height,
            self.declared_rotation.degrees(),
            self.page_width,
            self.page_length,
            self.rotation_to_apply.degrees(),
            self.scale * 100.0
        )
    }
}

/// Affine transform in PDF `cm` operand order.
///
/// Maps (x, y) to (a·x + c·y + e, b·x + d·y + f).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Matrix {
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Image of `rect` under this transform (axis-aligned for quarter turns)
    pub fn apply_rect(&self, rect: &Rect) -> Rect {
        let (x0, y0) = self.apply(rect.x, rect.y);
        let (x1, y1) = self.apply(rect.right(), rect.top());
        Rect::from_corners(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.a, self.b, self.c, self.d, self.e, self.f
        )
    }
}
