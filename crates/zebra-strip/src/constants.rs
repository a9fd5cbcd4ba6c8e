//! Shared constants for strip layout
//!
//! Every length in this crate is computed in PDF points. Metric values are
//! converted through `POINTS_PER_MM` only, so width and length never drift
//! apart through different rounding paths.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4; // ≈ 2.83465

/// Millimeters per inch
pub const MM_PER_INCH: f32 = 25.4;

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Convert points to millimeters
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / POINTS_PER_MM
}

// =============================================================================
// Strip Geometry
// =============================================================================

/// Printable width across the roll (10 cm)
pub const CONTENT_WIDTH_MM: f32 = 100.0;

/// Blank margin at the trailing edges of the strip
pub const TRAILING_MARGIN_MM: f32 = 6.0;

/// Crop boxes with a side shorter than this are rejected
pub const MIN_CROP_EXTENT_MM: f32 = 1.0;

/// Tolerance used when comparing computed lengths in points
pub const GEOMETRY_EPSILON_PT: f32 = 0.01;

/// Content width in points
#[inline]
pub fn content_width_pt() -> f32 {
    mm_to_pt(CONTENT_WIDTH_MM)
}

/// Trailing margin in points
#[inline]
pub fn trailing_margin_pt() -> f32 {
    mm_to_pt(TRAILING_MARGIN_MM)
}

/// Total output width in points (content + margin)
#[inline]
pub fn strip_width_pt() -> f32 {
    content_width_pt() + trailing_margin_pt()
}

// =============================================================================
// Default Page Dimensions
// =============================================================================

/// Page size assumed when a PDF page has no MediaBox (US Letter: 8.5" × 11")
pub const DEFAULT_PAGE_DIMENSIONS: (f32, f32) = (612.0, 792.0);

// =============================================================================
// Raster Input
// =============================================================================

/// Resolution assumed for raster images that carry no explicit density
pub const DEFAULT_IMAGE_DPI: f32 = 72.0;

/// Luminance threshold (0..1) used when `--threshold` is given without a level
pub const DEFAULT_MONOCHROME_THRESHOLD: f32 = 0.48;

// =============================================================================
// Printer Selection
// =============================================================================

/// Environment variable carrying the preferred printer name
pub const PRINTER_ENV_VAR: &str = "MAGIC_ZEBRA_PRINTER";

/// Substring matched against printer names when none is configured
pub const DEFAULT_PRINTER_PATTERN: &str = "zebra";

/// Suffix appended to the input stem for the generated file
pub const OUTPUT_SUFFIX: &str = "_print";
