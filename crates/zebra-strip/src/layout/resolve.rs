//! Geometry resolution
//!
//! Turns an input page into a `LayoutPlan`. The steps are applied in a fixed
//! order, each one on the result of the previous:
//! 1. Crop box → effective bounds (raw, unrotated coordinates)
//! 2. Declared rotation → visual width/height
//! 3. Portrait normalization → rotation to apply
//! 4. Scale from the content width, length from the orthogonal axis

use crate::constants::{
    GEOMETRY_EPSILON_PT, MIN_CROP_EXTENT_MM, content_width_pt, strip_width_pt, trailing_margin_pt,
};
use crate::types::{InputPage, Result, Rotation, StripError, Unit};
use log::debug;

use super::{LayoutPlan, Rect};

/// Resolve the output geometry for a single input page.
///
/// This is a pure function: the same page always yields an equal plan.
///
/// # Errors
/// * `Geometry` - raw or cropped bounds are empty, negative or not finite,
///   or the crop box leaves the media box
/// * `UnsupportedRotation` - declared rotation is not 0, 90, 180 or 270
/// * `DegenerateCrop` - the crop box is narrower than 1 mm on either side
pub fn resolve(input: &InputPage) -> Result<LayoutPlan> {
    validate_bounds("media box", &input.media_box)?;
    let declared_rotation = Rotation::from_degrees(input.rotation)?;
    let effective_bounds = effective_bounds(input)?;

    let (visual_width, visual_height) = visual_size(&effective_bounds, declared_rotation);
    let rotation_to_apply = normalize_orientation(visual_width, visual_height);

    // Dimensions of the page once it runs portrait along the feed
    let (across, along) = if rotation_to_apply.swaps_axes() {
        (visual_height, visual_width)
    } else {
        (visual_width, visual_height)
    };

    let content_width = content_width_pt();
    let margin = trailing_margin_pt();
    let scale = content_width / across;
    let content_length = along * scale;

    debug!(
        "resolved {}×{} (declared {}°) → rotate {}°, scale {:.4}",
        visual_width,
        visual_height,
        declared_rotation.degrees(),
        rotation_to_apply.degrees(),
        scale
    );

    Ok(LayoutPlan {
        page_width: strip_width_pt(),
        page_length: content_length + margin,
        content_width,
        content_length,
        margin,
        scale,
        declared_rotation,
        rotation_to_apply,
        effective_bounds,
        visual_width,
        visual_height,
    })
}

/// Width and height of `bounds` as displayed after the declared rotation
pub fn visual_size(bounds: &Rect, declared: Rotation) -> (f32, f32) {
    if declared.swaps_axes() {
        (bounds.height, bounds.width)
    } else {
        (bounds.width, bounds.height)
    }
}

/// Rotation needed to make a page of the given visual size portrait.
///
/// Square pages count as portrait.
pub fn normalize_orientation(visual_width: f32, visual_height: f32) -> Rotation {
    if visual_width > visual_height {
        Rotation::Clockwise90
    } else {
        Rotation::None
    }
}

/// Apply the crop box, validating it against the media box.
fn effective_bounds(input: &InputPage) -> Result<Rect> {
    let Some(crop) = input.crop_box else {
        return Ok(input.media_box);
    };

    validate_bounds("crop box", &crop)?;

    let tolerance = GEOMETRY_EPSILON_PT * raw_units_per_point(input.unit);
    if !input.media_box.contains(&crop, tolerance) {
        return Err(StripError::Geometry(format!(
            "crop box {:?} lies outside media box {:?}",
            crop, input.media_box
        )));
    }

    let width_mm = input.unit.to_mm(crop.width);
    let height_mm = input.unit.to_mm(crop.height);
    if width_mm < MIN_CROP_EXTENT_MM || height_mm < MIN_CROP_EXTENT_MM {
        return Err(StripError::DegenerateCrop {
            width_mm,
            height_mm,
        });
    }

    Ok(crop)
}

fn raw_units_per_point(unit: Unit) -> f32 {
    match unit {
        Unit::Points => 1.0,
        Unit::Pixels { dpi } => dpi / 72.0,
    }
}

fn validate_bounds(what: &str, rect: &Rect) -> Result<()> {
    let finite = [rect.x, rect.y, rect.width, rect.height]
        .iter()
        .all(|v| v.is_finite());
    if !finite || rect.width <= 0.0 || rect.height <= 0.0 {
        return Err(StripError::Geometry(format!(
            "{} must have positive width and height, got {}×{}",
            what, rect.width, rect.height
        )));
    }
    Ok(())
}
