//! Source decoding
//!
//! Turns the bytes of a PDF or raster file into an `InputPage` (geometry
//! only) and the `RawContent` the renderer reproduces.

use crate::constants::DEFAULT_PAGE_DIMENSIONS;
use crate::layout::Rect;
use crate::render::RawContent;
use crate::types::*;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader};
use log::{debug, warn};
use lopdf::{Document, Object, ObjectId};
use std::io::Cursor;
use std::path::Path;

/// Page tree nesting beyond this is treated as a reference cycle
const MAX_PAGE_TREE_DEPTH: usize = 64;

/// Choose the decoder from the file extension
pub fn source_kind(path: &Path) -> SourceKind {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => SourceKind::Pdf,
        _ => SourceKind::Raster,
    }
}

/// Decode a source file from memory.
pub fn decode_source(kind: SourceKind, bytes: &[u8], image_dpi: f32) -> Result<(InputPage, RawContent)> {
    match kind {
        SourceKind::Pdf => {
            let document = Document::load_mem(bytes)
                .map_err(|e| StripError::ContentDecode(format!("not a readable PDF: {}", e)))?;
            let (page, page_id) = page_from_pdf(&document)?;
            Ok((page, RawContent::Pdf { document, page_id }))
        }
        SourceKind::Raster => {
            let (page, image) = page_from_image(bytes, image_dpi)?;
            Ok((page, RawContent::Raster(image)))
        }
    }
}

// =============================================================================
// PDF
// =============================================================================

/// Read the geometry of the first page of `doc`.
pub fn page_from_pdf(doc: &Document) -> Result<(InputPage, ObjectId)> {
    let pages = doc.get_pages();
    let Some(&page_id) = pages.values().next() else {
        return Err(StripError::ContentDecode("PDF has no pages".to_string()));
    };
    if pages.len() > 1 {
        warn!("PDF has {} pages, only the first is used", pages.len());
    }

    let media_box = match page_attribute(doc, page_id, b"MediaBox")? {
        Some(obj) => read_rect(doc, obj)?,
        None => {
            warn!("page has no MediaBox, assuming US Letter");
            Rect::new(0.0, 0.0, DEFAULT_PAGE_DIMENSIONS.0, DEFAULT_PAGE_DIMENSIONS.1)
        }
    };

    // Viewers clip the crop box to the media box
    let crop_box = match page_attribute(doc, page_id, b"CropBox")? {
        Some(obj) => Some(intersect(&read_rect(doc, obj)?, &media_box)),
        None => None,
    };

    let rotation = match page_attribute(doc, page_id, b"Rotate")? {
        Some(obj) => normalize_declared_rotation(extract_integer(obj).ok_or_else(|| {
            StripError::ContentDecode(format!("Rotate is not a number: {:?}", obj))
        })?),
        None => 0,
    };

    debug!(
        "page {:?}: media {:?}, crop {:?}, rotate {}",
        page_id, media_box, crop_box, rotation
    );

    Ok((
        InputPage {
            media_box,
            unit: Unit::Points,
            rotation,
            crop_box,
        },
        page_id,
    ))
}

/// Look up a page attribute, following the inheritance chain through `Parent`.
///
/// References are resolved, so the returned object is never a `Reference`.
pub(crate) fn page_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>> {
    let mut node = doc.get_dictionary(page_id)?;

    for _ in 0..MAX_PAGE_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Ok(Some(resolve_reference(doc, value)?));
        }
        match node.get(b"Parent") {
            Ok(Object::Reference(parent_id)) => node = doc.get_dictionary(*parent_id)?,
            _ => return Ok(None),
        }
    }

    Ok(None)
}

fn resolve_reference<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object> {
    match obj {
        Object::Reference(id) => Ok(doc.get_object(*id)?),
        other => Ok(other),
    }
}

/// PDF allows any multiple of 90, including negative angles.
///
/// Multiples of 90 are folded into 0..360; anything else is passed through
/// unchanged so the resolver can reject it.
fn normalize_declared_rotation(degrees: i64) -> i64 {
    if degrees % 90 == 0 {
        degrees.rem_euclid(360)
    } else {
        degrees
    }
}

/// Read a PDF rectangle, normalizing the corner order.
fn read_rect(doc: &Document, obj: &Object) -> Result<Rect> {
    let values = obj
        .as_array()
        .map_err(|_| StripError::ContentDecode(format!("expected a rectangle, got {:?}", obj)))?;

    let numbers: Vec<f32> = values
        .iter()
        .map(|value| resolve_reference(doc, value).map(extract_number))
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .flatten()
        .collect();

    let &[x0, y0, x1, y1] = numbers.as_slice() else {
        return Err(StripError::ContentDecode(format!(
            "rectangle must have four numbers, got {:?}",
            values
        )));
    };

    Ok(Rect::from_corners(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)))
}

/// Overlap of two rectangles. Disjoint inputs give a non-positive extent.
fn intersect(a: &Rect, b: &Rect) -> Rect {
    Rect::from_corners(
        a.x.max(b.x),
        a.y.max(b.y),
        a.right().min(b.right()),
        a.top().min(b.top()),
    )
}

/// Extract numeric value from a PDF object
fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

fn extract_integer(obj: &Object) -> Option<i64> {
    match obj {
        Object::Integer(i) => Some(*i),
        Object::Real(r) if r.fract() == 0.0 => Some(*r as i64),
        _ => None,
    }
}

// =============================================================================
// Raster Images
// =============================================================================

/// Decode an image, turning its EXIF orientation into a declared rotation.
///
/// Pure rotations are kept as metadata so they go through the same rotation
/// path as PDF pages; mirrored orientations are applied to the pixels.
pub fn page_from_image(bytes: &[u8], dpi: f32) -> Result<(InputPage, DynamicImage)> {
    let decode_err = |e: image::ImageError| StripError::ContentDecode(format!("image: {}", e));

    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_decoder()
        .map_err(decode_err)?;
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
    let mut image = DynamicImage::from_decoder(decoder).map_err(decode_err)?;

    let rotation = match orientation {
        Orientation::NoTransforms => 0,
        Orientation::Rotate90 => 90,
        Orientation::Rotate180 => 180,
        Orientation::Rotate270 => 270,
        mirrored => {
            image.apply_orientation(mirrored);
            0
        }
    };

    debug!(
        "image {}×{} px, orientation {:?}",
        image.width(),
        image.height(),
        orientation
    );

    let page = InputPage::pixels(image.width(), image.height(), dpi).with_rotation(rotation);
    Ok((page, image))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_declared_rotation() {
        assert_eq!(normalize_declared_rotation(-90), 270);
        assert_eq!(normalize_declared_rotation(450), 90);
        assert_eq!(normalize_declared_rotation(360), 0);
        assert_eq!(normalize_declared_rotation(45), 45);
    }

    #[test]
    fn test_intersect_clips_to_media() {
        let crop = Rect::from_corners(-10.0, 20.0, 700.0, 500.0);
        let media = Rect::new(0.0, 0.0, 612.0, 792.0);
        assert_eq!(intersect(&crop, &media), Rect::from_corners(0.0, 20.0, 612.0, 500.0));
    }

    /// A 40×20 JPEG carrying an EXIF orientation tag
    fn jpeg_with_orientation(orientation: u16) -> Vec<u8> {
        let mut jpeg = Vec::new();
        DynamicImage::new_rgb8(40, 20)
            .write_to(&mut Cursor::new(&mut jpeg), image::ImageFormat::Jpeg)
            .unwrap();

        // Big-endian TIFF header, one IFD entry: 0x0112 SHORT × 1
        let mut exif = b"Exif\0\0MM\0\x2a\0\0\0\x08\0\x01\x01\x12\0\x03\0\0\0\x01".to_vec();
        exif.extend_from_slice(&orientation.to_be_bytes());
        exif.extend_from_slice(&[0, 0, 0, 0, 0, 0]);

        let mut app1 = vec![0xff, 0xe1];
        app1.extend_from_slice(&(exif.len() as u16 + 2).to_be_bytes());
        app1.extend_from_slice(&exif);

        // Right after the SOI marker
        jpeg.splice(2..2, app1);
        jpeg
    }

    #[test]
    fn test_exif_rotation_becomes_declared_rotation() {
        for (orientation, rotation) in [(1, 0), (6, 90), (3, 180), (8, 270)] {
            let (page, image) = page_from_image(&jpeg_with_orientation(orientation), 72.0).unwrap();
            assert_eq!(page.rotation, rotation, "EXIF orientation {}", orientation);
            assert_eq!((image.width(), image.height()), (40, 20));
            assert_eq!(page.media_box, Rect::new(0.0, 0.0, 40.0, 20.0));
        }
    }

    #[test]
    fn test_mirrored_exif_orientation_is_applied_to_pixels() {
        // 5: transpose, swaps the axes
        let (page, image) = page_from_image(&jpeg_with_orientation(5), 72.0).unwrap();
        assert_eq!(page.rotation, 0);
        assert_eq!((image.width(), image.height()), (20, 40));
        assert_eq!(page.media_box, Rect::new(0.0, 0.0, 20.0, 40.0));

        // 2: horizontal flip, keeps the axes
        let (page, image) = page_from_image(&jpeg_with_orientation(2), 72.0).unwrap();
        assert_eq!(page.rotation, 0);
        assert_eq!((image.width(), image.height()), (40, 20));
    }

    #[test]
    fn test_source_kind_from_extension() {
        assert_eq!(source_kind(Path::new("label.PDF")), SourceKind::Pdf);
        assert_eq!(source_kind(Path::new("label.png")), SourceKind::Raster);
        assert_eq!(source_kind(Path::new("label")), SourceKind::Raster);
    }
}
