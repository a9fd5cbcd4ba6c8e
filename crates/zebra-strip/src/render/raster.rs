//! Image XObjects for raster sources
//!
//! Thermal label printers only print black, so images are flattened onto
//! white, reduced to gray and optionally binarized before embedding.

use crate::layout::LayoutPlan;
use crate::options::RasterOptions;
use crate::types::Result;
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use log::debug;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::borrow::Cow;

/// Encode `image` as an Image XObject in `output`.
pub fn create_image_xobject(
    output: &mut Document,
    image: &DynamicImage,
    plan: &LayoutPlan,
    options: &RasterOptions,
) -> Result<ObjectId> {
    let image = downsample(image, plan, options.target_dpi);
    let rgb = flatten_alpha(&image);
    let (width, height) = rgb.dimensions();

    let (color_space, data) = if options.grayscale {
        let mut gray = DynamicImage::ImageRgb8(rgb).into_luma8();
        if let Some(threshold) = options.threshold {
            let cutoff = (threshold * 255.0).round() as u8;
            for pixel in gray.pixels_mut() {
                pixel.0[0] = if pixel.0[0] < cutoff { 0 } else { 255 };
            }
        }
        ("DeviceGray", gray.into_raw())
    } else {
        ("DeviceRGB", rgb.into_raw())
    };

    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(width as i64));
    dict.set("Height", Object::Integer(height as i64));
    dict.set("ColorSpace", Object::Name(color_space.as_bytes().to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));

    let mut stream = Stream::new(dict, data);
    stream.compress()?;

    Ok(output.add_object(stream))
}

/// Reduce the sample count so the printed image does not exceed `target_dpi`.
///
/// The drawn size is unaffected: the image XObject always fills the raw
/// pixel grid of the source. Images are never upsampled.
fn downsample<'a>(
    image: &'a DynamicImage,
    plan: &LayoutPlan,
    target_dpi: Option<f32>,
) -> Cow<'a, DynamicImage> {
    let Some(target_dpi) = target_dpi else {
        return Cow::Borrowed(image);
    };

    // plan.scale is points per source pixel
    let printed_dpi = 72.0 / plan.scale;
    if printed_dpi <= target_dpi {
        return Cow::Borrowed(image);
    }

    let factor = target_dpi / printed_dpi;
    let width = ((image.width() as f32 * factor).round() as u32).max(1);
    let height = ((image.height() as f32 * factor).round() as u32).max(1);
    debug!(
        "downsampling {}×{} → {}×{} ({:.0} → {:.0} dpi)",
        image.width(),
        image.height(),
        width,
        height,
        printed_dpi,
        target_dpi
    );

    Cow::Owned(image.resize_exact(width, height, FilterType::Lanczos3))
}

/// Composite any alpha channel onto a white background.
fn flatten_alpha(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let blend = |c: u8| -> u8 {
            let a = a as u32;
            ((c as u32 * a + 255 * (255 - a)) / 255) as u8
        };
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}
