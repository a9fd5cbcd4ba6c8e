use crate::constants::{MM_PER_INCH, pt_to_mm};
use crate::layout::Rect;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StripError {
    #[error("Invalid page geometry: {0}")]
    Geometry(String),
    #[error("Unsupported rotation: {0}° (expected 0, 90, 180 or 270)")]
    UnsupportedRotation(i64),
    #[error("Crop box {width_mm:.2}×{height_mm:.2} mm is too small to print")]
    DegenerateCrop { width_mm: f32, height_mm: f32 },
    #[error("Cannot decode content: {0}")]
    ContentDecode(String),
    #[error("No printer matching '{0}' found")]
    PrinterNotFound(String),
    #[error("Print submission failed: {0}")]
    PrintSubmission(String),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, StripError>;

/// Clockwise page rotation in quarter turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl Rotation {
    pub fn degrees(self) -> i32 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 90,
            Rotation::Clockwise180 => 180,
            Rotation::Clockwise270 => 270,
        }
    }

    /// Parse a declared rotation angle. Only the four canonical values are accepted.
    pub fn from_degrees(degrees: i64) -> Result<Self> {
        match degrees {
            0 => Ok(Rotation::None),
            90 => Ok(Rotation::Clockwise90),
            180 => Ok(Rotation::Clockwise180),
            270 => Ok(Rotation::Clockwise270),
            other => Err(StripError::UnsupportedRotation(other)),
        }
    }

    /// Rotation obtained by applying `self` first, then `then`
    pub fn then(self, then: Rotation) -> Rotation {
        match (self.degrees() + then.degrees()) % 360 {
            0 => Rotation::None,
            90 => Rotation::Clockwise90,
            180 => Rotation::Clockwise180,
            _ => Rotation::Clockwise270,
        }
    }

    /// Whether this rotation exchanges width and height
    pub fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Clockwise90 | Rotation::Clockwise270)
    }
}

/// Unit of an input page's raw coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Unit {
    /// PDF user space (1/72 inch)
    Points,
    /// Raster pixels at the given density
    Pixels { dpi: f32 },
}

impl Unit {
    /// Millimeters covered by one raw unit
    pub fn mm_per_unit(self) -> f32 {
        match self {
            Unit::Points => pt_to_mm(1.0),
            Unit::Pixels { dpi } => MM_PER_INCH / dpi,
        }
    }

    pub fn to_mm(self, value: f32) -> f32 {
        value * self.mm_per_unit()
    }
}

/// Source page geometry, as read from the input file.
///
/// Coordinates are raw: the crop box is expressed in the same space as the
/// media box, before the declared rotation is applied.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputPage {
    /// Raw page bounds (PDF MediaBox, or 0,0,w,h for images)
    pub media_box: Rect,
    /// Unit of `media_box` and `crop_box`
    pub unit: Unit,
    /// Declared rotation angle exactly as found in the source
    pub rotation: i64,
    /// Optional visible region within `media_box`
    pub crop_box: Option<Rect>,
}

impl InputPage {
    /// A PDF page of the given size with no rotation and no crop
    pub fn points(width: f32, height: f32) -> Self {
        Self {
            media_box: Rect::new(0.0, 0.0, width, height),
            unit: Unit::Points,
            rotation: 0,
            crop_box: None,
        }
    }

    /// A raster image of the given pixel size
    pub fn pixels(width: u32, height: u32, dpi: f32) -> Self {
        Self {
            media_box: Rect::new(0.0, 0.0, width as f32, height as f32),
            unit: Unit::Pixels { dpi },
            rotation: 0,
            crop_box: None,
        }
    }

    pub fn with_rotation(mut self, degrees: i64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_crop(mut self, crop: Rect) -> Self {
        self.crop_box = Some(crop);
        self
    }

    /// Bounds that remain visible once the crop box is applied
    pub fn effective_bounds(&self) -> Rect {
        self.crop_box.unwrap_or(self.media_box)
    }
}

/// Kind of source file, chosen from its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Pdf,
    Raster,
}
