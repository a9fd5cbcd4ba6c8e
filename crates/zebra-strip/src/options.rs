use crate::constants::DEFAULT_IMAGE_DPI;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How raster sources are turned into image data for the strip
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RasterOptions {
    /// Density assumed for image pixels
    pub image_dpi: f32,
    /// Convert to a single gray channel (thermal printers print black only)
    pub grayscale: bool,
    /// Binarize at this luminance (0..1); `None` keeps gray levels
    pub threshold: Option<f32>,
    /// Downsample so the printed content has at most this many dots per inch
    pub target_dpi: Option<f32>,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            image_dpi: DEFAULT_IMAGE_DPI,
            grayscale: true,
            threshold: None,
            target_dpi: None,
        }
    }
}

/// Per-job configuration
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct JobOptions {
    /// Preferred printer name (case-insensitive substring)
    pub printer: Option<String>,
    /// Leave the generated file next to the input instead of printing it
    pub suppress_print: bool,
    /// Raster conversion settings
    pub raster: RasterOptions,
}

impl JobOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| StripError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| StripError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        let raster = &self.raster;

        if !(raster.image_dpi.is_finite() && raster.image_dpi > 0.0) {
            return Err(StripError::Config(format!(
                "Image DPI must be positive, got {}",
                raster.image_dpi
            )));
        }

        if let Some(threshold) = raster.threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(StripError::Config(format!(
                    "Threshold must be between 0 and 1, got {}",
                    threshold
                )));
            }
            if !raster.grayscale {
                return Err(StripError::Config(
                    "Threshold requires grayscale output".to_string(),
                ));
            }
        }

        if let Some(dpi) = raster.target_dpi {
            if !(dpi.is_finite() && dpi > 0.0) {
                return Err(StripError::Config(format!(
                    "Target DPI must be positive, got {}",
                    dpi
                )));
            }
        }

        if let Some(printer) = &self.printer {
            if printer.trim().is_empty() {
                return Err(StripError::Config("Printer name is empty".to_string()));
            }
        }

        Ok(())
    }
}
