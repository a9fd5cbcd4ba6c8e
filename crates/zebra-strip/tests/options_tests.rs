use zebra_strip::*;

#[test]
fn test_default_options_are_valid() {
    let options = JobOptions::default();
    assert!(options.validate().is_ok());
    assert!(!options.suppress_print);
    assert!(options.raster.grayscale);
    assert_eq!(options.raster.image_dpi, 72.0);
}

#[test]
fn test_validation_image_dpi() {
    let mut options = JobOptions::default();

    options.raster.image_dpi = 300.0;
    assert!(options.validate().is_ok());

    options.raster.image_dpi = 0.0;
    match options.validate() {
        Err(StripError::Config(msg)) => assert!(msg.contains("Image DPI")),
        _ => panic!("Expected Config error"),
    }

    options.raster.image_dpi = f32::INFINITY;
    assert!(options.validate().is_err());
}

#[test]
fn test_validation_threshold() {
    let mut options = JobOptions::default();

    // Valid: bounds are inclusive
    options.raster.threshold = Some(0.0);
    assert!(options.validate().is_ok());
    options.raster.threshold = Some(1.0);
    assert!(options.validate().is_ok());

    // Invalid: out of range
    options.raster.threshold = Some(1.5);
    assert!(options.validate().is_err());

    // Invalid: thresholding a color image
    options.raster.threshold = Some(0.5);
    options.raster.grayscale = false;
    assert!(matches!(options.validate(), Err(StripError::Config(_))));
}

#[test]
fn test_validation_target_dpi_and_printer() {
    let mut options = JobOptions::default();

    options.raster.target_dpi = Some(203.0);
    assert!(options.validate().is_ok());

    options.raster.target_dpi = Some(-1.0);
    assert!(options.validate().is_err());

    options.raster.target_dpi = None;
    options.printer = Some("   ".to_string());
    assert!(options.validate().is_err());
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_save_and_load_options() {
    use tempfile::NamedTempFile;

    let options = JobOptions {
        printer: Some("GK420".to_string()),
        suppress_print: true,
        raster: RasterOptions {
            image_dpi: 203.0,
            grayscale: true,
            threshold: Some(0.4),
            target_dpi: Some(203.0),
        },
    };

    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path();

    // Save
    options.save(path).await.unwrap();

    // Load
    let loaded = JobOptions::load(path).await.unwrap();
    assert_eq!(loaded, options);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_partial_config_uses_defaults() {
    use tempfile::NamedTempFile;

    let temp_file = NamedTempFile::new().unwrap();
    std::fs::write(temp_file.path(), br#"{ "raster": { "threshold": 0.6 } }"#).unwrap();

    let loaded = JobOptions::load(temp_file.path()).await.unwrap();
    assert_eq!(loaded.printer, None);
    assert_eq!(loaded.raster.threshold, Some(0.6));
    assert_eq!(loaded.raster.image_dpi, 72.0);
    assert!(loaded.raster.grayscale);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_malformed_config_is_config_error() {
    use tempfile::NamedTempFile;

    let temp_file = NamedTempFile::new().unwrap();
    std::fs::write(temp_file.path(), b"{ printer: ").unwrap();

    let result = JobOptions::load(temp_file.path()).await;
    assert!(matches!(result, Err(StripError::Config(_))));
}
