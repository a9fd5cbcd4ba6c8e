//! File I/O for strip jobs

use crate::constants::OUTPUT_SUFFIX;
use crate::render::{OutputDocument, RawContent};
use crate::source::{decode_source, source_kind};
use crate::types::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A decoded input file
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub kind: SourceKind,
    pub page: InputPage,
    pub content: RawContent,
}

/// Load and decode a PDF or image file
pub async fn load_source(path: impl AsRef<Path>, image_dpi: f32) -> Result<LoadedSource> {
    let path = path.as_ref().to_owned();
    let kind = source_kind(&path);
    let bytes = tokio::fs::read(&path).await?;
    let (page, content) =
        tokio::task::spawn_blocking(move || decode_source(kind, &bytes, image_dpi)).await??;
    Ok(LoadedSource {
        kind,
        page,
        content,
    })
}

/// Save the strip document.
///
/// The bytes go to a temporary file next to `path` which is renamed into
/// place only once fully written, so a failed save never leaves a partial PDF.
pub async fn save_pdf(doc: OutputDocument, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    tokio::task::spawn_blocking(move || {
        let bytes = doc.into_bytes()?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(&bytes)?;
        file.as_file().sync_all()?;
        file.persist(&path).map_err(|e| e.error)?;
        Ok::<_, StripError>(())
    })
    .await??;
    Ok(())
}

/// Path of the generated file: `<stem>_print.pdf` for PDFs and
/// `<stem>_<ext>_print.pdf` for images, next to the input.
pub fn output_path_for(input: &Path, kind: SourceKind) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let name = match (kind, input.extension()) {
        (SourceKind::Raster, Some(ext)) => {
            format!("{}_{}{}.pdf", stem, ext.to_string_lossy(), OUTPUT_SUFFIX)
        }
        _ => format!("{}{}.pdf", stem, OUTPUT_SUFFIX),
    };
    input.with_file_name(name)
}
