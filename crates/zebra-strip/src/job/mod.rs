//! Strip jobs - from an input file to a printed (or saved) strip
//!
//! This module orchestrates one job:
//! 1. Select the printer (unless printing is suppressed)
//! 2. Load and decode the source
//! 3. Resolve the layout and render the strip
//! 4. Save atomically, then submit and clean up

mod io;

pub use io::{LoadedSource, load_source, output_path_for, save_pdf};

use crate::layout::{LayoutPlan, resolve};
use crate::options::JobOptions;
use crate::printer::{PrintRequest, PrinterId, Spooler, select_printer};
use crate::render::render_with_options;
use crate::types::*;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// What happened to the generated file
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    /// The strip was written next to the input and kept
    Converted,
    /// The strip was submitted and the temporary output removed
    Printed { printer: PrinterId },
}

/// Result of a successful job
#[derive(Debug, Clone)]
pub struct JobReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub plan: LayoutPlan,
    pub outcome: JobOutcome,
}

/// Load a source and resolve its layout without rendering anything
pub async fn plan_job(input: impl AsRef<Path>, options: &JobOptions) -> Result<(InputPage, LayoutPlan)> {
    options.validate()?;
    let source = load_source(input, options.raster.image_dpi).await?;
    let plan = resolve(&source.page)?;
    Ok((source.page, plan))
}

/// Run a complete job.
///
/// Either the job succeeds and reports its outcome, or it fails without
/// leaving a generated file behind.
pub async fn run_job<S: Spooler>(
    input: impl AsRef<Path>,
    options: &JobOptions,
    spooler: &S,
) -> Result<JobReport> {
    let input = input.as_ref().to_owned();
    options.validate()?;

    let printer = if options.suppress_print {
        None
    } else {
        Some(select_printer(spooler, options.printer.as_deref()).await?)
    };

    let LoadedSource {
        kind,
        page,
        content,
    } = load_source(&input, options.raster.image_dpi).await?;
    let plan = resolve(&page)?;
    info!("{}: {}", input.display(), plan);

    let raster = options.raster.clone();
    let render_plan = plan.clone();
    let rendered = tokio::task::spawn_blocking(move || {
        render_with_options(&page, &content, &render_plan, &raster)
    })
    .await??;

    let output = output_path_for(&input, kind);
    save_pdf(rendered, &output).await?;

    let outcome = match printer {
        None => {
            info!("converted {} → {}", input.display(), output.display());
            JobOutcome::Converted
        }
        Some(printer) => {
            let request = PrintRequest {
                printer: printer.clone(),
                file: output.clone(),
                title: file_title(&input),
                page_size_pt: plan.page_size_pt(),
            };
            let submitted = spooler.submit(&request).await;
            if let Err(e) = tokio::fs::remove_file(&output).await {
                warn!("could not remove {}: {}", output.display(), e);
            }
            submitted?;
            JobOutcome::Printed { printer }
        }
    };

    Ok(JobReport {
        input,
        output,
        plan,
        outcome,
    })
}

fn file_title(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
