use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use zebra_strip::constants::{DEFAULT_MONOCHROME_THRESHOLD, PRINTER_ENV_VAR};
use zebra_strip::{CupsSpooler, JobOptions, JobOutcome, StripError};

#[derive(Parser)]
#[command(
    name = "magic-zebra-printer",
    about = "Print PDFs and images on a continuous label roll",
    version
)]
struct Cli {
    /// Input PDF or image file(s), processed one after another
    #[arg(required = true, num_args = 1..)]
    input: Vec<PathBuf>,

    /// Keep the generated _print.pdf instead of printing it
    #[arg(long, alias = "noprint")]
    no_print: bool,

    /// Printer name (case-insensitive substring); defaults to the first "zebra" printer
    #[arg(long, env = PRINTER_ENV_VAR)]
    printer: Option<String>,

    /// Load job options from a JSON file (command-line flags take precedence)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Density assumed for image pixels
    #[arg(long)]
    image_dpi: Option<f32>,

    /// Keep colors in images instead of converting to gray
    #[arg(long)]
    color: bool,

    /// Binarize images at this luminance (0..1); without a value uses 0.48
    #[arg(long, value_name = "LEVEL")]
    threshold: Option<Option<f32>>,

    /// Downsample images to at most this printer resolution
    #[arg(long)]
    target_dpi: Option<f32>,

    /// Show the resolved layout only, don't generate a PDF
    #[arg(long)]
    plan_only: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Exit status for a failed job; each error kind gets its own code
fn exit_code(err: &StripError) -> u8 {
    match err {
        StripError::Geometry(_) => 10,
        StripError::UnsupportedRotation(_) => 11,
        StripError::DegenerateCrop { .. } => 12,
        StripError::ContentDecode(_) => 13,
        StripError::PrinterNotFound(_) => 14,
        StripError::PrintSubmission(_) => 15,
        StripError::Config(_) => 2,
        _ => 1,
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

async fn build_options(cli: &Cli) -> Result<JobOptions> {
    let mut options = match &cli.config {
        Some(path) => JobOptions::load(path)
            .await
            .with_context(|| format!("loading options from {}", path.display()))?,
        None => JobOptions::default(),
    };

    if cli.printer.is_some() {
        options.printer = cli.printer.clone();
    }
    options.suppress_print |= cli.no_print;
    if let Some(dpi) = cli.image_dpi {
        options.raster.image_dpi = dpi;
    }
    if cli.color {
        options.raster.grayscale = false;
    }
    if let Some(level) = cli.threshold {
        options.raster.threshold = Some(level.unwrap_or(DEFAULT_MONOCHROME_THRESHOLD));
    }
    if cli.target_dpi.is_some() {
        options.raster.target_dpi = cli.target_dpi;
    }

    options.validate().context("invalid options")?;
    Ok(options)
}

async fn process(input: &Path, options: &JobOptions, plan_only: bool) -> zebra_strip::Result<()> {
    if plan_only {
        let (page, plan) = zebra_strip::plan_job(input, options).await?;
        println!("{}:", input.display());
        println!("  Source: {:?}", page);
        println!("  Layout: {}", plan);
        return Ok(());
    }

    let report = zebra_strip::run_job(input, options, &CupsSpooler).await?;
    match report.outcome {
        JobOutcome::Converted => {
            println!(
                "Converted {} → {}: {}",
                report.input.display(),
                report.output.display(),
                report.plan
            );
        }
        JobOutcome::Printed { printer } => {
            println!(
                "Printing {} on {}: {}",
                report.input.display(),
                printer,
                report.plan
            );
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = match build_options(&cli).await {
        Ok(options) => options,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(2);
        }
    };
    if let Some(printer) = &options.printer {
        info!("Preferred printer: {}", printer);
    }

    // Jobs are independent: report each failure and keep going
    let mut status = 0;
    for input in &cli.input {
        if let Err(e) = process(input, &options, cli.plan_only).await {
            error!("{}: {}", input.display(), e);
            if status == 0 {
                status = exit_code(&e);
            }
        }
    }

    ExitCode::from(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes = [
            exit_code(&StripError::Geometry(String::new())),
            exit_code(&StripError::UnsupportedRotation(45)),
            exit_code(&StripError::DegenerateCrop {
                width_mm: 0.1,
                height_mm: 0.1,
            }),
            exit_code(&StripError::ContentDecode(String::new())),
            exit_code(&StripError::PrinterNotFound(String::new())),
            exit_code(&StripError::PrintSubmission(String::new())),
        ];
        assert_eq!(codes, [10, 11, 12, 13, 14, 15]);
        assert_eq!(exit_code(&StripError::Config(String::new())), 2);
    }

    #[tokio::test]
    async fn test_threshold_flag() {
        let cli = Cli::try_parse_from(["magic-zebra-printer", "a.png", "--threshold"]).unwrap();
        let options = build_options(&cli).await.unwrap();
        assert_eq!(options.raster.threshold, Some(DEFAULT_MONOCHROME_THRESHOLD));

        let cli =
            Cli::try_parse_from(["magic-zebra-printer", "--threshold", "0.3", "a.png"]).unwrap();
        let options = build_options(&cli).await.unwrap();
        assert_eq!(options.raster.threshold, Some(0.3));
    }

    #[tokio::test]
    async fn test_invalid_flags_are_rejected() {
        let cli = Cli::try_parse_from(["magic-zebra-printer", "a.png", "--color", "--threshold"])
            .unwrap();
        assert!(build_options(&cli).await.is_err());
    }

    #[test]
    fn test_noprint_alias() {
        let cli = Cli::try_parse_from(["magic-zebra-printer", "--noprint", "a.pdf", "b.pdf"]).unwrap();
        assert!(cli.no_print);
        assert_eq!(cli.input.len(), 2);
    }
}
