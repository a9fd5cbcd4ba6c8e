//! Printer selection and print submission
//!
//! Selection is a pure lookup over the printers a `Spooler` reports. The CUPS
//! spooler shells out to `lpstat` and `lp`.

use crate::constants::DEFAULT_PRINTER_PATTERN;
use crate::types::{Result, StripError};
use log::{debug, info};
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use tokio::process::Command;

/// Identifier of a print destination
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrinterId(pub String);

impl fmt::Display for PrinterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Queue state as reported by the spooler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrinterState {
    Idle,
    Printing,
    Disabled,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterInfo {
    pub name: String,
    pub state: PrinterState,
}

/// A job handed to the spooler
#[derive(Debug, Clone, PartialEq)]
pub struct PrintRequest {
    pub printer: PrinterId,
    pub file: PathBuf,
    pub title: String,
    /// Custom media size in whole points (width, length)
    pub page_size_pt: (u32, u32),
}

/// Access to the system print queue
pub trait Spooler {
    /// List the configured printers
    fn printers(&self) -> impl Future<Output = Result<Vec<PrinterInfo>>> + Send;

    /// Submit a file for printing
    fn submit(&self, request: &PrintRequest) -> impl Future<Output = Result<()>> + Send;
}

/// Pick a printer whose name contains `preferred` (or "zebra"), ignoring case.
///
/// Disabled printers are skipped; idle printers win over busy ones, otherwise
/// the spooler's order is kept.
pub fn find_printer(printers: &[PrinterInfo], preferred: Option<&str>) -> Option<PrinterId> {
    let pattern = preferred.unwrap_or(DEFAULT_PRINTER_PATTERN).to_lowercase();

    let mut candidates = printers.iter().filter(|printer| {
        printer.state != PrinterState::Disabled && printer.name.to_lowercase().contains(&pattern)
    });
    let first = candidates.clone().next()?;

    let chosen = candidates
        .find(|printer| printer.state == PrinterState::Idle)
        .unwrap_or(first);
    Some(PrinterId(chosen.name.clone()))
}

/// Query `spooler` and select a printer, failing with `PrinterNotFound`.
pub async fn select_printer<S: Spooler>(spooler: &S, preferred: Option<&str>) -> Result<PrinterId> {
    let printers = spooler.printers().await?;
    debug!("available printers: {:?}", printers);

    find_printer(&printers, preferred).ok_or_else(|| {
        StripError::PrinterNotFound(preferred.unwrap_or(DEFAULT_PRINTER_PATTERN).to_string())
    })
}

// =============================================================================
// CUPS
// =============================================================================

/// Spooler backed by the CUPS command-line tools
#[derive(Debug, Clone, Default)]
pub struct CupsSpooler;

impl Spooler for CupsSpooler {
    async fn printers(&self) -> Result<Vec<PrinterInfo>> {
        let output = lpstat_command().output().await?;
        // lpstat exits non-zero when no destinations exist
        if !output.status.success() {
            debug!(
                "lpstat failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Ok(Vec::new());
        }
        Ok(parse_lpstat(&String::from_utf8_lossy(&output.stdout)))
    }

    async fn submit(&self, request: &PrintRequest) -> Result<()> {
        let (width, length) = request.page_size_pt;
        let output = Command::new("lp")
            .arg("-d")
            .arg(&request.printer.0)
            .arg("-t")
            .arg(&request.title)
            .arg("-o")
            .arg(format!("PageSize=Custom.{}x{}", width, length))
            .arg(&request.file)
            .output()
            .await?;

        if !output.status.success() {
            return Err(StripError::PrintSubmission(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        info!(
            "submitted {} to {}: {}",
            request.file.display(),
            request.printer,
            String::from_utf8_lossy(&output.stdout).trim()
        );
        Ok(())
    }
}

/// `lpstat -p` with untranslated status words, as `parse_lpstat` expects
fn lpstat_command() -> Command {
    let mut command = Command::new("lpstat");
    command.arg("-p").env("LC_ALL", "C");
    command
}

/// Parse `lpstat -p` output.
///
/// Only lines starting with `printer` describe a queue; indented lines carry
/// status reasons and are skipped.
pub fn parse_lpstat(output: &str) -> Vec<PrinterInfo> {
    output
        .lines()
        .filter_map(|line| {
            let mut words = line.split_whitespace();
            if words.next()? != "printer" {
                return None;
            }
            let name = words.next()?.to_string();
            let rest = words.collect::<Vec<_>>().join(" ");

            let state = if rest.starts_with("is idle") {
                PrinterState::Idle
            } else if rest.starts_with("now printing") {
                PrinterState::Printing
            } else if rest.starts_with("disabled") {
                PrinterState::Disabled
            } else {
                PrinterState::Unknown
            };
            Some(PrinterInfo { name, state })
        })
        .collect()
}
