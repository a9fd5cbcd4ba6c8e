pub mod constants;
pub mod job;
pub mod layout;
mod options;
pub mod printer;
pub mod render;
pub mod source;
mod types;

pub use job::{JobOutcome, JobReport, load_source, plan_job, run_job, save_pdf};
pub use layout::{LayoutPlan, Matrix, Rect, placement_matrix, resolve};
pub use options::*;
pub use printer::{CupsSpooler, PrinterId, PrinterInfo, PrinterState, Spooler, find_printer};
pub use render::{OutputDocument, RawContent, render, render_with_options};
pub use types::*;
