//! PDF rendering for strip output
//!
//! This module handles all PDF-specific output work:
//! - Wrapping source pages and images in Form XObjects
//! - Building the single strip page
//! - Deep copying the source page resources

mod page;
mod raster;
mod xobject;

pub use page::*;
