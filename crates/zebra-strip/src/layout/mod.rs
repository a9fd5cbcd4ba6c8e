//! Layout calculation for strip output
//!
//! This module handles all the geometric calculations:
//! - Crop, declared rotation and portrait normalization (`resolve`)
//! - The placement transform from raw page space to the strip (`transform`)

mod resolve;
mod transform;
mod types;

pub use resolve::*;
pub use transform::*;
pub use types::*;
