//! Format parsers for Whole Slide Image files.
//!
//! - [`tiff`]: the TIFF/BigTIFF container layer shared by all slide formats
//! - [`svs`]: Aperio SVS conventions, notably how the label image is identified

pub mod svs;
pub mod tiff;

pub use svs::{is_aperio_description, is_label_description, split_lines};
