//! # SVS Label Redactor
//!
//! Removes the slide label image from Aperio SVS files in place.
//!
//! Slide labels often carry patient names, accession numbers or barcodes.
//! This library finds the TIFF directory holding the label image, overwrites
//! its strips with zeros and can splice the directory out of the IFD chain
//! so it is no longer reachable.
//!
//! ## Features
//!
//! - **Classic TIFF and BigTIFF**: Both byte orders and both offset widths
//! - **In-place**: Only the label strips (and optionally one link slot) are written
//! - **Dry run**: Locate the label and report what would be wiped
//! - **Batch mode**: Process many slides, continuing past failures
//!
//! ## Architecture
//!
//! - [`io`] - Random-access stream capability and endian helpers
//! - [`mod@format`] - TIFF container parsing and Aperio SVS conventions
//! - [`redact`] - Label detection, strip wiping and directory unlinking
//! - [`batch`] - Per-file processing and batch reports
//! - [`config`] - CLI configuration
//!
//! ## Example
//!
//! ```rust,no_run
//! use svs_label_redactor::redact;
//!
//! let summary = redact("slide.svs", true)?;
//! println!("Wrote {} bytes", summary.bytes_wiped);
//! # Ok::<(), svs_label_redactor::RedactError>(())
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod format;
pub mod io;
pub mod redact;

// Re-export commonly used types
pub use batch::{
    process_file, run_batch, run_batch_with, BatchOptions, BatchReport, FileOutcome, FileReport,
};
pub use config::{Config, ReportFormat};
pub use error::{RedactError, TiffError};
pub use format::tiff::{
    read_directories, read_value, ByteOrder, DirectoryWalker, FieldType, Ifd, IfdEntry,
    TagValue, TiffHeader, TiffMode, TiffStream, TiffTag, MAX_IFD_ENTRIES,
};
pub use format::{is_label_description, split_lines};
pub use redact::{
    find_label, find_label_stream, redact, redact_stream, LabelLocation, RedactSummary, Strip,
};
