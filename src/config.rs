//! Command-line configuration for the SVS label redactor.
//!
//! Slides can be given three ways, mirroring how de-identification batches
//! are usually assembled:
//!
//! - positional paths
//! - a folder (`--folder`), whose `.svs` files are all processed
//! - a manifest (`--manifest`), one path per line
//!
//! # Environment Variables
//!
//! - `SVS_REDACT_UNLINK` - Remove the label directory from the IFD chain (default: false)
//! - `SVS_REDACT_FORMAT` - Report format, `text` or `json` (default: text)

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

use crate::batch::BatchOptions;

/// Extension of the slide files that are processed.
pub const SLIDE_EXTENSION: &str = ".svs";

/// Report output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// One human-readable block per file
    #[default]
    Text,
    /// The whole batch report as JSON
    Json,
}

/// SVS label redactor - wipe the slide label image from Aperio SVS files.
///
/// The label strips are overwritten with zeros in place. Optionally the
/// label directory is also removed from the TIFF directory chain so that
/// viewers no longer list it.
#[derive(Parser, Debug, Clone)]
#[command(name = "svs-label-redactor")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Inputs
    // =========================================================================
    /// Slide files to process (only `.svs` files are kept).
    pub paths: Vec<PathBuf>,

    /// Folder containing `.svs` files.
    #[arg(short, long, conflicts_with = "manifest")]
    pub folder: Option<PathBuf>,

    /// File listing one `.svs` path per line.
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    // =========================================================================
    // Redaction
    // =========================================================================
    /// Also remove the label directory from the IFD chain.
    #[arg(long, alias = "remove-header", default_value_t = false, env = "SVS_REDACT_UNLINK")]
    pub unlink: bool,

    /// Locate the label and report what would be wiped, without writing.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    // =========================================================================
    // Output
    // =========================================================================
    /// Report format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text, env = "SVS_REDACT_FORMAT")]
    pub format: ReportFormat,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.folder.is_some() && self.manifest.is_some() {
            return Err("Please enter only a manifest or a folder, not both".to_string());
        }

        if self.paths.is_empty() && self.folder.is_none() && self.manifest.is_none() {
            return Err(
                "No input given. List .svs files, point to a folder with --folder, \
                 or give a manifest with --manifest"
                    .to_string(),
            );
        }

        if self.dry_run && self.unlink {
            return Err("--dry-run and --unlink cannot be combined".to_string());
        }

        Ok(())
    }

    /// Options for the batch runner.
    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            unlink: self.unlink,
            dry_run: self.dry_run,
        }
    }

    /// Collect every slide path named by the configuration.
    ///
    /// Positional paths come first, then folder or manifest entries.
    pub fn resolve_paths(&self) -> Result<Vec<PathBuf>, String> {
        let mut paths: Vec<PathBuf> = self
            .paths
            .iter()
            .filter(|p| is_slide_file(p))
            .cloned()
            .collect();

        if let Some(ref folder) = self.folder {
            paths.extend(list_folder(folder)?);
        } else if let Some(ref manifest) = self.manifest {
            paths.extend(read_manifest(manifest)?);
        }

        Ok(paths)
    }
}

/// Check if a path has the slide extension (case-insensitive).
pub fn is_slide_file(path: &Path) -> bool {
    path.to_string_lossy()
        .to_lowercase()
        .ends_with(SLIDE_EXTENSION)
}

/// List slide files directly inside `folder`, sorted by path.
pub fn list_folder(folder: &Path) -> Result<Vec<PathBuf>, String> {
    let entries = fs::read_dir(folder)
        .map_err(|e| format!("Cannot read folder {}: {}", folder.display(), e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| format!("Cannot read folder {}: {}", folder.display(), e))?;
        let path = entry.path();
        if path.is_file() && is_slide_file(&path) {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}

/// Read slide paths from a manifest, one per line.
///
/// Lines are trimmed; blank lines and lines without the slide extension
/// are ignored.
pub fn read_manifest(manifest: &Path) -> Result<Vec<PathBuf>, String> {
    let contents = fs::read_to_string(manifest)
        .map_err(|e| format!("Cannot read manifest {}: {}", manifest.display(), e))?;

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .filter(|p| is_slide_file(p))
        .collect())
}

// =============================================================================
// Tests
// =============================================================================
