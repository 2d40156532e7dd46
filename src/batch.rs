//! Batch redaction over many slides.
//!
//! Each file is handled independently: its handle is opened and released
//! inside a single call, and a failure is recorded in the report before
//! moving on to the next file.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{error, info};

use crate::redact::{find_label, redact, LabelLocation, RedactSummary};

/// Options shared by every file of a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOptions {
    /// Splice the label directory out of the IFD chain
    pub unlink: bool,

    /// Locate labels without writing anything
    pub dry_run: bool,
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// The label was wiped
    Redacted(RedactSummary),

    /// Dry run: the label was found and would be wiped
    Located(LabelLocation),

    /// Redaction failed; the message describes why
    Failed { error: String },
}

/// Report entry for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,

    #[serde(flatten)]
    pub outcome: FileOutcome,
}

impl FileReport {
    pub fn is_success(&self) -> bool {
        !matches!(self.outcome, FileOutcome::Failed { .. })
    }
}

/// Report for a whole batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
}

impl BatchReport {
    /// Number of files that failed.
    pub fn failures(&self) -> usize {
        self.files.iter().filter(|f| !f.is_success()).count()
    }

    /// Total bytes wiped across the batch.
    pub fn bytes_wiped(&self) -> u64 {
        self.files
            .iter()
            .map(|f| match &f.outcome {
                FileOutcome::Redacted(summary) => summary.bytes_wiped,
                _ => 0,
            })
            .sum()
    }

    /// Process exit status: 0 if every file succeeded, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.failures() == 0 {
            0
        } else {
            1
        }
    }
}

/// Process a single file.
pub fn process_file(path: &Path, options: BatchOptions) -> FileReport {
    let outcome = if options.dry_run {
        find_label(path).map(FileOutcome::Located)
    } else {
        redact(path, options.unlink).map(FileOutcome::Redacted)
    };

    let outcome = outcome.unwrap_or_else(|e| {
        error!(path = %path.display(), "could not strip label: {}", e);
        FileOutcome::Failed {
            error: e.to_string(),
        }
    });

    FileReport {
        path: path.to_path_buf(),
        outcome,
    }
}

/// Process every file in order, continuing past failures.
pub fn run_batch<P: AsRef<Path>>(paths: &[P], options: BatchOptions) -> BatchReport {
    run_batch_with(paths, options, |_| {})
}

/// Like [`run_batch`], calling `on_file` with each report as soon as its
/// file is done.
pub fn run_batch_with<P, F>(paths: &[P], options: BatchOptions, mut on_file: F) -> BatchReport
where
    P: AsRef<Path>,
    F: FnMut(&FileReport),
{
    let files: Vec<FileReport> = paths
        .iter()
        .map(|path| {
            let report = process_file(path.as_ref(), options);
            on_file(&report);
            report
        })
        .collect();

    let report = BatchReport { files };
    info!(
        files = report.files.len(),
        failures = report.failures(),
        bytes_wiped = report.bytes_wiped(),
        "batch complete"
    );
    report
}
