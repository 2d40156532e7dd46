//! SVS Label Redactor - wipe slide labels from Aperio SVS files.
//!
//! This binary resolves the input slides, redacts each one and reports the
//! outcome per file. The exit status is non-zero if any file failed.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use svs_label_redactor::{
    batch::{run_batch_with, FileOutcome, FileReport},
    config::{Config, ReportFormat},
};

fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let paths = match config.resolve_paths() {
        Ok(paths) => paths,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if paths.is_empty() {
        error!("No .svs files found in the given inputs");
        return ExitCode::FAILURE;
    }

    info!(
        files = paths.len(),
        unlink = config.unlink,
        dry_run = config.dry_run,
        "starting redaction"
    );

    let report = run_batch_with(&paths, config.batch_options(), |file_report| {
        if config.format == ReportFormat::Text {
            print_text(file_report);
        }
    });

    if config.format == ReportFormat::Json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize report: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::from(report.exit_code())
}

/// Print one file's outcome in human-readable form.
fn print_text(report: &FileReport) {
    println!();
    println!("{}", report.path.display());

    match &report.outcome {
        FileOutcome::Redacted(summary) => {
            println!(
                "Wrote {} bytes ({} kb)",
                summary.bytes_wiped,
                summary.bytes_wiped / 1000
            );
            if summary.unlinked {
                println!("Removed label directory {}", summary.directory_index);
            }
        }
        FileOutcome::Located(label) => {
            println!(
                "Label in directory {}: {} strip(s), {} bytes would be wiped",
                label.directory_index,
                label.strips.len(),
                label.total_bytes()
            );
        }
        FileOutcome::Failed { error } => {
            println!("Could not strip label: {}", error);
        }
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "svs_label_redactor=debug"
    } else {
        "svs_label_redactor=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
