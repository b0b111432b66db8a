//! Collation flow - Bundle source folders into per-folder text files
//!
//! For every configured task the source folder under the base directory is
//! scanned and every candidate is appended to one output file in the parent of
//! the base directory:
//!
//! ```text
//! //<path relative to the source folder>
//! <verbatim content>
//! <blank line>
//! ```
//!
//! Failures are contained: an unreadable file becomes a placeholder line, and a
//! failing task is recorded in the summary while the next task still runs.

use log::{debug, error, info, warn};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::backends::scan::{collect_candidates, ScanPolicy};
use crate::core::config::{CollateConfig, FolderTask, StatsConfig};
use crate::core::error::CollateError;
use crate::core::file_reader::read_text;
use crate::core::model::{OutputStats, RunSummary, TaskOutcome, TaskReport};
use crate::core::paths::{is_path_allowed, make_relative, normalize_path, output_parent};
use crate::core::tokenizer::count_tokens;
use crate::core::util::hash_bytes;

/// Placeholder written instead of content when a file cannot be read
pub const READ_ERROR_PREFIX: &str = "// Error: Could not read content of file: ";

/// Run every configured task in order and return their reports
///
/// Fails only when the base directory cannot be resolved or is a filesystem
/// root; in that case no task is processed.
pub fn run_collation(config: &CollateConfig) -> Result<RunSummary, CollateError> {
    let base_dir = config
        .base_dir
        .canonicalize()
        .map_err(|source| CollateError::BaseDirectory {
            path: config.base_dir.clone(),
            source,
        })?;

    log_banner(config, &base_dir);

    let output_dir = output_parent(&base_dir)
        .ok_or_else(|| CollateError::RootDirectory {
            path: base_dir.clone(),
        })?
        .to_path_buf();
    info!("Output files will be created in: {}", output_dir.display());

    let policy = ScanPolicy::from_config(config);
    let mut summary = RunSummary::new(base_dir.clone(), output_dir.clone(), config.dry_run);

    for task in &config.tasks {
        let report = process_task(task, &base_dir, &output_dir, &policy, config);
        summary.push(report);
    }

    Ok(summary)
}

fn log_banner(config: &CollateConfig, base_dir: &Path) {
    let sources: Vec<&str> = config
        .tasks
        .iter()
        .map(|t| t.source_folder_name.as_str())
        .collect();
    let blacklist: Vec<&str> = config.blacklist.iter().map(String::as_str).collect();

    info!("Base directory: {}", base_dir.display());
    info!(
        "Target source folders (relative to base dir): {}",
        sources.join(", ")
    );
    info!(
        "Target file extensions: {}",
        config.extensions.iter().collect::<Vec<_>>().join(", ")
    );
    info!("Blacklisted folders: {}", blacklist.join(", "));
    if config.dry_run {
        info!("Dry run: output files will not be written");
    }
}

fn process_task(
    task: &FolderTask,
    base_dir: &Path,
    output_dir: &Path,
    policy: &ScanPolicy<'_>,
    config: &CollateConfig,
) -> TaskReport {
    let source = base_dir.join(&task.source_folder_name);
    let output = output_dir.join(&task.output_file_name);

    info!("");
    info!(
        "Processing source folder: '{}' for output file: '{}'",
        task.source_folder_name,
        output.display()
    );

    let outcome = collate_task(task, &source, &output, policy, config.dry_run);

    let mut report = TaskReport::new(task.clone(), source, output, outcome);
    if let Some(stats_config) = config.stats.filter(|_| !config.dry_run) {
        if matches!(
            report.outcome,
            TaskOutcome::EmptyWritten | TaskOutcome::Collated { .. }
        ) {
            match compute_stats(&report.output_path, stats_config) {
                Ok(stats) => report = report.with_stats(stats),
                Err(e) => warn!(
                    "Could not compute statistics for '{}': {}",
                    report.output_path.display(),
                    e
                ),
            }
        }
    }
    report
}

fn collate_task(
    task: &FolderTask,
    source: &Path,
    output: &Path,
    policy: &ScanPolicy<'_>,
    dry_run: bool,
) -> TaskOutcome {
    if !is_path_allowed(source, policy.blacklist) {
        info!(
            " Info: Source folder '{}' is blacklisted. Skipping.",
            source.display()
        );
        return TaskOutcome::SkippedBlacklisted;
    }

    if !source.exists() {
        info!(
            " Info: Source folder '{}' does not exist. Output file '{}' will not be created/modified.",
            source.display(),
            output.display()
        );
        return TaskOutcome::SourceNotFound;
    }

    if !source.is_dir() {
        info!(
            " Info: Source '{}' is not a directory. Output file '{}' will not be created/modified.",
            source.display(),
            output.display()
        );
        return TaskOutcome::SourceNotDirectory;
    }

    let candidates = match collect_candidates(source, policy) {
        Ok(c) => c,
        Err(e) => return failure_outcome(task, e),
    };

    if dry_run {
        return preview(source, output, &candidates);
    }

    match write_collation(source, output, &candidates) {
        Ok(outcome) => {
            info!(
                " ✅ Successfully processed '{}' recursively. Output is at '{}'",
                task.source_folder_name,
                output.display()
            );
            outcome
        }
        Err(e) => failure_outcome(task, e),
    }
}

/// Log a task-level error and turn it into the task's outcome
fn failure_outcome(task: &FolderTask, err: CollateError) -> TaskOutcome {
    match err {
        CollateError::OutputWrite { .. } => {
            error!(" ❌ Error: {}. Check permissions or path.", err);
            TaskOutcome::WriteFailed {
                message: err.to_string(),
            }
        }
        _ => {
            error!(
                " ❌ An unexpected error occurred while processing '{}': {}",
                task.source_folder_name, err
            );
            TaskOutcome::UnexpectedFailure {
                message: err.to_string(),
            }
        }
    }
}

/// Report what a real run would write without touching the output file
fn preview(source: &Path, output: &Path, candidates: &[PathBuf]) -> TaskOutcome {
    if candidates.is_empty() {
        info!(
            " Would create empty output file '{}' (no relevant source files).",
            output.display()
        );
        return TaskOutcome::EmptyWritten;
    }

    info!(
        " Would write {} file(s) to '{}':",
        candidates.len(),
        output.display()
    );
    for path in candidates {
        info!(" Would add file: {}", relative_header(path, source));
    }
    TaskOutcome::Collated {
        files: candidates.len(),
        unreadable: 0,
    }
}

/// Create (or truncate) `output` and collate `candidates` into it
pub fn write_collation(
    source: &Path,
    output: &Path,
    candidates: &[PathBuf],
) -> Result<TaskOutcome, CollateError> {
    let file = File::create(output).map_err(|e| CollateError::output_write(output, e))?;
    let mut writer = BufWriter::new(file);

    if candidates.is_empty() {
        info!(
            " Info: No files with specified extensions found in '{}' or its subdirectories (excluding blacklisted folders).",
            source.display()
        );
        writer
            .flush()
            .map_err(|e| CollateError::output_write(output, e))?;
        info!(
            " Output file '{}' has been created and is empty.",
            output.display()
        );
        return Ok(TaskOutcome::EmptyWritten);
    }

    info!(
        " Found {} relevant file(s) recursively (excluding blacklisted folders). Writing to '{}'.",
        candidates.len(),
        output.display()
    );

    let unreadable = collate_into(&mut writer, source, candidates)
        .map_err(|e| CollateError::output_write(output, e))?;
    writer
        .flush()
        .map_err(|e| CollateError::output_write(output, e))?;

    Ok(TaskOutcome::Collated {
        files: candidates.len(),
        unreadable,
    })
}

/// Write one entry per candidate to `writer`, returning how many could not be read
///
/// Only errors from `writer` are returned; read failures become placeholders.
pub fn collate_into<W: Write>(
    writer: &mut W,
    source: &Path,
    candidates: &[PathBuf],
) -> io::Result<usize> {
    let mut unreadable = 0;

    for path in candidates {
        let relative = relative_header(path, source);
        info!(" Adding file: {}", relative);
        writeln!(writer, "//{}", relative)?;

        match read_text(path) {
            Ok(content) => {
                writer.write_all(content.as_bytes())?;
                if !content.is_empty() && !content.ends_with('\n') {
                    writer.write_all(b"\n")?;
                }
                writer.write_all(b"\n")?;
            }
            Err(failure) => {
                unreadable += 1;
                warn!(" Error reading file: {}", failure.into_error(path));
                write!(writer, "{}{}\n\n", READ_ERROR_PREFIX, relative)?;
            }
        }
    }

    debug!(
        "Collated {} file(s) from {} ({} unreadable)",
        candidates.len(),
        source.display(),
        unreadable
    );
    Ok(unreadable)
}

fn relative_header(path: &Path, source: &Path) -> String {
    make_relative(path, source).unwrap_or_else(|| normalize_path(path))
}

fn compute_stats(output: &Path, config: StatsConfig) -> io::Result<OutputStats> {
    let bytes = fs::read(output)?;
    let text = String::from_utf8_lossy(&bytes);

    Ok(OutputStats {
        bytes: bytes.len() as u64,
        estimated_tokens: count_tokens(&text, config.token_model),
        token_model: config.token_model.to_string(),
        digest: hash_bytes(&bytes, config.hash),
        digest_algorithm: config.hash.to_string(),
    })
}
