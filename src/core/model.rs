//! Run result model
//!
//! Every task ends in exactly one [`TaskOutcome`]. Reports are collected into a
//! [`RunSummary`] that the caller owns and renders.

use serde::Serialize;
use std::path::PathBuf;

use crate::core::config::FolderTask;

/// How a single folder task ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskOutcome {
    /// The source folder path passes through a blacklisted folder name
    SkippedBlacklisted,
    SourceNotFound,
    SourceNotDirectory,
    /// No matching files; the output file was created empty
    EmptyWritten,
    /// `files` candidates were attempted, `unreadable` of them got a placeholder
    Collated { files: usize, unreadable: usize },
    /// The output file could not be opened or written
    WriteFailed { message: String },
    UnexpectedFailure { message: String },
}

impl TaskOutcome {
    /// True when writing the output failed part-way or never started due to an error
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            TaskOutcome::WriteFailed { .. } | TaskOutcome::UnexpectedFailure { .. }
        )
    }

    /// True when nothing was written because the source was unusable
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            TaskOutcome::SkippedBlacklisted
                | TaskOutcome::SourceNotFound
                | TaskOutcome::SourceNotDirectory
        )
    }

    /// Human-readable description used in the end-of-run summary
    pub fn describe(&self) -> String {
        match self {
            TaskOutcome::SkippedBlacklisted => "Skipped (blacklisted folder).".to_string(),
            TaskOutcome::SourceNotFound => "Source folder not found.".to_string(),
            TaskOutcome::SourceNotDirectory => "Source path is not a directory.".to_string(),
            TaskOutcome::EmptyWritten => "Created empty (no relevant source files).".to_string(),
            TaskOutcome::Collated { files, unreadable } => {
                let mut line = format!(
                    "{} file(s) collated recursively (blacklisted folders excluded).",
                    files
                );
                if *unreadable > 0 {
                    line.push_str(&format!(" {} could not be read.", unreadable));
                }
                line
            }
            TaskOutcome::WriteFailed { .. } => "Failed (IOError writing output).".to_string(),
            TaskOutcome::UnexpectedFailure { .. } => "Failed (Unexpected error).".to_string(),
        }
    }
}

/// Statistics about a written output file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputStats {
    pub bytes: u64,
    pub estimated_tokens: usize,
    pub token_model: String,
    pub digest: String,
    pub digest_algorithm: String,
}

/// Outcome of one task plus where it read from and wrote to
#[derive(Debug, Clone, Serialize)]
pub struct TaskReport {
    #[serde(flatten)]
    pub task: FolderTask,
    pub source_path: PathBuf,
    pub output_path: PathBuf,
    pub outcome: TaskOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<OutputStats>,
}

impl TaskReport {
    pub fn new(
        task: FolderTask,
        source_path: PathBuf,
        output_path: PathBuf,
        outcome: TaskOutcome,
    ) -> Self {
        Self {
            task,
            source_path,
            output_path,
            outcome,
            stats: None,
        }
    }

    pub fn with_stats(mut self, stats: OutputStats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// `'src' -> 'out': <outcome>`
    pub fn summary_line(&self) -> String {
        format!(
            "'{}' -> '{}': {}",
            self.task.source_folder_name,
            self.task.output_file_name,
            self.outcome.describe()
        )
    }
}

/// Everything a run produced, in task order
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub base_dir: PathBuf,
    pub output_dir: PathBuf,
    pub dry_run: bool,
    pub generated_at: String,
    pub reports: Vec<TaskReport>,
}

impl RunSummary {
    pub fn new(base_dir: PathBuf, output_dir: PathBuf, dry_run: bool) -> Self {
        Self {
            base_dir,
            output_dir,
            dry_run,
            generated_at: chrono::Local::now().to_rfc3339(),
            reports: Vec::new(),
        }
    }

    pub fn push(&mut self, report: TaskReport) {
        self.reports.push(report);
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn failed(&self) -> usize {
        self.reports.iter().filter(|r| r.outcome.is_failure()).count()
    }

    pub fn skipped(&self) -> usize {
        self.reports.iter().filter(|r| r.outcome.is_skip()).count()
    }

    pub fn written(&self) -> usize {
        self.len() - self.failed() - self.skipped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(outcome: TaskOutcome) -> TaskReport {
        TaskReport::new(
            FolderTask::new("web", "web.txt"),
            PathBuf::from("/base/web"),
            PathBuf::from("/web.txt"),
            outcome,
        )
    }

    #[test]
    fn test_summary_line_collated() {
        let line = report(TaskOutcome::Collated {
            files: 3,
            unreadable: 0,
        })
        .summary_line();
        assert_eq!(
            line,
            "'web' -> 'web.txt': 3 file(s) collated recursively (blacklisted folders excluded)."
        );
    }

    #[test]
    fn test_summary_line_collated_with_unreadable() {
        let line = report(TaskOutcome::Collated {
            files: 3,
            unreadable: 1,
        })
        .summary_line();
        assert!(line.ends_with("1 could not be read."));
    }

    #[test]
    fn test_summary_line_not_found() {
        assert_eq!(
            report(TaskOutcome::SourceNotFound).summary_line(),
            "'web' -> 'web.txt': Source folder not found."
        );
    }

    #[test]
    fn test_outcome_classification() {
        assert!(TaskOutcome::SourceNotDirectory.is_skip());
        assert!(!TaskOutcome::SourceNotDirectory.is_failure());
        assert!(TaskOutcome::WriteFailed {
            message: "denied".into()
        }
        .is_failure());
        assert!(!TaskOutcome::EmptyWritten.is_skip());
        assert!(!TaskOutcome::EmptyWritten.is_failure());
    }

    #[test]
    fn test_run_summary_counts() {
        let mut summary = RunSummary::new(PathBuf::from("/base"), PathBuf::from("/"), false);
        assert!(summary.is_empty());

        summary.push(report(TaskOutcome::EmptyWritten));
        summary.push(report(TaskOutcome::SkippedBlacklisted));
        summary.push(report(TaskOutcome::UnexpectedFailure {
            message: "boom".into(),
        }));

        assert_eq!(summary.len(), 3);
        assert_eq!(summary.written(), 1);
        assert_eq!(summary.skipped(), 1);
        assert_eq!(summary.failed(), 1);
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_value(TaskOutcome::Collated {
            files: 2,
            unreadable: 1,
        })
        .unwrap();
        assert_eq!(json["status"], "collated");
        assert_eq!(json["files"], 2);
        assert_eq!(json["unreadable"], 1);

        let json = serde_json::to_value(TaskOutcome::SkippedBlacklisted).unwrap();
        assert_eq!(json["status"], "skipped_blacklisted");
    }

    #[test]
    fn test_report_serialization_flattens_task() {
        let json = serde_json::to_value(report(TaskOutcome::SourceNotFound)).unwrap();
        assert_eq!(json["source_folder_name"], "web");
        assert_eq!(json["output_file_name"], "web.txt");
        assert_eq!(json["outcome"]["status"], "source_not_found");
        assert!(json.get("stats").is_none());
    }
}
