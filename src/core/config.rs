//! Run configuration
//!
//! There is no configuration file. Defaults live here and the command line may
//! replace any of them.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::str::FromStr;

use crate::core::error::CollateError;
use crate::core::tokenizer::TokenModel;
use crate::core::util::HashAlgorithm;

/// Default source folder → output file mapping, in processing order
pub static DEFAULT_TASKS: Lazy<Vec<FolderTask>> = Lazy::new(|| {
    vec![
        FolderTask::new("todolist.client", "todolist.client.txt"),
        FolderTask::new("ToDoList.Server", "ToDoList.Server.txt"),
    ]
});

/// Default allowed extensions
pub static DEFAULT_EXTENSIONS: Lazy<Vec<String>> = Lazy::new(|| {
    [".cs", ".ts", ".js", ".json", ".css"]
        .iter()
        .map(|s| s.to_string())
        .collect()
});

/// Default blacklisted folder names
pub static DEFAULT_BLACKLIST: Lazy<Vec<String>> =
    Lazy::new(|| vec!["node_modules".to_string()]);

/// One unit of work: a folder under the base directory and the file it collates into
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderTask {
    pub source_folder_name: String,
    pub output_file_name: String,
}

impl FolderTask {
    pub fn new(source: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            source_folder_name: source.into(),
            output_file_name: output.into(),
        }
    }
}

impl FromStr for FolderTask {
    type Err = CollateError;

    /// Parse `SRC=OUT`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| CollateError::InvalidMapping {
            spec: s.to_string(),
            reason: reason.to_string(),
        };

        let (source, output) = s.split_once('=').ok_or_else(|| invalid("expected SRC=OUT"))?;
        let (source, output) = (source.trim(), output.trim());

        if source.is_empty() {
            return Err(invalid("source folder name is empty"));
        }
        if output.is_empty() {
            return Err(invalid("output file name is empty"));
        }
        Ok(FolderTask::new(source, output))
    }
}

/// Allowed file extensions, stored lowercase with a leading dot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionSet(BTreeSet<String>);

impl ExtensionSet {
    pub fn new<I, S>(exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(exts.into_iter().filter_map(|e| normalize_extension(e.as_ref())).collect())
    }

    /// Case-insensitive membership test for a bare extension (`ts`, `JSON`, ...)
    pub fn matches(&self, ext: &str) -> bool {
        if ext.is_empty() {
            return false;
        }
        self.0.contains(&format!(".{}", ext.to_lowercase()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn normalize_extension(ext: &str) -> Option<String> {
    let trimmed = ext.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!(".{}", trimmed.to_lowercase()))
    }
}

/// Statistics collected for every output file when enabled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsConfig {
    pub token_model: TokenModel,
    pub hash: HashAlgorithm,
}

/// Everything a collation run needs
#[derive(Debug, Clone)]
pub struct CollateConfig {
    /// Directory that holds the source folders
    pub base_dir: PathBuf,
    pub tasks: Vec<FolderTask>,
    pub extensions: ExtensionSet,
    /// Folder names excluded wherever they appear in a path (exact, case-sensitive)
    pub blacklist: BTreeSet<String>,
    /// Also honour .gitignore / .ignore files during the walk
    pub respect_ignore_files: bool,
    pub dry_run: bool,
    pub stats: Option<StatsConfig>,
}

impl CollateConfig {
    /// Config with the built-in mapping, extensions and blacklist
    pub fn with_defaults(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            tasks: DEFAULT_TASKS.clone(),
            extensions: ExtensionSet::new(DEFAULT_EXTENSIONS.iter()),
            blacklist: DEFAULT_BLACKLIST.iter().cloned().collect(),
            respect_ignore_files: false,
            dry_run: false,
            stats: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_task_parse() {
        let task: FolderTask = "web=web.txt".parse().unwrap();
        assert_eq!(task, FolderTask::new("web", "web.txt"));
    }

    #[test]
    fn test_folder_task_parse_trims() {
        let task: FolderTask = " api = api.txt ".parse().unwrap();
        assert_eq!(task.source_folder_name, "api");
        assert_eq!(task.output_file_name, "api.txt");
    }

    #[test]
    fn test_folder_task_parse_invalid() {
        assert!("no-separator".parse::<FolderTask>().is_err());
        assert!("=out.txt".parse::<FolderTask>().is_err());
        assert!("src=".parse::<FolderTask>().is_err());
    }

    #[test]
    fn test_extension_set_normalizes() {
        let set = ExtensionSet::new(["TS", ".Json", "  .css ", "", "."]);
        let exts: Vec<&str> = set.iter().collect();
        assert_eq!(exts, vec![".css", ".json", ".ts"]);
    }

    #[test]
    fn test_extension_set_matches_case_insensitive() {
        let set = ExtensionSet::new([".ts", ".json"]);
        assert!(set.matches("ts"));
        assert!(set.matches("TS"));
        assert!(set.matches("Json"));
        assert!(!set.matches("tsx"));
        assert!(!set.matches(""));
    }

    #[test]
    fn test_defaults() {
        let config = CollateConfig::with_defaults("/work/base");
        assert_eq!(config.tasks.len(), 2);
        assert_eq!(config.tasks[0].source_folder_name, "todolist.client");
        assert!(config.extensions.matches("cs"));
        assert!(config.blacklist.contains("node_modules"));
        assert!(!config.dry_run);
        assert!(config.stats.is_none());
    }
}
