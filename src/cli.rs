//! CLI module - Command-line interface definition and handler

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::core::config::{CollateConfig, ExtensionSet, FolderTask, StatsConfig};
use crate::core::render::{OutputFormat, RenderConfig, Renderer};
use crate::logging::{init_logger, LogLevel};

/// collate - bundle source folders into per-folder text files with path headers.
#[derive(Parser, Debug)]
#[command(name = "collate")]
#[command(
    author,
    version,
    about,
    long_about = r#"collate scans named source folders under a base directory and writes one
text file per folder into the parent of the base directory.

Each collated file starts with a `//<relative path>` header line followed by the
file's verbatim content and a blank line. Files are ordered by path, so re-running
over unchanged sources produces byte-identical output.

Progress is logged to stderr; the end-of-run summary is printed to stdout.

Examples:
    collate
    collate --base-dir tools --map web=web.txt --map api=api.txt
    collate --ext .rs,.toml --exclude-dir target,node_modules
    collate --dry-run --format json
    collate --stats --token-model o200k
"#
)]
pub struct Cli {
    /// Directory containing the source folders.
    #[arg(
        long,
        env = "COLLATE_BASE_DIR",
        default_value = ".",
        value_name = "DIR",
        long_help = "Directory containing the source folders (defaults to the current directory).\n\n\
Output files are written into the parent of this directory, so it must not be a\n\
filesystem root."
    )]
    pub base_dir: PathBuf,

    /// Folder mapping SRC=OUT (repeatable).
    #[arg(
        short,
        long = "map",
        value_name = "SRC=OUT",
        value_parser = parse_mapping,
        long_help = "Map a source folder (relative to --base-dir) to an output file name\n\
(relative to the parent of --base-dir). Repeat for several folders; tasks run in\n\
the order given.\n\n\
When omitted, the built-in mapping is used:\n\
  todolist.client=todolist.client.txt\n\
  ToDoList.Server=ToDoList.Server.txt"
    )]
    pub maps: Vec<FolderTask>,

    /// Allowed file extensions (comma-separated).
    #[arg(
        short,
        long = "ext",
        value_name = "EXTS",
        value_delimiter = ',',
        long_help = "Comma-separated list of file extensions to collate. Matching is\n\
case-insensitive and the leading dot is optional.\n\n\
Default: .cs,.ts,.js,.json,.css"
    )]
    pub extensions: Vec<String>,

    /// Folder names to skip wherever they appear (comma-separated).
    #[arg(
        short = 'x',
        long = "exclude-dir",
        value_name = "NAMES",
        value_delimiter = ',',
        long_help = "Comma-separated list of folder names to skip. A file is excluded when any\n\
segment of its path equals one of these names exactly (case-sensitive).\n\n\
Default: node_modules"
    )]
    pub exclude_dirs: Vec<String>,

    /// Also honour .gitignore/.ignore files while scanning.
    #[arg(long)]
    pub gitignore: bool,

    /// Scan and report without writing any output file.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Report size, token estimate and digest of every written file.
    #[arg(long)]
    pub stats: bool,

    /// Token model used by --stats (cl100k/o200k/heuristic).
    #[arg(long, default_value = "cl100k", value_name = "MODEL")]
    pub token_model: String,

    /// Digest algorithm used by --stats (xxh3/sha1).
    #[arg(long, default_value = "xxh3", value_name = "ALGO")]
    pub hash: String,

    /// Summary format (text/json/jsonl).
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: String,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long)]
    pub pretty: bool,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,

    /// More diagnostics on stderr (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Also write timestamped log lines to this file.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

fn parse_mapping(s: &str) -> Result<FolderTask, String> {
    s.parse::<FolderTask>().map_err(|e| e.to_string())
}

impl Cli {
    /// Build the run configuration, falling back to the defaults for unset lists
    pub fn to_config(&self) -> Result<CollateConfig> {
        let mut config = CollateConfig::with_defaults(&self.base_dir);

        if !self.maps.is_empty() {
            config.tasks = self.maps.clone();
        }
        if !self.extensions.is_empty() {
            config.extensions = ExtensionSet::new(&self.extensions);
            if config.extensions.is_empty() {
                anyhow::bail!("no usable file extensions given");
            }
        }
        if !self.exclude_dirs.is_empty() {
            config.blacklist = self
                .exclude_dirs
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if self.stats {
            config.stats = Some(StatsConfig {
                token_model: self.token_model.parse().map_err(anyhow::Error::msg)?,
                hash: self.hash.parse().map_err(anyhow::Error::msg)?,
            });
        }
        config.respect_ignore_files = self.gitignore;
        config.dry_run = self.dry_run;

        Ok(config)
    }
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }
    init_logger(
        LogLevel::from_flags(cli.verbose, cli.quiet),
        !cli.no_color,
        cli.log_file.as_deref(),
    )?;

    let format: OutputFormat = cli.format.parse().unwrap_or_default();
    let render_config = RenderConfig::with_pretty(format, cli.pretty);
    let config = cli.to_config()?;

    let summary = crate::flows::collate::run_collation(&config)?;

    let renderer = Renderer::with_config(render_config);
    println!("{}", renderer.render(&summary));
    log::info!(
        "Collation finished: {} written, {} skipped, {} failed.",
        summary.written(),
        summary.skipped(),
        summary.failed()
    );

    Ok(())
}
