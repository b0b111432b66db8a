//! Renderer module
//!
//! Renders a RunSummary as a human-readable block, a JSON document, or JSON Lines.

use colored::Colorize;

use crate::core::model::{OutputStats, RunSummary, TaskReport};

const SUMMARY_HEADER: &str = "--- Processing Summary ---";
const SUMMARY_FOOTER: &str = "-------------------------";

/// Output format for the end-of-run summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Jsonl,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "jsonl" => Ok(OutputFormat::Jsonl),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for run summaries
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a summary to a string
    pub fn render(&self, summary: &RunSummary) -> String {
        match self.config.format {
            OutputFormat::Text => self.render_text(summary),
            OutputFormat::Json => self.render_json(summary),
            OutputFormat::Jsonl => self.render_jsonl(summary),
        }
    }

    fn render_text(&self, summary: &RunSummary) -> String {
        let mut output = String::new();
        output.push_str(SUMMARY_HEADER);
        output.push('\n');

        if summary.is_empty() {
            output.push_str("No tasks were defined or processed.\n");
        } else {
            for report in &summary.reports {
                output.push_str(&colorize_line(report));
                output.push('\n');
                if let Some(stats) = &report.stats {
                    output.push_str(&format!("    {}\n", describe_stats(stats)));
                }
            }
        }

        if summary.dry_run {
            output.push_str(&format!("{}\n", "(dry run: no files were written)".dimmed()));
        }

        output.push_str(SUMMARY_FOOTER);
        output
    }

    fn render_json(&self, summary: &RunSummary) -> String {
        let rendered = if self.config.pretty {
            serde_json::to_string_pretty(summary)
        } else {
            serde_json::to_string(summary)
        };
        rendered.unwrap_or_else(|_| "{}".to_string())
    }

    fn render_jsonl(&self, summary: &RunSummary) -> String {
        summary
            .reports
            .iter()
            .filter_map(|report| {
                if self.config.pretty {
                    serde_json::to_string_pretty(report).ok()
                } else {
                    serde_json::to_string(report).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }
}

fn colorize_line(report: &TaskReport) -> String {
    let line = report.summary_line();
    if report.outcome.is_failure() {
        line.red().to_string()
    } else if report.outcome.is_skip() {
        line.yellow().to_string()
    } else {
        line.green().to_string()
    }
}

fn describe_stats(stats: &OutputStats) -> String {
    format!(
        "{} bytes, ~{} tokens ({}), {} {}",
        stats.bytes, stats.estimated_tokens, stats.token_model, stats.digest_algorithm, stats.digest
    )
}
