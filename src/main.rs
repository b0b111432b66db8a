//! collate - Bundle source folders into per-folder text files
//!
//! collate provides:
//! - Recursive scanning with an extension allow-list and folder blacklist
//! - Deterministic, path-ordered output with `//<path>` headers
//! - Per-file and per-task error containment with an end-of-run summary
//! - Optional size, token and digest statistics for each bundle

use anyhow::Result;
use clap::Parser;

mod backends;
mod cli;
mod core;
mod flows;
mod logging;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::run(cli)
}
