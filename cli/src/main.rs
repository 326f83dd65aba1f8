//! Command-line entry point for `ripen`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use ripen_engine::walk::DEFAULT_THRESHOLD;
use ripen_engine::{RunLock, RunOptions, Walker};

#[derive(Debug, Parser)]
#[command(name = "ripen", about = "Act on files once they stop changing", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Scan the input tree and extract/copy stable files into the output tree.
    Run {
        /// Root of the tree to scan.
        input_root: PathBuf,

        /// Root under which the mirrored output layout is created.
        output_root: PathBuf,

        /// Consecutive unchanged scans required before a file is acted on.
        #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: u32,

        /// Re-check digests of already-processed files. Refreshes their
        /// bookkeeping only; a processed file is never acted on again.
        #[arg(long)]
        force: bool,

        /// Enable debug logging.
        #[arg(long, short)]
        verbose: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            input_root,
            output_root,
            threshold,
            force,
            verbose,
        } => {
            init_logging(verbose);
            match run(&input_root, &output_root, RunOptions { threshold, force }) {
                Ok(code) => code,
                Err(e) => {
                    error!("{e:#}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(input_root: &Path, output_root: &Path, options: RunOptions) -> anyhow::Result<ExitCode> {
    let _lock = RunLock::acquire(input_root)
        .with_context(|| format!("cannot start run for {}", input_root.display()))?;

    let walker = Walker::new(input_root, output_root, options);
    let report = walker.run()?;

    println!(
        "{} directories visited, {} files classified, {} newly processed, {} pending",
        report.stats.dirs_visited,
        report.stats.files_classified,
        report.stats.newly_processed,
        report.stats.pending
    );

    // Per-file warnings are fine; unusable per-directory state is not.
    if report.failed_dirs.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        for dir in &report.failed_dirs {
            error!("state unusable for {}", dir.display());
        }
        Ok(ExitCode::FAILURE)
    }
}
