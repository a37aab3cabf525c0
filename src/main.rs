/*!
 * Command-line interface for ctxmerge
 */

use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use ctxmerge::clipboard::copy_to_clipboard;
use ctxmerge::config::{Args, Config};
use ctxmerge::report::{MergeReport, Reporter};
use ctxmerge::{Collector, Merger, MarkdownWriter, Result};

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(shell) = args.generate {
        let mut cmd = Args::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    init_logging(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_warning() => {
            eprintln!("Warning: {}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    // Create and validate configuration
    let config = Config::from_args(args)?;
    config.validate()?;

    let progress = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len}")
    {
        progress.set_style(style);
    }
    progress.enable_steady_tick(Duration::from_millis(100));
    let progress = Arc::new(progress);

    let collector = Collector::new().with_sorted_entries(config.sort_entries);
    let output_path = config.resolved_output()?;
    let merger = Merger::new(collector, config.workspace.clone(), Arc::clone(&progress))
        .skipping(output_path.as_deref());

    let start_time = Instant::now();
    let merged = merger.merge(&config.selection);
    progress.finish_and_clear();
    let merged = merged?;
    let duration = start_time.elapsed();

    MarkdownWriter::new(config.output_file.clone()).write(&merged)?;

    if config.clip {
        copy_to_clipboard(&merged.document)?;
        tracing::info!("Copied merged document to clipboard");
    }

    if let Some(format) = config.report {
        let report = MergeReport::new(config.output_display(), duration, &merged);
        Reporter::new(format).print_report(&report)?;
    }

    Ok(())
}
