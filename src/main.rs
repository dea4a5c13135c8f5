/*!
 * Command-line interface for ctxpack
 */

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ctxpack::config::{Args, Config};
use ctxpack::pipeline::build_context;
use ctxpack::report::{ReportFormat, Reporter, ScanReport};
use ctxpack::writer::ContextWriter;

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse();
    setup_logging(args.verbose);

    // Create and validate configuration
    let config = Config::from_args(args);
    config.validate()?;

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos} files")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_prefix("📂 Scanning");
    progress.set_message(config.target_dir.display().to_string());

    let start_time = Instant::now();

    let (scan, context) = build_context(&config, Some(Arc::new(progress.clone())))?;

    progress.set_prefix("📝 Writing");
    progress.set_message(config.output_display());
    let summary = ContextWriter::new(&config.output_file).write(&context)?;

    let duration = start_time.elapsed();
    progress.finish_and_clear();

    if context.files.is_empty() {
        println!("No files specified to include. Only the directory tree and signatures were written.");
    }

    let report = ScanReport {
        output_file: config.output_display(),
        duration,
        visible_files: scan.all_files.len(),
        signature_candidates: scan.signature_candidates.len(),
        tracked_files: scan.tracked.len(),
        scan: scan.statistics,
        write: summary,
    };
    Reporter::new(ReportFormat::ConsoleTable).print_report(&report);

    Ok(())
}
