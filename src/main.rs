//! delua - Batch Lua bytecode decompiler driver.
//!
//! Decompile a single compiled chunk or mirror a whole directory through unluac.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use delua::{
    resolve, Converter, ConverterOptions, DecompilerConfig, Error, InputKind, ItemReport,
    UnluacDecompiler,
};

/// Decompiles compiled Lua files and copies everything else.
///
/// A directory is mirrored into `<dir>.src`; a single file is written next
/// to itself with a `.src.lua` extension.
#[derive(Parser, Debug)]
#[command(name = "delua")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File or directory to convert
    input: PathBuf,

    /// Java runtime used to run the decompiler
    #[arg(long, default_value = delua::decompiler::DEFAULT_RUNTIME)]
    runtime: PathBuf,

    /// Decompiler archive, relative to the tool directory
    #[arg(long, default_value = delua::decompiler::DEFAULT_ARCHIVE)]
    archive: PathBuf,

    /// Working directory for the decompiler (default: this executable's directory)
    #[arg(long)]
    tool_dir: Option<PathBuf>,

    /// Number of files converted at once
    #[arg(short, long, default_value = "1")]
    jobs: usize,

    /// Verbosity level (0=quiet, 1=warnings, 2=info, 3=debug)
    #[arg(short, long, default_value = "1")]
    verbosity: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbosity);
    run(cli)
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        _ => Level::DEBUG,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .finish();

    tracing::subscriber::set_global_default(subscriber).ok();
}

fn run(cli: Cli) -> Result<()> {
    let start = Instant::now();

    let plan = match resolve(&cli.input) {
        Ok(plan) => plan,
        Err(e @ Error::InvalidInput { .. }) => {
            error!("{}", e);
            return Ok(());
        }
        Err(e) => return Err(e).context("Failed to resolve input"),
    };

    let config = match cli.tool_dir {
        Some(dir) => DecompilerConfig::new(dir),
        None => DecompilerConfig::from_current_exe()
            .context("Failed to determine the decompiler directory")?,
    }
    .with_runtime(cli.runtime)
    .with_archive(cli.archive);

    info!(
        "Converting {} file(s) into {}",
        plan.len(),
        plan.output_root.display()
    );

    let progress = if plan.kind == InputKind::Directory && plan.len() > 1 {
        let bar = ProgressBar::new(plan.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
                )
                .context("Invalid progress template")?
                .progress_chars("#>-"),
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    let decompiler = UnluacDecompiler::new(config);
    let settings = decompiler.config();
    debug!(
        "Decompiler: {} -jar {} (in {})",
        settings.runtime.display(),
        settings.archive.display(),
        settings.working_dir.display()
    );

    let converter = Converter::with_options(
        decompiler,
        ConverterOptions {
            jobs: cli.jobs.max(1),
        },
    );
    debug!("Running with {} job(s)", converter.options().jobs);

    let report = converter.run_with(&plan.items, |item| {
        progress.suspend(|| print_report(item));
        progress.inc(1);
    });

    progress.finish_and_clear();

    if report.is_empty() {
        warn!("No files found under {}", cli.input.display());
        return Ok(());
    }

    if report.failed() > 0 {
        warn!("{} of {} files failed", report.failed(), report.len());
    }

    info!(
        "Converted {}, copied {}, failed {} in {:.2}s",
        report.converted(),
        report.copied(),
        report.failed(),
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Prints the console line for one finished item.
fn print_report(report: &ItemReport) {
    let source = report.item.source.display();
    match &report.result {
        Ok(outcome) => {
            debug!("{}: {}", outcome, source);
            println!("{}", source);
        }
        Err(err) => {
            if let Some((stdout, stderr)) = err.diagnostics() {
                println!("Standard Output:");
                println!("{}", String::from_utf8_lossy(stdout));
                println!("Standard Error:");
                println!("{}", String::from_utf8_lossy(stderr));
            }
            error!("Failed to process {}: {}", source, err);
        }
    }
}
