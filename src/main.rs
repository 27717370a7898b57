//! zipdoc - store zipped documents uncompressed under version control

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use zipdoc_core::{FilterConfig, PassthroughGuard, TranscodeMode, TranscodeOptions, ZipReader};

mod batch;
mod cli;
mod config;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Encode {
            name,
            config: config_path,
        } => {
            let filter_config = config::load(config_path.as_deref())?;
            let options = config::apply_overrides(filter_config.options, &cli.transcode);
            run_filter(options, TranscodeMode::ToStored, &name)?;
        }

        Commands::Decode {
            name,
            config: config_path,
        } => {
            let filter_config = config::load(config_path.as_deref())?;
            let options = config::apply_overrides(filter_config.options, &cli.transcode);
            run_filter(options, TranscodeMode::ToCompressed, &name)?;
        }

        Commands::Convert { mode, files } => {
            let options = config::apply_overrides(TranscodeOptions::default(), &cli.transcode);
            let mode = TranscodeMode::from(mode);
            let jobs: Vec<batch::Job> = files
                .into_iter()
                .map(|path| batch::Job { path, mode })
                .collect();

            println!("zipdoc - {} {} files", mode.action(), jobs.len());
            run_batch(&jobs, options)?;
        }

        Commands::Apply {
            direction,
            config: config_path,
            paths,
        } => {
            let filters = config::load(config_path.as_deref())?
                .compile()
                .context("Invalid filter configuration")?;
            let options = config::apply_overrides(*filters.options(), &cli.transcode);

            let found = batch::collect_files(&paths);
            let jobs = batch::plan(&found, &filters, direction.into());
            println!(
                "zipdoc - {} of {} files matched the filter rules",
                jobs.len(),
                found.len()
            );
            run_batch(&jobs, options)?;
        }

        Commands::List { archive } => {
            list_archive(&archive)?;
        }

        Commands::Config => {
            let text = serde_json::to_string_pretty(&FilterConfig::default())?;
            println!("{}", text);
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    let default = match (verbose, quiet) {
        (true, _) => "debug",
        (false, true) => "error",
        (false, false) => "warn",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .init();
}

/// stdin -> stdout; the host sees the input unchanged when it is not a usable archive.
fn run_filter(options: TranscodeOptions, mode: TranscodeMode, name: &str) -> Result<()> {
    let mut input = Vec::new();
    io::stdin()
        .lock()
        .read_to_end(&mut input)
        .context("Failed to read standard input")?;

    let outcome = PassthroughGuard::new(options).filter(&input, mode, name);

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(&outcome.data)
        .context("Failed to write standard output")?;
    stdout.flush()?;
    Ok(())
}

fn run_batch(jobs: &[batch::Job], options: TranscodeOptions) -> Result<()> {
    let pb = ProgressBar::new(jobs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let guard = PassthroughGuard::new(options);
    let summary = batch::run(jobs, &guard, Some(&pb));
    pb.finish_and_clear();
    let summary = summary?;

    println!("  Files: {}", summary.total());
    println!("  Rewritten: {}", summary.rewritten);
    println!("  Unchanged: {}", summary.unchanged);
    println!("  Not a ZIP archive: {}", summary.passed_through);
    Ok(())
}

fn list_archive(path: &Path) -> Result<()> {
    let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let reader = ZipReader::new(&data)
        .with_context(|| format!("Failed to open {} as a ZIP archive", path.display()))?;

    println!("Archive: {}", path.display());
    println!(
        "{:>10} {:>10}  {:<8} {:>8}  {:<19}  Name",
        "Length", "Size", "Method", "CRC-32", "Modified"
    );
    for entry in reader.entries() {
        println!(
            "{:>10} {:>10}  {:<8} {:08x}  {}  {}",
            entry.uncompressed_size,
            entry.compressed_size,
            entry.method.to_string(),
            entry.crc32,
            entry.modified,
            entry.name_lossy()
        );
    }
    println!("{} entries", reader.len());
    if !reader.comment().is_empty() {
        println!("Comment: {}", String::from_utf8_lossy(reader.comment()));
    }
    Ok(())
}
