//! md-image-localizer - localize remote Markdown images
//!
//! CLI entry point

use anyhow::Context;
use clap::Parser;
use md_image_localizer::{exit_codes, Cli, Config, ConsoleProgress, ImageLocalizer};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    std::process::exit(match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_codes::GENERAL_ERROR
        }
    });
}

/// Diagnostics go to stderr; `--verbose` enables step-by-step detail
fn init_logging(cli: &Cli) {
    let level = if cli.verbose { Level::DEBUG } else { Level::ERROR };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<i32> {
    if !cli.markdown_file.exists() {
        eprintln!("Error: File not found: {}", cli.markdown_file.display());
        return Ok(exit_codes::INPUT_NOT_FOUND);
    }

    // An explicit config must load; discovered ones fall back to defaults
    let file_config = match &cli.config {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => Config::load().unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config file: {}", e);
            Config::default()
        }),
    };
    let config = file_config.merge_with_cli(&cli.overrides());

    let progress = ConsoleProgress::new(cli.output_mode());
    let localizer = ImageLocalizer::new(config);
    let result = localizer.process_file(&cli.markdown_file, &progress);
    progress.finish();
    let report = result.with_context(|| format!("Failed to process {}", cli.markdown_file.display()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !cli.quiet {
        println!();
        println!("{}", report.summary_message());
    }

    Ok(exit_codes::SUCCESS)
}
