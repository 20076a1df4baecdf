//! Command-line interface definition

use clap::Parser;
use std::path::PathBuf;

use crate::border::BorderColor;
use crate::config::CliOverrides;
use crate::progress::OutputMode;

/// Process markdown images: download, crop borders, rename, and update links.
#[derive(Parser, Debug)]
#[command(name = "md-image-localizer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to markdown file to process
    pub markdown_file: PathBuf,

    /// Preview changes without modifying files
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,

    /// Config file (default: ./md-image-localizer.toml, then the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write images here instead of <public root>/<url prefix>
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Border color as #rrggbb or r,g,b
    #[arg(long)]
    pub border_color: Option<BorderColor>,

    /// Per-channel border color tolerance (0-255)
    #[arg(short, long)]
    pub tolerance: Option<u8>,

    /// Download timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl Cli {
    /// Values that override the config file
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            dry_run: self.dry_run,
            output_dir: self.output_dir.clone(),
            tolerance: self.tolerance,
            border_color: self.border_color,
            timeout_secs: self.timeout,
        }
    }

    /// Console verbosity
    pub fn output_mode(&self) -> OutputMode {
        OutputMode::from_flags(self.quiet || self.json, self.verbose)
    }
}
