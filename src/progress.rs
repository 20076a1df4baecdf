//! Progress reporting for image localization.
//!
//! The pipeline reports through [`ProgressCallback`]; [`ConsoleProgress`] is
//! the terminal implementation used by the CLI.

use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;

use crate::planner::ReplacementEntry;

/// Processing stages of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingStage {
    /// Initializing
    #[default]
    Initializing,
    /// Indexing sections and extracting references
    Scanning,
    /// Downloading and cropping images
    Processing,
    /// Rewriting the document text
    Rewriting,
    /// Completed
    Completed,
}

impl ProcessingStage {
    /// Get the name of the stage
    pub fn name(&self) -> &'static str {
        match self {
            ProcessingStage::Initializing => "Initializing",
            ProcessingStage::Scanning => "Scanning",
            ProcessingStage::Processing => "Processing",
            ProcessingStage::Rewriting => "Rewriting",
            ProcessingStage::Completed => "Completed",
        }
    }

    /// Get a short description of the stage
    pub fn description(&self) -> &'static str {
        match self {
            ProcessingStage::Initializing => "loading document",
            ProcessingStage::Scanning => "finding sections and images",
            ProcessingStage::Processing => "downloading and cropping",
            ProcessingStage::Rewriting => "updating references",
            ProcessingStage::Completed => "done",
        }
    }
}

impl fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.description())
    }
}

/// Output verbosity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// No output
    Quiet,
    /// Normal output (results and failures)
    #[default]
    Normal,
    /// Verbose output (every step)
    Verbose,
}

impl OutputMode {
    /// Create OutputMode from CLI flags
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => OutputMode::Quiet,
            (false, true) => OutputMode::Verbose,
            (false, false) => OutputMode::Normal,
        }
    }

    /// Check if output should be shown at this mode
    pub fn should_show(&self, required: OutputMode) -> bool {
        use OutputMode::*;
        match (self, required) {
            (Quiet, _) => false,
            (Normal, Quiet | Normal) => true,
            (Verbose, _) => true,
            _ => false,
        }
    }
}

/// Progress callback used by the planner and pipeline
pub trait ProgressCallback {
    /// A new stage has started
    fn on_stage(&self, _stage: ProcessingStage) {}

    /// References were extracted
    fn on_references_found(&self, _total: usize) {}

    /// Processing of one reference started
    fn on_image_start(&self, _current: usize, _total: usize, _url: &str, _section: &str) {}

    /// An image was saved (or would have been, in dry-run mode)
    fn on_image_done(&self, _entry: &ReplacementEntry, _dry_run: bool) {}

    /// A reference was skipped after a download or decode failure
    fn on_image_failed(&self, _url: &str, _reason: &str) {}

    /// A reference reused the entry of an earlier occurrence
    fn on_duplicate(&self, _entry: &ReplacementEntry) {}
}

/// Progress callback that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {}

/// Terminal progress output
pub struct ConsoleProgress {
    mode: OutputMode,
    bar: ProgressBar,
}

impl ConsoleProgress {
    /// Create console progress. A bar is drawn in normal mode only; verbose
    /// mode prints one line per step instead.
    pub fn new(mode: OutputMode) -> Self {
        let bar = if mode == OutputMode::Normal {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::with_template("  {bar:40.cyan/blue} {pos}/{len} {wide_msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        } else {
            ProgressBar::hidden()
        };

        Self { mode, bar }
    }

    /// Output mode
    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Remove the bar from the terminal
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    fn emit(&self, required: OutputMode, message: &str) {
        if !self.mode.should_show(required) {
            return;
        }
        if self.bar.is_hidden() {
            println!("{}", message);
        } else {
            self.bar.println(message);
        }
    }
}

impl ProgressCallback for ConsoleProgress {
    fn on_stage(&self, stage: ProcessingStage) {
        self.emit(OutputMode::Verbose, &format!("[INFO] Stage: {}", stage));
    }

    fn on_references_found(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.emit(OutputMode::Verbose, &format!("[INFO] Found {} remote image reference(s)", total));
    }

    fn on_image_start(&self, current: usize, total: usize, url: &str, section: &str) {
        self.bar.set_position(current.saturating_sub(1) as u64);
        self.bar.set_message(url.to_string());
        self.emit(
            OutputMode::Verbose,
            &format!("[INFO] [{}/{}] Found image in section '{}': {}", current, total, section, url),
        );
    }

    fn on_image_done(&self, entry: &ReplacementEntry, dry_run: bool) {
        self.bar.inc(1);
        if dry_run {
            self.emit(
                OutputMode::Verbose,
                &format!("[DRY RUN] Would save: {}", entry.output_path.display()),
            );
        } else {
            self.emit(OutputMode::Normal, &format!("✓ Saved: {}", entry.output_path.display()));
        }
    }

    fn on_image_failed(&self, url: &str, reason: &str) {
        self.bar.inc(1);
        self.emit(OutputMode::Normal, &format!("✗ Failed to download {}: {}", url, reason));
    }

    fn on_duplicate(&self, entry: &ReplacementEntry) {
        self.bar.inc(1);
        self.emit(
            OutputMode::Verbose,
            &format!("[INFO] Reusing {} for repeated {}", entry.relative_path, entry.url),
        );
    }
}
