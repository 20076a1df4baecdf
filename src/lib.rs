//! md-image-localizer - localize remote images referenced from Markdown
//!
//! Downloads every `![alt](https://...)` image of a document, crops a uniform
//! colored border, stores the result as `<base>/<section>/<NN>.<ext>` and
//! rewrites the references to the local copies.
//!
//! # Modules
//!
//! - [`border`] - border pixel detection and cropping
//! - [`document`] - section index, reference extraction, text rewrite
//! - [`planner`] - per-section numbering and the URL → replacement mapping
//! - [`pipeline`] - end-to-end document processing
//!
//! # Example
//!
//! ```rust,no_run
//! use md_image_localizer::{ImageLocalizer, LocalizeConfig, NoopProgress};
//! use std::path::Path;
//!
//! let localizer = ImageLocalizer::new(LocalizeConfig::default());
//! let report = localizer
//!     .process_file(Path::new("content/guide.md"), &NoopProgress)
//!     .unwrap();
//! println!("{}", report.summary_message());
//! ```

pub mod border;
pub mod cli;
pub mod codec;
pub mod config;
pub mod document;
pub mod fetch;
pub mod pipeline;
pub mod planner;
pub mod progress;

pub use border::{
    BorderColor, BorderDetector, BorderOptions, BorderOptionsBuilder, CropBounds, CropResult,
    Cropper,
};
pub use cli::Cli;
pub use codec::{DecodedImage, ImageCodec, OutputFormat, StandardCodec};
pub use config::{CliOverrides, Config, ConfigError, LocalizeConfig};
pub use document::{
    rewrite_references, slugify, Document, DocumentError, ImageReference, ReferenceExtractor,
    Section, SectionIndex,
};
pub use fetch::{FetchError, FetchOptions, HttpFetcher, ImageFetcher};
pub use pipeline::{ImageLocalizer, LocalizeError, LocalizeReport};
pub use planner::{
    PlanStats, PlannerError, PlannerOptions, ReplacementEntry, ReplacementPlan,
    ReplacementPlanner,
};
pub use progress::{ConsoleProgress, NoopProgress, OutputMode, ProcessingStage, ProgressCallback};

/// Process exit codes
pub mod exit_codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// Unspecified failure
    pub const GENERAL_ERROR: i32 = 1;
    /// Invalid command-line arguments
    pub const INVALID_ARGS: i32 = 2;
    /// Input document does not exist
    pub const INPUT_NOT_FOUND: i32 = 3;
}
