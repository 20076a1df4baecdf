//! Replacement Planning module
//!
//! Drives download, crop and naming for every remote image reference.
//!
//! # Algorithm
//!
//! For each reference in document order:
//!
//! 1. Reuse the entry of an earlier occurrence of the same URL, if any
//! 2. Resolve the enclosing section and take the next per-section number
//! 3. Fetch and decode; failures are logged and skipped. A URL without an
//!    entry is retried at each occurrence and takes a number every time.
//! 4. Crop the border, pick the output format from the detected format
//! 5. Save `<base>/<section>/<NN>.<ext>` unless running dry
//! 6. Record the entry under the original URL
//!
//! All run state (counters, entries, failures) belongs to one
//! [`ReplacementPlanner`] value.

mod types;

pub use types::{PlanStats, PlannerError, ReplacementEntry, ReplacementPlan, Result};

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::border::{BorderOptions, Cropper};
use crate::codec::{ImageCodec, OutputFormat, DEFAULT_JPEG_QUALITY};
use crate::document::{ImageReference, ReferenceExtractor, SectionIndex};
use crate::fetch::ImageFetcher;
use crate::progress::{NoopProgress, ProgressCallback};

/// Default public URL prefix for localized images
pub const DEFAULT_URL_PREFIX: &str = "/img/features";

// ============================================================
// Options
// ============================================================

/// Planner options
#[derive(Debug, Clone)]
pub struct PlannerOptions {
    /// Document base name, first path component of every output
    pub base_name: String,
    /// Directory receiving `<base>/<section>/<NN>.<ext>`
    pub output_dir: PathBuf,
    /// Public URL prefix written into the document
    pub url_prefix: String,
    /// Border detection options
    pub border: BorderOptions,
    /// JPEG encoding quality (1-100)
    pub jpeg_quality: u8,
    /// Skip all filesystem writes
    pub dry_run: bool,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            base_name: "document".to_string(),
            output_dir: PathBuf::from("public/img/features"),
            url_prefix: DEFAULT_URL_PREFIX.to_string(),
            border: BorderOptions::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            dry_run: false,
        }
    }
}

impl PlannerOptions {
    /// Create a new options builder
    pub fn builder() -> PlannerOptionsBuilder {
        PlannerOptionsBuilder::default()
    }
}

/// Builder for PlannerOptions
#[derive(Debug, Default)]
pub struct PlannerOptionsBuilder {
    options: PlannerOptions,
}

impl PlannerOptionsBuilder {
    /// Set document base name
    #[must_use]
    pub fn base_name(mut self, name: impl Into<String>) -> Self {
        self.options.base_name = name.into();
        self
    }

    /// Set output directory
    #[must_use]
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options.output_dir = dir.into();
        self
    }

    /// Set public URL prefix
    #[must_use]
    pub fn url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options.url_prefix = prefix.into();
        self
    }

    /// Set border options
    #[must_use]
    pub fn border(mut self, border: BorderOptions) -> Self {
        self.options.border = border;
        self
    }

    /// Set JPEG quality (clamped to 1-100)
    #[must_use]
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.options.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Enable or disable dry-run
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.options.dry_run = dry_run;
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> PlannerOptions {
        self.options
    }
}

// ============================================================
// Planner
// ============================================================

/// Builds the URL → replacement mapping for one document
pub struct ReplacementPlanner<'a> {
    options: &'a PlannerOptions,
    fetcher: &'a dyn ImageFetcher,
    codec: &'a dyn ImageCodec,
    progress: &'a dyn ProgressCallback,
    counters: HashMap<String, u32>,
    failed: HashSet<String>,
    plan: ReplacementPlan,
}

impl<'a> ReplacementPlanner<'a> {
    /// Create a planner with injected collaborators
    pub fn new(
        options: &'a PlannerOptions,
        fetcher: &'a dyn ImageFetcher,
        codec: &'a dyn ImageCodec,
    ) -> Self {
        Self {
            options,
            fetcher,
            codec,
            progress: &NoopProgress,
            counters: HashMap::new(),
            failed: HashSet::new(),
            plan: ReplacementPlan::default(),
        }
    }

    /// Report progress through `progress`
    #[must_use]
    pub fn with_progress(mut self, progress: &'a dyn ProgressCallback) -> Self {
        self.progress = progress;
        self
    }

    /// Index and plan a whole document text
    pub fn plan_text(self, text: &str) -> Result<ReplacementPlan> {
        let sections = SectionIndex::build(text);
        let references = ReferenceExtractor::extract(text);
        self.plan(&sections, &references)
    }

    /// Process references in order and return the finished plan
    pub fn plan(
        mut self,
        sections: &SectionIndex,
        references: &[ImageReference],
    ) -> Result<ReplacementPlan> {
        self.plan.stats.references = references.len();
        self.progress.on_references_found(references.len());

        for (idx, reference) in references.iter().enumerate() {
            self.process_reference(idx + 1, references.len(), sections, reference)?;
        }

        Ok(self.plan)
    }

    fn process_reference(
        &mut self,
        current: usize,
        total: usize,
        sections: &SectionIndex,
        reference: &ImageReference,
    ) -> Result<()> {
        let url = reference.url.as_str();

        if let Some(entry) = self.plan.entries.get(url) {
            debug!("Line {}: reusing {} for {}", reference.line, entry.relative_path, url);
            self.plan.stats.duplicates += 1;
            self.progress.on_duplicate(entry);
            return Ok(());
        }

        let section = sections.lookup(reference.line).to_string();
        let sequence = self.next_sequence(&section);
        debug!("Found image in section '{}': {}", section, url);
        self.progress.on_image_start(current, total, url, &section);

        let decoded = match self
            .fetcher
            .fetch(url)
            .map_err(|e| e.to_string())
            .and_then(|bytes| self.codec.decode(&bytes).map_err(|e| e.to_string()))
        {
            Ok(decoded) => decoded,
            Err(reason) => {
                warn!("Failed to download {}: {}", url, reason);
                if self.failed.insert(url.to_string()) {
                    self.plan.stats.failed += 1;
                }
                self.progress.on_image_failed(url, &reason);
                return Ok(());
            }
        };

        debug!("Cropping border...");
        let cropped = Cropper::crop(&decoded.image, &self.options.border.detector());
        let format = OutputFormat::from_detected(decoded.format);

        let file_name = format!("{:02}.{}", sequence, format.extension());
        let relative_path = format!("{}/{}/{}", self.options.base_name, section, file_name);
        let output_path = self
            .options
            .output_dir
            .join(&self.options.base_name)
            .join(&section)
            .join(&file_name);

        if self.options.dry_run {
            info!("[DRY RUN] Would save: {}", output_path.display());
        } else {
            let bytes = self
                .codec
                .encode(&cropped.image, format, self.options.jpeg_quality)?;
            if let Some(dir) = output_path.parent() {
                std::fs::create_dir_all(dir).map_err(|source| PlannerError::Write {
                    path: dir.to_path_buf(),
                    source,
                })?;
            }
            std::fs::write(&output_path, bytes).map_err(|source| PlannerError::Write {
                path: output_path.clone(),
                source,
            })?;
            info!("Saved: {}", output_path.display());
        }

        let entry = ReplacementEntry {
            url: url.to_string(),
            public_url: format!(
                "{}/{}",
                self.options.url_prefix.trim_end_matches('/'),
                relative_path
            ),
            alt_text: format!("{}-{}", section, sequence),
            section,
            sequence,
            relative_path,
            output_path,
            format,
            original_size: cropped.original_size,
            cropped_size: cropped.cropped_size(),
        };

        self.plan.stats.processed += 1;
        self.progress.on_image_done(&entry, self.options.dry_run);
        self.plan.entries.insert(entry.url.clone(), entry);
        Ok(())
    }

    fn next_sequence(&mut self, section: &str) -> u32 {
        let counter = self.counters.entry(section.to_string()).or_insert(0);
        *counter += 1;
        *counter
    }
}
