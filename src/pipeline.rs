//! Document localization pipeline
//!
//! Load → index sections → extract references → plan (download, crop, save)
//! → rewrite → save document. The document is written last, and only when
//! at least one reference was replaced.

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::codec::{ImageCodec, StandardCodec};
use crate::config::LocalizeConfig;
use crate::document::{
    rewrite_references, Document, DocumentError, ReferenceExtractor, SectionIndex,
};
use crate::fetch::{FetchError, HttpFetcher, ImageFetcher};
use crate::planner::{PlannerError, PlannerOptions, ReplacementEntry, ReplacementPlanner};
use crate::progress::{ProcessingStage, ProgressCallback};

/// Pipeline error types
#[derive(Debug, Error)]
pub enum LocalizeError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Planner(#[from] PlannerError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

pub type Result<T> = std::result::Result<T, LocalizeError>;

/// Outcome of one run
#[derive(Debug, Clone, Serialize)]
pub struct LocalizeReport {
    pub document: PathBuf,
    pub output_dir: PathBuf,
    pub dry_run: bool,
    /// Remote references found
    pub references: usize,
    /// Distinct images processed
    pub processed: usize,
    /// Distinct images that failed to download or decode
    pub failed: usize,
    /// Repeated references that reused an entry
    pub duplicates: usize,
    /// Image markups rewritten in the text
    pub replaced: usize,
    /// Whether the document file was (or would be) updated
    pub document_updated: bool,
    pub entries: Vec<ReplacementEntry>,
}

impl LocalizeReport {
    fn empty(document: &Path, output_dir: PathBuf, dry_run: bool) -> Self {
        Self {
            document: document.to_path_buf(),
            output_dir,
            dry_run,
            references: 0,
            processed: 0,
            failed: 0,
            duplicates: 0,
            replaced: 0,
            document_updated: false,
            entries: Vec::new(),
        }
    }

    /// One-line result for the user
    pub fn summary_message(&self) -> String {
        if self.processed == 0 {
            return "No external images found to process.".to_string();
        }
        let mut message = format!("✓ Processed {} images successfully!", self.processed);
        if self.dry_run {
            message.push_str(" (dry run, no files written)");
        }
        message
    }
}

/// Localizes the remote images of Markdown documents
pub struct ImageLocalizer {
    config: LocalizeConfig,
}

impl ImageLocalizer {
    /// Create a localizer from effective settings
    pub fn new(config: LocalizeConfig) -> Self {
        Self { config }
    }

    /// Process a document with the HTTP fetcher and standard codec
    pub fn process_file(&self, path: &Path, progress: &dyn ProgressCallback) -> Result<LocalizeReport> {
        let fetcher = HttpFetcher::new(&self.config.fetch)?;
        self.process_file_with(path, &fetcher, &StandardCodec, progress)
    }

    /// Process a document with explicit collaborators
    pub fn process_file_with(
        &self,
        path: &Path,
        fetcher: &dyn ImageFetcher,
        codec: &dyn ImageCodec,
        progress: &dyn ProgressCallback,
    ) -> Result<LocalizeReport> {
        progress.on_stage(ProcessingStage::Initializing);
        let document = Document::load(path)?;
        let output_dir = self.config.resolve_output_dir(path);
        info!("Processing: {}", path.display());
        info!("Output directory: {}", output_dir.display());

        let (updated, report) = self.process_document(&document, output_dir, fetcher, codec, progress)?;

        if let Some(text) = updated {
            if self.config.dry_run {
                info!("[DRY RUN] Would update markdown file");
            } else {
                document.write_atomic(&text)?;
                info!("Updated markdown file: {}", path.display());
            }
        }

        progress.on_stage(ProcessingStage::Completed);
        Ok(report)
    }

    /// Plan and rewrite an in-memory document. Returns the new text when it
    /// changed, plus the report. Images are saved unless dry-run is set; the
    /// document itself is never written here.
    pub fn process_document(
        &self,
        document: &Document,
        output_dir: PathBuf,
        fetcher: &dyn ImageFetcher,
        codec: &dyn ImageCodec,
        progress: &dyn ProgressCallback,
    ) -> Result<(Option<String>, LocalizeReport)> {
        let mut report = LocalizeReport::empty(document.path(), output_dir.clone(), self.config.dry_run);

        progress.on_stage(ProcessingStage::Scanning);
        let sections = SectionIndex::build(document.text());
        let references = ReferenceExtractor::extract(document.text());
        debug!(
            "{} section(s), {} remote reference(s)",
            sections.len(),
            references.len()
        );
        if references.is_empty() {
            return Ok((None, report));
        }

        progress.on_stage(ProcessingStage::Processing);
        let options = PlannerOptions::builder()
            .base_name(document.base_name())
            .output_dir(output_dir)
            .url_prefix(self.config.url_prefix.clone())
            .border(self.config.border)
            .jpeg_quality(self.config.jpeg_quality)
            .dry_run(self.config.dry_run)
            .build();
        let plan = ReplacementPlanner::new(&options, fetcher, codec)
            .with_progress(progress)
            .plan(&sections, &references)?;

        report.references = plan.stats.references;
        report.processed = plan.stats.processed;
        report.failed = plan.stats.failed;
        report.duplicates = plan.stats.duplicates;
        report.entries = plan.entries().cloned().collect();
        if plan.is_empty() {
            return Ok((None, report));
        }

        progress.on_stage(ProcessingStage::Rewriting);
        let rewritten = rewrite_references(document.text(), plan.replacements())?;
        report.replaced = rewritten.replaced;
        report.document_updated = rewritten.changed();

        Ok((rewritten.changed().then_some(rewritten.text), report))
    }
}

impl Default for ImageLocalizer {
    fn default() -> Self {
        Self::new(LocalizeConfig::default())
    }
}
