//! Common types for the planner module

use indexmap::IndexMap;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::codec::{CodecError, OutputFormat};
use crate::document::Replacement;

/// Planner error types. Per-image download and decode failures are not
/// errors; they are counted in [`PlanStats::failed`].
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

pub type Result<T> = std::result::Result<T, PlannerError>;

/// Replacement computed for one distinct remote URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplacementEntry {
    /// Original remote URL
    pub url: String,
    /// Section slug the image was numbered in
    pub section: String,
    /// 1-based sequence number within the section
    pub sequence: u32,
    /// `<base>/<section>/<NN>.<ext>`
    pub relative_path: String,
    /// Link target written into the document
    pub public_url: String,
    /// New alt text, `<section>-<N>`
    pub alt_text: String,
    /// Where the image is (or would be) written
    pub output_path: PathBuf,
    /// Output format
    pub format: OutputFormat,
    /// Decoded size before cropping
    pub original_size: (u32, u32),
    /// Size after cropping
    pub cropped_size: (u32, u32),
}

impl ReplacementEntry {
    /// Rewrite instruction for this entry
    pub fn replacement(&self) -> Replacement<'_> {
        Replacement {
            url: &self.url,
            alt_text: &self.alt_text,
            target: &self.public_url,
        }
    }
}

/// Run statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlanStats {
    /// Remote references found in the document
    pub references: usize,
    /// Distinct URLs downloaded, cropped and assigned an entry
    pub processed: usize,
    /// Distinct URLs whose download or decode failed
    pub failed: usize,
    /// Later occurrences of an already processed URL
    pub duplicates: usize,
}

/// Ordered mapping from original URL to its replacement
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplacementPlan {
    pub(crate) entries: IndexMap<String, ReplacementEntry>,
    pub stats: PlanStats,
}

impl ReplacementPlan {
    /// Entry for `url`, if it was processed
    pub fn get(&self, url: &str) -> Option<&ReplacementEntry> {
        self.entries.get(url)
    }

    /// Entries in processing order
    pub fn entries(&self) -> impl Iterator<Item = &ReplacementEntry> {
        self.entries.values()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no URL was processed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrite instructions in processing order
    pub fn replacements(&self) -> impl Iterator<Item = Replacement<'_>> {
        self.entries.values().map(ReplacementEntry::replacement)
    }
}
