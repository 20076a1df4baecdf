//! Common types for the document module

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Document error types
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Document not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DocumentError>;

/// Slug of the implicit section before the first heading
pub const UNSECTIONED: &str = "unsectioned";

/// A document section and the closed line range assigned to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Slug derived from the heading title
    pub slug: String,
    /// First line (0-based) assigned to this slug
    pub start_line: usize,
    /// Last line (0-based) assigned to this slug
    pub end_line: usize,
}

impl Section {
    /// Check whether `line` lies inside the interval
    pub fn contains(&self, line: usize) -> bool {
        self.start_line <= line && line <= self.end_line
    }

    /// Number of lines spanned by the interval
    pub fn line_count(&self) -> usize {
        self.end_line - self.start_line + 1
    }
}

/// A remote image reference found in the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageReference {
    /// Line number (0-based)
    pub line: usize,
    /// Alt text as written
    pub alt_text: String,
    /// Remote URL, verbatim
    pub url: String,
}

/// A single literal URL substitution for the rewrite pass
#[derive(Debug, Clone, Copy)]
pub struct Replacement<'a> {
    /// Original remote URL
    pub url: &'a str,
    /// New alt text
    pub alt_text: &'a str,
    /// New link target
    pub target: &'a str,
}

/// Output of the rewrite pass
#[derive(Debug, Clone)]
pub struct RewriteResult {
    /// Updated document text
    pub text: String,
    /// Number of image markups replaced
    pub replaced: usize,
}

impl RewriteResult {
    /// Whether the text differs from the input
    pub fn changed(&self) -> bool {
        self.replaced > 0
    }
}
