//! Markdown Document module
//!
//! Text-level passes over the source document:
//!
//! - **Sections** ([`SectionIndex`]) - heading structure as slugged line ranges
//! - **References** ([`ReferenceExtractor`]) - remote `![alt](https://...)` markup
//! - **Rewrite** ([`rewrite_references`]) - literal URL substitution
//!
//! The section and reference passes are independent; both number lines the
//! same way (split on `\n`, 0-based).

mod references;
mod rewrite;
mod sections;
mod types;

// Re-export public API
pub use references::ReferenceExtractor;
pub use rewrite::rewrite_references;
pub use sections::{parse_heading, slugify, SectionIndex};
pub use types::{
    DocumentError, ImageReference, Replacement, Result, RewriteResult, Section, UNSECTIONED,
};

use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A Markdown document loaded from disk
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    text: String,
}

impl Document {
    /// Read a UTF-8 document
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DocumentError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        debug!("Loaded {} ({} bytes)", path.display(), text.len());

        Ok(Self {
            path: path.to_path_buf(),
            text,
        })
    }

    /// Build a document from in-memory text
    pub fn from_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Source path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Document text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// File name without extension, used to group output images
    pub fn base_name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string())
    }

    /// Replace the file content through a temporary file in the same directory
    pub fn write_atomic(&self, text: &str) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(text.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| DocumentError::IoError(e.error))?;

        debug!("Wrote {}", self.path.display());
        Ok(())
    }
}
