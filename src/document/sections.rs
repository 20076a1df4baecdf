//! Heading-based section indexing

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

use super::types::{Section, UNSECTIONED};

/// Maximum number of title words kept in a slug
const SLUG_MAX_WORDS: usize = 2;

/// Markdown symbols removed from titles before slugging
const SLUG_STRIP_CHARS: &[char] = &['#', '*', '_', '`', '[', ']', '(', ')'];

fn heading_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(#{1,4})\s+(.+)$").expect("valid heading pattern"))
}

/// Parse an ATX heading (levels 1-4). Returns `(level, title)`.
pub fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let caps = heading_pattern().captures(line)?;
    let level = caps.get(1)?.as_str().len();
    let title = caps.get(2)?.as_str();
    Some((level, title))
}

/// Derive a section slug from a heading title.
///
/// Markdown symbols are stripped, at most the first two words are kept,
/// joined with `-`, lowercased, and reduced to `[a-z0-9-]`.
pub fn slugify(title: &str) -> String {
    let cleaned: String = title.chars().filter(|c| !SLUG_STRIP_CHARS.contains(c)).collect();

    cleaned
        .split_whitespace()
        .take(SLUG_MAX_WORDS)
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

/// Line-range index of document sections
#[derive(Debug, Clone, Default)]
pub struct SectionIndex {
    sections: Vec<Section>,
}

impl SectionIndex {
    /// Walk the document once and assign every line to the active section.
    ///
    /// Headings that share a slug share one interval spanning from the first
    /// to the last line assigned to that slug.
    pub fn build(text: &str) -> Self {
        let mut sections: Vec<Section> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut current = UNSECTIONED.to_string();

        for (line_num, line) in text.split('\n').enumerate() {
            if let Some((level, title)) = parse_heading(line) {
                current = slugify(title);
                debug!("Found section (h{}): {} -> {}", level, title, current);
            }

            match positions.get(&current) {
                Some(&idx) => sections[idx].end_line = line_num,
                None => {
                    positions.insert(current.clone(), sections.len());
                    sections.push(Section {
                        slug: current.clone(),
                        start_line: line_num,
                        end_line: line_num,
                    });
                }
            }
        }

        Self { sections }
    }

    /// Sections in order of first appearance
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Number of distinct section slugs
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the index holds no sections
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Slug of the first section whose interval contains `line`
    pub fn lookup(&self, line: usize) -> &str {
        self.sections
            .iter()
            .find(|s| s.contains(line))
            .map_or(UNSECTIONED, |s| s.slug.as_str())
    }
}
