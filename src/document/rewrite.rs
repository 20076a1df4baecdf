//! Full-text rewrite of image references

use regex::{NoExpand, Regex};

use super::types::{Replacement, Result, RewriteResult};

/// Replace every `![any-alt](URL)` with `![alt](target)` for each replacement.
///
/// URLs are matched literally and the alt text may not span lines.
/// Replacements are applied in iteration order over the progressively
/// updated text.
pub fn rewrite_references<'a, I>(text: &str, replacements: I) -> Result<RewriteResult>
where
    I: IntoIterator<Item = Replacement<'a>>,
{
    let mut updated = text.to_string();
    let mut replaced = 0;

    for replacement in replacements {
        let pattern = Regex::new(&format!(
            r"!\[[^\]\n]*\]\({}\)",
            regex::escape(replacement.url)
        ))?;

        let count = pattern.find_iter(&updated).count();
        if count == 0 {
            continue;
        }

        let markup = format!("![{}]({})", replacement.alt_text, replacement.target);
        updated = pattern.replace_all(&updated, NoExpand(&markup)).into_owned();
        replaced += count;
    }

    Ok(RewriteResult {
        text: updated,
        replaced,
    })
}
