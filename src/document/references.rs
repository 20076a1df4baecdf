//! Remote image reference extraction

use regex::Regex;
use std::sync::OnceLock;

use super::types::ImageReference;

fn image_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"!\[([^\]]*)\]\((https://[^)]+)\)").expect("valid image pattern")
    })
}

/// Finds `![alt](https://...)` image markup
pub struct ReferenceExtractor;

impl ReferenceExtractor {
    /// Extract every remote image reference, in document order and
    /// left-to-right within a line
    pub fn extract(text: &str) -> Vec<ImageReference> {
        text.split('\n')
            .enumerate()
            .flat_map(|(line, content)| {
                image_pattern().captures_iter(content).map(move |caps| ImageReference {
                    line,
                    alt_text: caps[1].to_string(),
                    url: caps[2].to_string(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_reference() {
        let refs = ReferenceExtractor::extract("see ![A chart](https://cdn.example.com/a.png) here");

        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].line, 0);
        assert_eq!(refs[0].alt_text, "A chart");
        assert_eq!(refs[0].url, "https://cdn.example.com/a.png");
    }

    #[test]
    fn test_multiple_per_line_in_order() {
        let text = "intro\n![one](https://x.io/1.jpg) and ![two](https://x.io/2.jpg)\n![three](https://x.io/3.jpg)";
        let refs = ReferenceExtractor::extract(text);

        let urls: Vec<_> = refs.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://x.io/1.jpg", "https://x.io/2.jpg", "https://x.io/3.jpg"]
        );
        assert_eq!(refs[0].line, 1);
        assert_eq!(refs[1].line, 1);
        assert_eq!(refs[2].line, 2);
    }

    #[test]
    fn test_local_and_insecure_references_ignored() {
        let text = "![local](/img/features/doc/setup/01.jpg)\n![rel](images/a.png)\n![plain](http://x.io/a.png)";
        assert!(ReferenceExtractor::extract(text).is_empty());
    }

    #[test]
    fn test_empty_alt_text() {
        let refs = ReferenceExtractor::extract("![](https://x.io/a.gif)");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].alt_text, "");
    }

    #[test]
    fn test_url_with_query_kept_verbatim() {
        let refs = ReferenceExtractor::extract("![q](https://x.io/img?id=4&size=large#frag)");
        assert_eq!(refs[0].url, "https://x.io/img?id=4&size=large#frag");
    }

    #[test]
    fn test_plain_links_not_matched() {
        let refs = ReferenceExtractor::extract("[not an image](https://x.io/a.png)");
        assert!(refs.is_empty());
    }

    #[test]
    fn test_duplicate_urls_reported_each_time() {
        let text = "![a](https://x.io/same.png)\n![b](https://x.io/same.png)";
        let refs = ReferenceExtractor::extract(text);
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].url, refs[1].url);
        assert_eq!(refs[1].alt_text, "b");
    }
}
