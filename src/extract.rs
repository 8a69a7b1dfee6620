//! Regex-based reference extraction for HTML and CSS documents.
//!
//! This is best-effort pattern matching, not a real parser: a miss on
//! malformed markup is a silent no-op for that occurrence. The patterns are
//! isolated here so the rest of the pipeline never touches regex details.

use std::collections::BTreeSet;

use regex::Regex;

const IMAGE_EXTENSIONS: &str = "svg|jpg|jpeg|png|gif|webp|ico|bmp|avif";

/// Family of asset references recognised in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// Image URLs appearing anywhere in HTML text.
    Image,
    /// PDF URLs appearing anywhere in HTML text.
    Pdf,
    /// Video URLs (`.webm`) appearing anywhere in HTML text.
    Video,
    /// Image or font URLs wrapped in CSS `url(...)` syntax.
    CssAsset,
}

/// Compiled extraction patterns, built once and shared across all documents.
pub struct Patterns {
    image: Regex,
    pdf: Regex,
    video: Regex,
    css_asset: Regex,
    srcset: Regex,
}

impl Patterns {
    /// Compile the full pattern set.
    pub fn new() -> Self {
        let absolute_url = |extensions: &str| {
            Regex::new(&format!(r#"(?i)https?://[^"'>]+\.(?:{extensions})"#))
                .expect("invalid asset url regex")
        };

        Self {
            image: absolute_url(IMAGE_EXTENSIONS),
            pdf: absolute_url("pdf"),
            video: absolute_url("webm"),
            css_asset: Regex::new(&format!(
                r#"(?i)url\(["']?(https?://[^"')]+\.(?:{IMAGE_EXTENSIONS}|woff|woff2))["']?\)"#
            ))
            .expect("invalid css url regex"),
            srcset: Regex::new(r#"(?i)srcset\s*=\s*"([^"]+)""#).expect("invalid srcset regex"),
        }
    }

    /// Distinct absolute URLs of the given kind found in `content`.
    pub fn extract(&self, content: &str, kind: AssetKind) -> BTreeSet<String> {
        match kind {
            AssetKind::Image => whole_matches(&self.image, content),
            AssetKind::Pdf => whole_matches(&self.pdf, content),
            AssetKind::Video => whole_matches(&self.video, content),
            AssetKind::CssAsset => self
                .css_asset
                .captures_iter(content)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
                .collect(),
        }
    }

    /// Candidate URLs pulled out of every `srcset="..."` attribute value.
    ///
    /// Each comma-separated entry contributes its first whitespace-delimited
    /// token; only tokens starting with `http` are kept. No extension
    /// filtering happens here, matching how srcset entries are resolved
    /// purely by their own extension later on.
    pub fn srcset_candidates(&self, content: &str) -> Vec<String> {
        let mut urls = Vec::new();
        for caps in self.srcset.captures_iter(content) {
            let Some(value) = caps.get(1) else {
                continue;
            };
            for entry in value.as_str().split(',') {
                let Some(candidate) = entry.trim().split_whitespace().next() else {
                    continue;
                };
                if candidate.starts_with("http") {
                    urls.push(candidate.to_string());
                }
            }
        }
        urls
    }
}

impl Default for Patterns {
    fn default() -> Self {
        Self::new()
    }
}

fn whole_matches(pattern: &Regex, content: &str) -> BTreeSet<String> {
    pattern
        .find_iter(content)
        .map(|m| m.as_str().to_string())
        .collect()
}
