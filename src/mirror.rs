//! Orchestrates the scan → download → rewrite pipeline over a project tree.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::MirrorLayout;
use crate::download::{Downloader, FetchOutcome};
use crate::extract::{AssetKind, Patterns};
use crate::walk::{DocumentKind, collect_documents};

/// Tallies describing what a run touched.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MirrorReport {
    /// HTML and CSS files that were read and scanned.
    pub documents_scanned: usize,
    /// Documents whose content changed and were written back.
    pub documents_updated: usize,
    /// Assets fetched over the network.
    pub assets_downloaded: usize,
    /// References resolved against an already-mirrored file.
    pub assets_reused: usize,
    /// References left untouched because their download failed.
    pub failed_downloads: usize,
}

/// Single-pass asset mirror for one project tree.
pub struct AssetMirror {
    layout: MirrorLayout,
    patterns: Patterns,
    downloader: Downloader,
}

impl AssetMirror {
    /// Create a mirror for the given layout.
    pub fn new(layout: MirrorLayout) -> Result<Self> {
        let downloader = Downloader::new(layout.request_timeout)?;
        Ok(Self {
            layout,
            patterns: Patterns::new(),
            downloader,
        })
    }

    /// Walk the project tree, localise every recognised reference and report
    /// what happened.
    ///
    /// Failed downloads are recoverable and leave the original reference in
    /// place; only filesystem errors abort the run.
    pub fn run(&self) -> Result<MirrorReport> {
        self.layout.ensure_directories()?;

        let mut report = MirrorReport::default();
        for (path, kind) in collect_documents(&self.layout.project_root)? {
            report.documents_scanned += 1;
            if self.localize_document(&path, kind, &mut report)? {
                report.documents_updated += 1;
            }
        }
        Ok(report)
    }

    /// Rewrite one document in place. Returns whether it was written back.
    ///
    /// A single content-changed check decides the write, seeded by the srcset
    /// pass, so srcset-only substitutions are persisted too.
    fn localize_document(
        &self,
        path: &Path,
        kind: DocumentKind,
        report: &mut MirrorReport,
    ) -> Result<bool> {
        let original = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut content = original.clone();

        self.apply_srcset_pass(&mut content, report)?;
        for asset_kind in pattern_passes(kind) {
            self.apply_pattern_pass(&mut content, *asset_kind, report)?;
        }

        if content == original {
            return Ok(false);
        }

        fs::write(path, &content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Updated: {}", path.display());
        Ok(true)
    }

    /// Resolve every `srcset` candidate, rewriting successes to the
    /// project-root-relative path without a leading slash.
    fn apply_srcset_pass(&self, content: &mut String, report: &mut MirrorReport) -> Result<()> {
        for url in self.patterns.srcset_candidates(content) {
            if let Some(reference) = self.resolve(&url, report)? {
                *content = content.replace(&url, &reference.relative);
            }
        }
        Ok(())
    }

    /// Resolve every match of one pattern family, rewriting successes to the
    /// site-root-absolute path with a leading slash.
    fn apply_pattern_pass(
        &self,
        content: &mut String,
        kind: AssetKind,
        report: &mut MirrorReport,
    ) -> Result<()> {
        for url in self.patterns.extract(content, kind) {
            if let Some(reference) = self.resolve(&url, report)? {
                *content = content.replace(&url, &reference.site);
            }
        }
        Ok(())
    }

    fn resolve(&self, url: &str, report: &mut MirrorReport) -> Result<Option<LocalReference>> {
        let folder = self.layout.target_folder(url);
        let outcome = self.downloader.fetch(url, folder)?;

        match &outcome {
            FetchOutcome::Downloaded(_) => report.assets_downloaded += 1,
            FetchOutcome::Reused(_) => report.assets_reused += 1,
            FetchOutcome::Failed => report.failed_downloads += 1,
        }

        Ok(outcome.local_path().map(|local| LocalReference {
            relative: self.layout.relative_reference(local),
            site: self.layout.site_reference(local),
        }))
    }
}

/// Both spellings of a resolved local path; srcset rewrites take the relative
/// form, everything else the site-absolute form.
struct LocalReference {
    relative: String,
    site: String,
}

fn pattern_passes(kind: DocumentKind) -> &'static [AssetKind] {
    match kind {
        DocumentKind::Html => &[AssetKind::Image, AssetKind::Pdf, AssetKind::Video],
        DocumentKind::Css => &[AssetKind::CssAsset],
    }
}
