//! Project configuration describing where mirrored assets are stored.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::download::url_extension;

const DEFAULT_CONFIG_FILE: &str = "mirror.config.json";

/// File extensions that are routed into the dedicated fonts folder.
pub const FONT_EXTENSIONS: &[&str] = &["woff", "woff2"];

/// Discoverable project configuration for the asset mirror.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Directory under the project root receiving downloaded assets.
    pub assets_dir: String,
    /// Directory name under the assets directory receiving downloaded fonts.
    pub fonts_dir_name: String,
    /// Per-request timeout for asset downloads, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            assets_dir: "assets".into(),
            fonts_dir_name: "fonts".into(),
            request_timeout_secs: 10,
        }
    }
}

impl MirrorConfig {
    /// Attempt to load configuration from the provided project root.
    ///
    /// When the configuration file does not exist or fails to parse we fall back to
    /// default values so the tool keeps working on unconfigured projects.
    pub fn discover(project_root: &Path) -> Self {
        let candidate = project_root.join(DEFAULT_CONFIG_FILE);
        Self::from_path(&candidate).unwrap_or_default()
    }

    /// Read configuration from a specific JSON file.
    pub fn from_path(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Convert the configuration into an owned layout rooted at `project_root`.
    pub fn into_layout(self, project_root: &Path) -> MirrorLayout {
        let assets_dir = project_root.join(&self.assets_dir);
        let fonts_dir = assets_dir.join(&self.fonts_dir_name);
        MirrorLayout {
            project_root: project_root.to_path_buf(),
            assets_dir,
            fonts_dir,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

/// Resolved filesystem layout passed into every stage of the pipeline.
///
/// Paths are absolute so tests can point a whole run at a temporary directory
/// instead of relying on process-wide globals.
#[derive(Debug, Clone)]
pub struct MirrorLayout {
    /// Root of the tree being scanned; rewritten references are relative to it.
    pub project_root: PathBuf,
    /// Destination for downloaded non-font assets.
    pub assets_dir: PathBuf,
    /// Destination for downloaded `.woff`/`.woff2` files.
    pub fonts_dir: PathBuf,
    /// Timeout applied to each individual download request.
    pub request_timeout: Duration,
}

impl MirrorLayout {
    /// Create the assets and fonts directories when absent.
    pub fn ensure_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.fonts_dir).with_context(|| {
            format!(
                "failed to create assets directory at {}",
                self.fonts_dir.display()
            )
        })
    }

    /// Destination folder for a URL, chosen by the URL path's extension.
    ///
    /// The same rule applies everywhere a URL is resolved, whether it came from
    /// a type-specific pattern or a srcset entry.
    pub fn target_folder(&self, url: &str) -> &Path {
        match url_extension(url) {
            Some(ext) if FONT_EXTENSIONS.contains(&ext.as_str()) => &self.fonts_dir,
            _ => &self.assets_dir,
        }
    }

    /// Project-root-relative path for a downloaded file, with forward slashes.
    pub fn relative_reference(&self, local: &Path) -> String {
        let relative = local.strip_prefix(&self.project_root).unwrap_or(local);
        relative.to_string_lossy().replace('\\', "/")
    }

    /// Site-root-absolute reference (leading slash) for a downloaded file.
    pub fn site_reference(&self, local: &Path) -> String {
        format!("/{}", self.relative_reference(local))
    }
}
