//! Command-line entry point for the offline asset mirror.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use offline_asset_mirror::{AssetMirror, MirrorConfig};

/// Download externally hosted assets referenced by a tree of HTML/CSS files
/// and rewrite the references to the local copies.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Project root to scan. Defaults to the current directory.
    #[arg(long)]
    root: Option<PathBuf>,

    /// Explicit configuration file instead of `mirror.config.json` discovery.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().context("failed to determine current directory")?,
    };

    let config = match &cli.config {
        Some(path) => MirrorConfig::from_path(path)
            .with_context(|| format!("failed to read configuration at {}", path.display()))?,
        None => MirrorConfig::discover(&root),
    };

    let mirror = AssetMirror::new(config.into_layout(&root))?;
    let report = mirror.run()?;

    println!(
        "All external assets downloaded and references updated! \
         ({} downloaded, {} reused, {} failed, {} files updated)",
        report.assets_downloaded,
        report.assets_reused,
        report.failed_downloads,
        report.documents_updated,
    );
    Ok(())
}
