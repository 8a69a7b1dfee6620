//! Asset fetching with filename sanitisation and on-disk deduplication.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use reqwest::blocking::Client;

/// Result of resolving a single asset URL against the local mirror.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The asset was fetched over the network and written to disk.
    Downloaded(PathBuf),
    /// A file with the sanitised name already existed; no request was made.
    Reused(PathBuf),
    /// The download failed recoverably; the reference stays untouched.
    Failed,
}

impl FetchOutcome {
    /// Local path of the asset when the URL resolved successfully.
    pub fn local_path(&self) -> Option<&Path> {
        match self {
            FetchOutcome::Downloaded(path) | FetchOutcome::Reused(path) => Some(path),
            FetchOutcome::Failed => None,
        }
    }
}

/// Blocking HTTP downloader writing assets into mirror folders.
pub struct Downloader {
    client: Client,
}

impl Downloader {
    /// Build a client applying `timeout` to every request.
    pub fn new(timeout: std::time::Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }

    /// Download `url` into `target_folder`, skipping when the sanitised
    /// filename is already present.
    ///
    /// Non-200 responses and transport errors are logged and reported as
    /// [`FetchOutcome::Failed`]; only filesystem errors surface as `Err` and
    /// abort the run.
    pub fn fetch(&self, url: &str, target_folder: &Path) -> Result<FetchOutcome> {
        let file_name = sanitized_file_name(url);
        let local_path = target_folder.join(&file_name);

        if local_path.exists() {
            println!("Already exists: {file_name}");
            return Ok(FetchOutcome::Reused(local_path));
        }

        let mut response = match self.client.get(url).send() {
            Ok(response) => response,
            Err(err) => {
                println!("Request failed for {url}: {err}");
                return Ok(FetchOutcome::Failed);
            }
        };

        if response.status() != StatusCode::OK {
            println!(
                "Failed to download (status code {}): {url}",
                response.status().as_u16()
            );
            return Ok(FetchOutcome::Failed);
        }

        // The destination is opened only once the 200 is confirmed, so a
        // rejected request never leaves a file behind.
        let mut file = fs::File::create(&local_path)
            .with_context(|| format!("failed to create {}", local_path.display()))?;
        if let Err(err) = io::copy(&mut response, &mut file) {
            drop(file);
            let _ = fs::remove_file(&local_path);
            println!("Request failed for {url}: {err}");
            return Ok(FetchOutcome::Failed);
        }

        println!("Downloaded: {file_name}");
        Ok(FetchOutcome::Downloaded(local_path))
    }
}

/// Local filename derived from a URL.
///
/// Literal `%20` sequences are stripped from the whole URL first, then the
/// path basename is taken (query string and fragment excluded) and every
/// character outside `[A-Za-z0-9._-]` is removed. Extension case is kept.
pub fn sanitized_file_name(url: &str) -> String {
    let sanitized_url = url.replace("%20", "");
    let base = url_path(&sanitized_url)
        .rsplit('/')
        .next()
        .unwrap_or_default();
    base.replace("%20", "")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect()
}

/// Lowercased extension of the URL path, if any.
pub fn url_extension(url: &str) -> Option<String> {
    let path = url_path(url);
    let (_, ext) = path.rsplit('/').next()?.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_ascii_lowercase())
    }
}

/// Path component of a URL, without scheme, host, query string or fragment.
fn url_path(url: &str) -> &str {
    let after_scheme = match url.find("://") {
        Some(index) => &url[index + 3..],
        None => url,
    };
    let end = after_scheme
        .find(['?', '#'])
        .unwrap_or(after_scheme.len());
    let authority_and_path = &after_scheme[..end];
    match authority_and_path.find('/') {
        Some(index) => &authority_and_path[index..],
        None => "",
    }
}
