//! File tree traversal collecting the documents to be scanned.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Kind of source document, decided by the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// `.html` files, scanned with the image, PDF and video patterns.
    Html,
    /// `.css` files, scanned with the combined `url(...)` pattern.
    Css,
}

impl DocumentKind {
    /// Classify a path by its extension, case-insensitively.
    pub fn of(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "html" => Some(DocumentKind::Html),
            "css" => Some(DocumentKind::Css),
            _ => None,
        }
    }
}

/// Recursively enumerate every HTML and CSS file under `root`.
///
/// The result is sorted by path. Every document is processed independently,
/// so traversal order never affects the end state; sorting just keeps runs
/// and tests deterministic.
pub fn collect_documents(root: &Path) -> Result<Vec<(PathBuf, DocumentKind)>> {
    let mut documents = Vec::new();
    collect_into(root, &mut documents)?;
    documents.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(documents)
}

fn collect_into(dir: &Path, documents: &mut Vec<(PathBuf, DocumentKind)>) -> Result<()> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read entry in {}", dir.display()))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .with_context(|| format!("failed to stat {}", path.display()))?;

        if file_type.is_dir() {
            collect_into(&path, documents)?;
        } else if file_type.is_file() {
            if let Some(kind) = DocumentKind::of(&path) {
                documents.push((path, kind));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn classifies_extensions_case_insensitively() {
        assert_eq!(DocumentKind::of(Path::new("a/index.HTML")), Some(DocumentKind::Html));
        assert_eq!(DocumentKind::of(Path::new("styles.Css")), Some(DocumentKind::Css));
        assert_eq!(DocumentKind::of(Path::new("pic.png")), None);
        assert_eq!(DocumentKind::of(Path::new("Makefile")), None);
    }

    #[test]
    fn collects_nested_documents_in_sorted_order() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("sub/deeper")).unwrap();
        fs::write(root.join("index.html"), "").unwrap();
        fs::write(root.join("sub/style.css"), "").unwrap();
        fs::write(root.join("sub/deeper/page.HTML"), "").unwrap();
        fs::write(root.join("sub/notes.txt"), "").unwrap();

        let documents = collect_documents(root).unwrap();
        let paths: Vec<_> = documents
            .iter()
            .map(|(path, _)| path.strip_prefix(root).unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(paths, vec![
            "index.html".to_string(),
            "sub/deeper/page.HTML".to_string(),
            "sub/style.css".to_string(),
        ]);
        assert_eq!(documents[0].1, DocumentKind::Html);
        assert_eq!(documents[2].1, DocumentKind::Css);
    }
}
