// Document sources feeding the corpus builder
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// One document as handed over by a source; reading may fail per document
#[derive(Debug)]
pub struct RawDocument {
    pub name: String,
    pub content: Result<String>,
}

impl RawDocument {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: Ok(content.into()),
        }
    }
}

/// Anything that can enumerate recipe documents
pub trait DocumentSource: Send + Sync {
    /// List every document in a stable order. Only a failure to enumerate
    /// the source as a whole is an error; unreadable documents are reported
    /// through `RawDocument::content`.
    fn list_documents(&self) -> Result<Vec<RawDocument>>;
}

/// Recursively discovers `*.md` files under a root directory.
/// The document name is the file stem.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map of document name to path, in file name order
    pub fn discover(&self) -> Result<BTreeMap<String, PathBuf>> {
        if !self.root.is_dir() {
            return Err(Error::Source(format!(
                "Directory not found: {}",
                self.root.display()
            )));
        }

        let mut found: BTreeMap<String, PathBuf> = BTreeMap::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable directory entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }

            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                warn!("Skipping non UTF-8 file name: {}", path.display());
                continue;
            };

            if let Some(previous) = found.get(name) {
                warn!(
                    "Duplicate recipe name {}: keeping {}, ignoring {}",
                    name,
                    previous.display(),
                    path.display()
                );
                continue;
            }
            found.insert(name.to_string(), path.to_path_buf());
        }

        debug!("Discovered {} documents under {:?}", found.len(), self.root);
        Ok(found)
    }
}

impl DocumentSource for DirectorySource {
    fn list_documents(&self) -> Result<Vec<RawDocument>> {
        Ok(self
            .discover()?
            .into_iter()
            .map(|(name, path)| RawDocument {
                name,
                content: std::fs::read_to_string(&path).map_err(Error::from),
            })
            .collect())
    }
}

/// Fixed in-memory documents
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: Vec<(String, String)>,
}

impl MemorySource {
    pub fn new(documents: Vec<(String, String)>) -> Self {
        Self { documents }
    }
}

impl DocumentSource for MemorySource {
    fn list_documents(&self) -> Result<Vec<RawDocument>> {
        Ok(self
            .documents
            .iter()
            .map(|(name, content)| RawDocument::new(name.clone(), content.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_discovers_markdown_recursively() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("meat")).unwrap();
        std::fs::write(dir.path().join("meat/红烧肉.md"), "# 红烧肉").unwrap();
        std::fs::write(dir.path().join("番茄炒蛋.md"), "# 番茄炒蛋").unwrap();
        std::fs::write(dir.path().join("README.txt"), "ignored").unwrap();

        let source = DirectorySource::new(dir.path());
        let docs = source.list_documents().unwrap();
        let names: Vec<_> = docs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["番茄炒蛋", "红烧肉"]);
        assert_eq!(docs[1].content.as_deref().unwrap(), "# 红烧肉");
    }

    #[test]
    fn test_duplicate_stems_keep_first() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("a")).unwrap();
        std::fs::create_dir_all(dir.path().join("b")).unwrap();
        std::fs::write(dir.path().join("a/汤.md"), "# 第一").unwrap();
        std::fs::write(dir.path().join("b/汤.md"), "# 第二").unwrap();

        let docs = DirectorySource::new(dir.path()).list_documents().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content.as_deref().unwrap(), "# 第一");
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempdir().unwrap();
        let source = DirectorySource::new(dir.path().join("nope"));
        assert!(matches!(source.list_documents(), Err(Error::Source(_))));
    }
}
