//! Content provider over a repository checked out on disk
//!
//! The branch argument is ignored: whatever is checked out is what gets
//! analyzed. Repository size is reported in KiB to match the hosting service.

use super::{ContentEntry, EntryKind, ProviderError, RepositoryContentProvider, RepositoryMetadata};
use crate::fs::{FileSystem, FileType};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

const README_CANDIDATES: &[&str] = &["README.md", "README", "readme.md", "README.rst", "README.txt"];
const SKIPPED_DIRS: &[&str] = &[".git", ".hg", ".svn"];

pub struct LocalRepositoryProvider<F: FileSystem> {
    fs: Arc<F>,
    root: PathBuf,
}

impl<F: FileSystem> LocalRepositoryProvider<F> {
    pub fn new(fs: F, root: impl Into<PathBuf>) -> Self {
        Self {
            fs: Arc::new(fs),
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        path.split('/')
            .filter(|part| !part.is_empty())
            .fold(self.root.clone(), |acc, part| acc.join(part))
    }

    fn io_error(path: &str, err: anyhow::Error) -> ProviderError {
        ProviderError::Io(format!("{}: {:#}", path, err))
    }
}

/// Sums file sizes under `root`, skipping VCS metadata directories
fn total_size<F: FileSystem>(fs: &F, root: &Path) -> u64 {
    let mut total = 0u64;
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let Ok(entries) = fs.read_dir(&dir) else {
            continue;
        };
        for entry in entries {
            match entry.file_type {
                FileType::Directory if !SKIPPED_DIRS.contains(&entry.name.as_str()) => {
                    pending.push(entry.path)
                }
                FileType::File => total += fs.metadata(&entry.path).map(|m| m.size).unwrap_or(0),
                _ => {}
            }
        }
    }

    total
}

#[async_trait]
impl<F: FileSystem + 'static> RepositoryContentProvider for LocalRepositoryProvider<F> {
    async fn fetch_file(
        &self,
        _repository: &str,
        path: &str,
        _branch: &str,
    ) -> Result<Vec<u8>, ProviderError> {
        let full_path = self.resolve(path);
        if !self.fs.exists(&full_path) || self.fs.is_dir(&full_path) {
            return Err(ProviderError::NotFound(path.to_string()));
        }
        self.fs.read(&full_path).map_err(|e| Self::io_error(path, e))
    }

    async fn list_directory(
        &self,
        _repository: &str,
        path: &str,
        _branch: &str,
    ) -> Result<Vec<ContentEntry>, ProviderError> {
        let full_path = self.resolve(path);
        if !self.fs.exists(&full_path) {
            return Err(ProviderError::NotFound(path.to_string()));
        }

        let entries = self
            .fs
            .read_dir(&full_path)
            .map_err(|e| Self::io_error(path, e))?;

        let prefix = path.trim_matches('/');
        let listing = entries
            .into_iter()
            .filter(|entry| !SKIPPED_DIRS.contains(&entry.name.as_str()))
            .map(|entry| {
                let rel_path = if prefix.is_empty() {
                    entry.name.clone()
                } else {
                    format!("{}/{}", prefix, entry.name)
                };
                let kind = match entry.file_type {
                    FileType::File => EntryKind::File,
                    FileType::Directory => EntryKind::Dir,
                    FileType::Symlink => EntryKind::Other,
                };
                let size = match kind {
                    EntryKind::File => self.fs.metadata(&entry.path).map(|m| m.size).unwrap_or(0),
                    _ => 0,
                };
                ContentEntry {
                    name: entry.name,
                    path: rel_path,
                    kind,
                    size,
                }
            })
            .collect();

        Ok(listing)
    }

    async fn fetch_readme(&self, _repository: &str) -> Result<String, ProviderError> {
        for candidate in README_CANDIDATES {
            let path = self.root.join(candidate);
            if self.fs.exists(&path) && !self.fs.is_dir(&path) {
                debug!("Using {} as README", candidate);
                let bytes = self.fs.read(&path).map_err(|e| Self::io_error(candidate, e))?;
                return Ok(String::from_utf8_lossy(&bytes).into_owned());
            }
        }
        Err(ProviderError::NotFound("README".to_string()))
    }

    async fn fetch_metadata(&self, _repository: &str) -> Result<RepositoryMetadata, ProviderError> {
        if !self.fs.is_dir(&self.root) {
            return Err(ProviderError::NotFound(self.root.display().to_string()));
        }

        let fs = Arc::clone(&self.fs);
        let root = self.root.clone();
        let size = tokio::task::spawn_blocking(move || total_size(fs.as_ref(), &root))
            .await
            .map_err(|e| ProviderError::Io(format!("size walk of {}: {}", self.root.display(), e)))?;

        Ok(RepositoryMetadata {
            size: size / 1024,
            language: None,
            topics: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;

    fn provider() -> LocalRepositoryProvider<MockFileSystem> {
        let fs = MockFileSystem::new();
        fs.add_file("package.json", r#"{"dependencies": {"express": "^4"}}"#);
        fs.add_file("src/server.js", "require('express')");
        fs.add_file(".git/HEAD", "ref: refs/heads/main");
        fs.add_file("README.md", "# Demo\n\nRun `npm start`.");
        LocalRepositoryProvider::new(fs, "/mock")
    }

    #[tokio::test]
    async fn test_list_root_skips_vcs_dirs() {
        let listing = provider().list_directory("o/r", "", "main").await.unwrap();
        let names: Vec<&str> = listing.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["README.md", "package.json", "src"]);
    }

    #[tokio::test]
    async fn test_list_nested_paths_are_relative() {
        let listing = provider().list_directory("o/r", "src", "main").await.unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].path, "src/server.js");
        assert_eq!(listing[0].kind, EntryKind::File);
        assert_eq!(listing[0].size, "require('express')".len() as u64);
    }

    #[tokio::test]
    async fn test_fetch_missing_file_is_not_found() {
        let err = provider()
            .fetch_file("o/r", "Dockerfile", "main")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_fetch_text() {
        let text = provider()
            .fetch_text("o/r", "src/server.js", "main")
            .await
            .unwrap();
        assert_eq!(text, "require('express')");
    }

    #[tokio::test]
    async fn test_readme() {
        let readme = provider().fetch_readme("o/r").await.unwrap();
        assert!(readme.starts_with("# Demo"));
    }

    #[tokio::test]
    async fn test_metadata_size_in_kib() {
        let fs = MockFileSystem::new();
        fs.add_file("big.bin", &"x".repeat(4096));
        let provider = LocalRepositoryProvider::new(fs, "/mock");

        let metadata = provider.fetch_metadata("o/r").await.unwrap();
        assert_eq!(metadata.size, 4);
        assert!(metadata.language.is_none());
        assert!(metadata.topics.is_empty());
    }

    #[tokio::test]
    async fn test_metadata_size_skips_vcs_dirs() {
        let fs = MockFileSystem::new();
        fs.add_file("src/lib.rs", &"x".repeat(2048));
        fs.add_file("docs/guide.md", &"y".repeat(1024));
        fs.add_file(".git/objects/pack.bin", &"z".repeat(8192));
        let provider = LocalRepositoryProvider::new(fs, "/mock");

        let metadata = provider.fetch_metadata("o/r").await.unwrap();
        assert_eq!(metadata.size, 3);
    }
}
