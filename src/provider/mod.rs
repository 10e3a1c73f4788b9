//! Repository content collaborators
//!
//! The analysis core never talks to a code-hosting service directly. It is
//! handed a [`RepositoryContentProvider`] and asks it for listings, files,
//! README text, and repository metadata. Two implementations ship with the
//! crate: [`GitHubProvider`] for the hosted REST API and
//! [`LocalRepositoryProvider`] for checkouts on disk.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod github;
pub mod local;

pub use github::GitHubProvider;
pub use local::LocalRepositoryProvider;

/// Errors raised by content providers
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl ProviderError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound(_))
    }
}

/// Kind of entry in a directory listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    /// Symlinks, submodules, and anything else that is neither
    #[serde(other)]
    Other,
}

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    /// Path from the repository root, `/`-separated
    pub path: String,
    pub kind: EntryKind,
    #[serde(default)]
    pub size: u64,
}

impl ContentEntry {
    pub fn file(path: &str, size: u64) -> Self {
        Self::new(path, EntryKind::File, size)
    }

    pub fn dir(path: &str) -> Self {
        Self::new(path, EntryKind::Dir, 0)
    }

    fn new(path: &str, kind: EntryKind, size: u64) -> Self {
        let name = path.rsplit('/').next().unwrap_or(path).to_string();
        Self {
            name,
            path: path.to_string(),
            kind,
            size,
        }
    }
}

/// Repository-level facts reported by the hosting service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryMetadata {
    /// Repository size as reported by the provider (KiB for GitHub)
    pub size: u64,
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Read-only access to a repository's contents
///
/// `repository` is always the normalized `owner/name` identifier.
#[async_trait]
pub trait RepositoryContentProvider: Send + Sync {
    async fn fetch_file(
        &self,
        repository: &str,
        path: &str,
        branch: &str,
    ) -> Result<Vec<u8>, ProviderError>;

    /// Lists one directory; `""` is the repository root
    async fn list_directory(
        &self,
        repository: &str,
        path: &str,
        branch: &str,
    ) -> Result<Vec<ContentEntry>, ProviderError>;

    async fn fetch_readme(&self, repository: &str) -> Result<String, ProviderError>;

    async fn fetch_metadata(&self, repository: &str) -> Result<RepositoryMetadata, ProviderError>;

    /// Fetches a file and decodes it as UTF-8
    async fn fetch_text(
        &self,
        repository: &str,
        path: &str,
        branch: &str,
    ) -> Result<String, ProviderError> {
        let bytes = self.fetch_file(repository, path, branch).await?;
        String::from_utf8(bytes).map_err(|e| ProviderError::Decode(format!("{}: {}", path, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_entry_name_from_path() {
        let entry = ContentEntry::file("src/app/server.js", 42);
        assert_eq!(entry.name, "server.js");
        assert_eq!(entry.kind, EntryKind::File);

        let root = ContentEntry::dir("docs");
        assert_eq!(root.name, "docs");
        assert_eq!(root.size, 0);
    }

    #[test]
    fn test_entry_kind_unknown_maps_to_other() {
        let kind: EntryKind = serde_json::from_str("\"submodule\"").unwrap();
        assert_eq!(kind, EntryKind::Other);
        let kind: EntryKind = serde_json::from_str("\"dir\"").unwrap();
        assert_eq!(kind, EntryKind::Dir);
    }
}
