//! Minimal file-system surface used to serve a local checkout

use anyhow::Result;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    File,
    Directory,
    /// Symlinks and special files; never followed
    Symlink,
}

#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// Size in bytes; zero for directories
    pub size: u64,
    pub file_type: FileType,
}

/// One child of a listed directory
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub path: PathBuf,
    pub name: String,
    pub file_type: FileType,
}

/// Read-only operations [`LocalRepositoryProvider`](crate::provider::LocalRepositoryProvider) performs
pub trait FileSystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Metadata without following symlinks
    fn metadata(&self, path: &Path) -> Result<FileMetadata>;

    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Children of `path`, sorted by name
    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>>;
}
