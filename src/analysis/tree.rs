//! Bounded-depth file tree index
//!
//! The tree is built from provider listings. A subdirectory whose listing
//! fails becomes an [`DirectoryNode::Inaccessible`] marker; the rest of the
//! traversal carries on. Directories below [`MAX_DEPTH`] are not expanded.

use crate::provider::{ContentEntry, EntryKind, RepositoryContentProvider};
use futures_util::future::{join_all, BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub const MAX_DEPTH: usize = 3;

const INACCESSIBLE_MESSAGE: &str = "Cannot access";

/// File-name substrings that mark a file as relevant to deployment decisions
pub const KEY_FILE_PATTERNS: &[&str] = &[
    "package.json",
    "requirements.txt",
    "pom.xml",
    "build.gradle",
    "go.mod",
    "Dockerfile",
    "docker-compose.yml",
    "kubernetes.yaml",
    "deployment.yaml",
    ".github",
    "README.md",
    "app.py",
    "main.py",
    "server.js",
    "app.js",
    "index.js",
    "manage.py",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFile {
    pub name: String,
    pub path: String,
    pub size: u64,
}

/// One directory level of the repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStructureNode {
    pub files: Vec<String>,
    pub directories: BTreeMap<String, DirectoryNode>,
    pub key_files: Vec<KeyFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DirectoryNode {
    Inaccessible { error: String },
    Tree(FileStructureNode),
}

impl FileStructureNode {
    /// Every file name in the tree, this level first
    pub fn flatten(&self) -> Vec<String> {
        let mut files = Vec::new();
        self.collect_files(&mut files);
        files
    }

    fn collect_files(&self, out: &mut Vec<String>) {
        out.extend(self.files.iter().cloned());
        for child in self.directories.values() {
            if let DirectoryNode::Tree(node) = child {
                node.collect_files(out);
            }
        }
    }

    pub fn key_file_count(&self) -> usize {
        self.key_files.len()
            + self
                .directories
                .values()
                .map(|child| match child {
                    DirectoryNode::Tree(node) => node.key_file_count(),
                    DirectoryNode::Inaccessible { .. } => 0,
                })
                .sum::<usize>()
    }
}

pub fn is_key_file(name: &str) -> bool {
    let name = name.to_lowercase();
    KEY_FILE_PATTERNS
        .iter()
        .any(|pattern| name.contains(&pattern.to_lowercase()))
}

/// Builds a [`FileStructureNode`] by walking provider listings
pub struct FileTreeIndex<'a> {
    provider: &'a dyn RepositoryContentProvider,
    repository: &'a str,
    branch: &'a str,
    max_depth: usize,
}

impl<'a> FileTreeIndex<'a> {
    pub fn new(
        provider: &'a dyn RepositoryContentProvider,
        repository: &'a str,
        branch: &'a str,
    ) -> Self {
        Self {
            provider,
            repository,
            branch,
            max_depth: MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Builds the tree from an already-fetched root listing
    pub async fn build(&self, root_listing: Vec<ContentEntry>) -> FileStructureNode {
        self.build_node(root_listing, 0).await
    }

    fn build_node(
        &self,
        entries: Vec<ContentEntry>,
        depth: usize,
    ) -> BoxFuture<'_, FileStructureNode> {
        async move {
            let mut node = FileStructureNode::default();
            if depth >= self.max_depth {
                return node;
            }

            let expand = depth + 1 < self.max_depth;
            let mut subdirs = Vec::new();

            for entry in entries {
                match entry.kind {
                    EntryKind::File => {
                        if is_key_file(&entry.name) {
                            node.key_files.push(KeyFile {
                                name: entry.name.clone(),
                                path: entry.path.clone(),
                                size: entry.size,
                            });
                        }
                        node.files.push(entry.name);
                    }
                    EntryKind::Dir if expand => subdirs.push(entry),
                    EntryKind::Dir => debug!("Depth cap reached, not expanding {}", entry.path),
                    EntryKind::Other => {}
                }
            }

            let children = join_all(subdirs.into_iter().map(|dir| self.build_subdir(dir, depth)));
            node.directories.extend(children.await);
            node
        }
        .boxed()
    }

    async fn build_subdir(&self, dir: ContentEntry, depth: usize) -> (String, DirectoryNode) {
        let child = match self
            .provider
            .list_directory(self.repository, &dir.path, self.branch)
            .await
        {
            Ok(listing) => DirectoryNode::Tree(self.build_node(listing, depth + 1).await),
            Err(e) => {
                warn!("Cannot list {}: {}", dir.path, e);
                DirectoryNode::Inaccessible {
                    error: INACCESSIBLE_MESSAGE.to_string(),
                }
            }
        };
        (dir.name, child)
    }
}
