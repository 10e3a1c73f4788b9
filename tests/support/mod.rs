//! Shared helpers for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use podsmith::fs::MockFileSystem;
use podsmith::provider::{
    ContentEntry, LocalRepositoryProvider, ProviderError, RepositoryContentProvider,
    RepositoryMetadata,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Local provider over an in-memory checkout containing `files`
pub fn mock_repository(files: &[(&str, &str)]) -> LocalRepositoryProvider<MockFileSystem> {
    let fs = MockFileSystem::new();
    for (path, content) in files {
        fs.add_file(path, content);
    }
    LocalRepositoryProvider::new(fs, "/mock")
}

/// In-memory provider with fixed metadata and optional scripted failures
#[derive(Default)]
pub struct ScriptedProvider {
    files: BTreeMap<String, String>,
    metadata: RepositoryMetadata,
    readme: Option<String>,
    fail_metadata: bool,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), content.to_string());
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.metadata.size = size;
        self
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.metadata.language = Some(language.to_string());
        self
    }

    pub fn with_readme(mut self, readme: &str) -> Self {
        self.readme = Some(readme.to_string());
        self
    }

    pub fn failing_metadata(mut self) -> Self {
        self.fail_metadata = true;
        self
    }

    /// Number of provider calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RepositoryContentProvider for ScriptedProvider {
    async fn fetch_file(
        &self,
        _repository: &str,
        path: &str,
        _branch: &str,
    ) -> Result<Vec<u8>, ProviderError> {
        self.record_call();
        self.files
            .get(path)
            .map(|content| content.as_bytes().to_vec())
            .ok_or_else(|| ProviderError::NotFound(path.to_string()))
    }

    async fn list_directory(
        &self,
        _repository: &str,
        path: &str,
        _branch: &str,
    ) -> Result<Vec<ContentEntry>, ProviderError> {
        self.record_call();
        let prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{}/", path)
        };

        let mut entries: Vec<ContentEntry> = Vec::new();
        for (file, content) in &self.files {
            let Some(rest) = file.strip_prefix(&prefix) else {
                continue;
            };
            match rest.split_once('/') {
                Some((dir, _)) => {
                    let dir_path = format!("{}{}", prefix, dir);
                    if !entries.iter().any(|e| e.path == dir_path) {
                        entries.push(ContentEntry::dir(&dir_path));
                    }
                }
                None => entries.push(ContentEntry::file(file, content.len() as u64)),
            }
        }
        Ok(entries)
    }

    async fn fetch_readme(&self, _repository: &str) -> Result<String, ProviderError> {
        self.record_call();
        self.readme
            .clone()
            .ok_or_else(|| ProviderError::NotFound("README".to_string()))
    }

    async fn fetch_metadata(&self, repository: &str) -> Result<RepositoryMetadata, ProviderError> {
        self.record_call();
        if self.fail_metadata {
            return Err(ProviderError::Http {
                status: 403,
                message: format!("access to {} denied", repository),
            });
        }
        Ok(self.metadata.clone())
    }
}
