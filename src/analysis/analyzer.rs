use super::classifier::Classifier;
use super::dependencies::DependencyProfiler;
use super::dockerfile::inspect_dockerfile;
use super::documentation::summarize_documentation;
use super::tree::{FileTreeIndex, MAX_DEPTH};
use super::AnalysisResult;
use crate::archetype::ArchetypeCatalog;
use crate::provider::{ProviderError, RepositoryContentProvider};
use thiserror::Error;
use tracing::{debug, info};

const HOST_PREFIXES: &[&str] = &[
    "https://github.com/",
    "http://github.com/",
    "github.com/",
];

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid repository identifier '{0}': expected owner/name")]
    InvalidRepository(String),

    #[error("Failed to {step} for {repository}: {source}")]
    Provider {
        step: &'static str,
        repository: String,
        #[source]
        source: ProviderError,
    },
}

/// Reduces a repository URL or identifier to `owner/name`
pub fn normalize_repository(input: &str) -> Result<String, AnalysisError> {
    let trimmed = input.trim();
    let without_host = HOST_PREFIXES
        .iter()
        .find_map(|prefix| trimmed.strip_prefix(prefix))
        .unwrap_or(trimmed);
    let path = without_host.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    let segments: Vec<&str> = path.split('/').collect();
    match segments.as_slice() {
        [owner, name] if !owner.is_empty() && !name.is_empty() && !owner.contains(':') => {
            Ok(format!("{}/{}", owner, name))
        }
        _ => Err(AnalysisError::InvalidRepository(input.to_string())),
    }
}

/// Top-level repository analysis.
///
/// Metadata and the root listing are required; their failures abort the
/// analysis. Dependency profiling, README summary and Dockerfile inspection
/// degrade to empty defaults on their own.
pub struct RepositoryAnalyzer<'a> {
    provider: &'a dyn RepositoryContentProvider,
    catalog: &'a ArchetypeCatalog,
    max_depth: usize,
}

impl<'a> RepositoryAnalyzer<'a> {
    pub fn new(provider: &'a dyn RepositoryContentProvider, catalog: &'a ArchetypeCatalog) -> Self {
        Self {
            provider,
            catalog,
            max_depth: MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub async fn analyze(
        &self,
        repository_url: &str,
        branch: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        let repository = normalize_repository(repository_url)?;
        info!("Analyzing {} at {}", repository, branch);

        let provider_error = |step: &'static str| {
            let repository = repository.clone();
            move |source| AnalysisError::Provider {
                step,
                repository,
                source,
            }
        };

        let metadata = self
            .provider
            .fetch_metadata(&repository)
            .await
            .map_err(provider_error("fetch repository metadata"))?;

        let root_listing = self
            .provider
            .list_directory(&repository, "", branch)
            .await
            .map_err(provider_error("list repository root"))?;

        let file_structure = FileTreeIndex::new(self.provider, &repository, branch)
            .with_max_depth(self.max_depth)
            .build(root_listing)
            .await;

        let application_type = Classifier::new(self.catalog).classify(&file_structure.flatten());
        debug!("Classified {} as {}", repository, application_type);

        let profiler = DependencyProfiler::new(self.provider, &repository, branch);
        let (dependencies, documentation, docker_analysis) = tokio::join!(
            profiler.profile(&application_type),
            summarize_documentation(self.provider, &repository),
            inspect_dockerfile(self.provider, &repository, branch),
        );

        info!(
            "Analysis of {} complete: {} ({} dependencies)",
            repository,
            application_type,
            dependencies.dependency_count()
        );

        Ok(AnalysisResult {
            repository,
            branch: branch.to_string(),
            application_type,
            file_structure,
            dependencies,
            documentation,
            docker_analysis,
            size: metadata.size,
            language: metadata.language,
            topics: metadata.topics,
        })
    }
}
