//! Repository analysis
//!
//! Turns provider listings and file contents into an [`AnalysisResult`]:
//! a bounded file tree, the classified archetype, and the dependency,
//! README and Dockerfile summaries that synthesis and recommendations
//! consume.

pub mod analyzer;
pub mod classifier;
pub mod dependencies;
pub mod dockerfile;
pub mod documentation;
pub mod tree;

pub use analyzer::{normalize_repository, AnalysisError, RepositoryAnalyzer};
pub use classifier::{ArchetypeScore, Classifier};
pub use dependencies::{DependencyProfile, DependencyProfiler, DependencyStrategy};
pub use dockerfile::{inspect_dockerfile, parse_dockerfile, BuildRecipeAnalysis};
pub use documentation::{summarize_documentation, DocumentationSummary};
pub use tree::{DirectoryNode, FileStructureNode, FileTreeIndex, KeyFile, MAX_DEPTH};

use crate::archetype::ArchetypeId;
use serde::{Deserialize, Serialize};

/// Everything learned about one repository during a single request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Normalized `owner/name`
    pub repository: String,
    pub branch: String,
    pub application_type: ArchetypeId,
    pub file_structure: FileStructureNode,
    pub dependencies: DependencyProfile,
    pub documentation: DocumentationSummary,
    pub docker_analysis: BuildRecipeAnalysis,
    pub size: u64,
    pub language: Option<String>,
    pub topics: Vec<String>,
}

impl AnalysisResult {
    /// A result with no files, metadata or documentation; handy as a base for tests
    pub fn empty(repository: &str, application_type: ArchetypeId) -> Self {
        Self {
            repository: repository.to_string(),
            branch: "main".to_string(),
            application_type,
            file_structure: FileStructureNode::default(),
            dependencies: DependencyProfile::default(),
            documentation: DocumentationSummary::default(),
            docker_analysis: BuildRecipeAnalysis::default(),
            size: 0,
            language: None,
            topics: Vec::new(),
        }
    }

    pub fn app_name(&self) -> String {
        app_name_from_repository(&self.repository)
    }
}

/// Last path segment, lower-cased, underscores replaced with hyphens
pub fn app_name_from_repository(repository: &str) -> String {
    repository
        .rsplit('/')
        .next()
        .unwrap_or(repository)
        .to_lowercase()
        .replace('_', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_name() {
        assert_eq!(app_name_from_repository("acme/Shop_Front"), "shop-front");
        assert_eq!(app_name_from_repository("plain"), "plain");
    }

    #[test]
    fn test_analysis_result_json_field_names() {
        let result = AnalysisResult::empty("acme/api", ArchetypeId::Go);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["application_type"], "go");
        assert_eq!(json["docker_analysis"]["has_dockerfile"], false);
        assert!(json["language"].is_null());
    }
}
