use crate::provider::RepositoryContentProvider;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const README_EXCERPT_CHARS: usize = 1000;

const SETUP_KEYWORDS: &[&str] = &["install", "setup", "run", "start"];

/// README excerpt plus a rough signal for whether it explains setup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentationSummary {
    pub readme: Option<String>,
    pub has_docs: bool,
    pub setup_instructions: bool,
}

impl DocumentationSummary {
    pub fn from_readme(text: &str) -> Self {
        let excerpt: String = text.chars().take(README_EXCERPT_CHARS).collect();
        let lowered = excerpt.to_lowercase();

        Self {
            has_docs: !excerpt.trim().is_empty(),
            setup_instructions: SETUP_KEYWORDS.iter().any(|kw| lowered.contains(kw)),
            readme: Some(excerpt),
        }
    }
}

pub async fn summarize_documentation(
    provider: &dyn RepositoryContentProvider,
    repository: &str,
) -> DocumentationSummary {
    match provider.fetch_readme(repository).await {
        Ok(text) => DocumentationSummary::from_readme(&text),
        Err(e) if e.is_not_found() => {
            debug!("No README in {}", repository);
            DocumentationSummary::default()
        }
        Err(e) => {
            warn!("Could not fetch README, continuing without docs: {}", e);
            DocumentationSummary::default()
        }
    }
}
