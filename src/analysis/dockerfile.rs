//! Existing Dockerfile inspection

use crate::provider::RepositoryContentProvider;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DOCKERFILE_PATH: &str = "Dockerfile";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRecipeAnalysis {
    pub has_dockerfile: bool,
    pub base_image: Option<String>,
    pub exposed_ports: Vec<u16>,
    /// Authored by the repository owner; true whenever a Dockerfile exists
    pub custom_dockerfile: bool,
}

impl BuildRecipeAnalysis {
    pub fn absent() -> Self {
        Self::default()
    }
}

/// Scans Dockerfile text for the base image and exposed ports.
///
/// The last `FROM` wins, so multi-stage files report the runtime stage.
/// Scanning stops at the first malformed `EXPOSE`; whatever was collected
/// before it is kept.
pub fn parse_dockerfile(content: &str) -> BuildRecipeAnalysis {
    let mut analysis = BuildRecipeAnalysis {
        has_dockerfile: true,
        custom_dockerfile: true,
        ..Default::default()
    };

    for line in content.lines() {
        let mut tokens = line.split_whitespace();
        let Some(instruction) = tokens.next() else {
            continue;
        };

        if instruction.eq_ignore_ascii_case("FROM") {
            if let Some(image) = tokens.find(|t| !t.starts_with("--")) {
                analysis.base_image = Some(image.to_string());
            }
        } else if instruction.eq_ignore_ascii_case("EXPOSE") {
            match tokens.next().and_then(parse_port) {
                Some(port) => analysis.exposed_ports.push(port),
                None => {
                    debug!("Malformed EXPOSE line {:?}, stopping scan", line.trim());
                    break;
                }
            }
        }
    }

    analysis
}

fn parse_port(token: &str) -> Option<u16> {
    let port = token
        .strip_suffix("/tcp")
        .or_else(|| token.strip_suffix("/udp"))
        .unwrap_or(token);
    port.parse().ok()
}

pub async fn inspect_dockerfile(
    provider: &dyn RepositoryContentProvider,
    repository: &str,
    branch: &str,
) -> BuildRecipeAnalysis {
    match provider.fetch_text(repository, DOCKERFILE_PATH, branch).await {
        Ok(content) => parse_dockerfile(&content),
        Err(e) if e.is_not_found() => {
            debug!("No Dockerfile in {}", repository);
            BuildRecipeAnalysis::absent()
        }
        Err(e) => {
            warn!("Could not read Dockerfile, treating as absent: {}", e);
            BuildRecipeAnalysis::absent()
        }
    }
}
