//! Deployment configuration synthesis
//!
//! [`synthesize`] is a pure function of the analysis, the request parameters,
//! the catalog and [`SynthesisOptions`]. It reads no environment and performs
//! no I/O; calling it twice with the same inputs renders identical manifests.

pub mod manifests;
pub mod pipeline;
pub mod recipe;
pub mod resources;

pub use manifests::{Deployment, Route, Service};
pub use pipeline::{PredictionEndpoint, Workflow};
pub use recipe::{render_dockerfile, RecipeTemplate};
pub use resources::{size_resources, LARGE_REPOSITORY_SIZE, MANY_DEPENDENCIES};

use crate::analysis::AnalysisResult;
use crate::apply::DeploymentOutcome;
use crate::archetype::{ArchetypeCatalog, ArchetypeId, ResourceProfile};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Requested kind that keeps the classified archetype
pub const AUTO_KIND: &str = "auto";

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Archetype catalog is empty")]
    EmptyCatalog,
}

/// Deployment-environment values that end up inside generated artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisOptions {
    /// Image repository prefix, e.g. `quay.io/your-org`
    pub image_registry: String,
    /// Model name the CI workflow posts predictions to
    pub model_name: String,
    /// Repository secret holding the prediction endpoint URL
    pub endpoint_secret: String,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            image_registry: crate::config::DEFAULT_IMAGE_REGISTRY.to_string(),
            model_name: crate::config::DEFAULT_MODEL_NAME.to_string(),
            endpoint_secret: crate::config::DEFAULT_ENDPOINT_SECRET.to_string(),
        }
    }
}

impl SynthesisOptions {
    pub fn image_for(&self, app_name: &str) -> String {
        format!(
            "{}/{}:latest",
            self.image_registry.trim_end_matches('/'),
            app_name
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    pub app_name: String,
    pub namespace: String,
    /// Archetype the artifacts were generated for
    pub application_type: ArchetypeId,
    pub deployment: Deployment,
    pub service: Service,
    pub route: Route,
    /// Generated only when the repository has no Dockerfile of its own
    pub dockerfile: Option<String>,
    pub github_actions: Workflow,
    pub resources_needed: ResourceProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_result: Option<DeploymentOutcome>,
}

/// Picks the archetype to synthesize for.
///
/// `"auto"` (or blank) keeps the classified id. A registered archetype id
/// overrides it; anything else is ignored with a warning.
pub fn requested_archetype(
    classified: &ArchetypeId,
    requested_kind: &str,
    catalog: &ArchetypeCatalog,
) -> ArchetypeId {
    let requested_kind = requested_kind.trim();
    if requested_kind.is_empty() || requested_kind.eq_ignore_ascii_case(AUTO_KIND) {
        return classified.clone();
    }

    match ArchetypeId::from_id(requested_kind) {
        Some(id) if catalog.lookup(&id).is_some() => {
            debug!("Deployment type {} overrides classified {}", id, classified);
            id
        }
        _ => {
            warn!(
                "Unknown deployment type '{}', keeping {}",
                requested_kind, classified
            );
            classified.clone()
        }
    }
}

pub fn synthesize(
    analysis: &AnalysisResult,
    namespace: &str,
    requested_kind: &str,
    catalog: &ArchetypeCatalog,
    options: &SynthesisOptions,
) -> Result<DeploymentConfig, SynthesisError> {
    let wanted = requested_archetype(&analysis.application_type, requested_kind, catalog);
    let definition = catalog.resolve(&wanted).ok_or(SynthesisError::EmptyCatalog)?;
    if definition.id != wanted {
        debug!("{} is not registered, synthesizing as {}", wanted, definition.id);
    }

    let app_name = analysis.app_name();
    let resources = size_resources(
        definition,
        analysis.size,
        analysis.dependencies.dependency_count(),
    );

    let dockerfile = if analysis.docker_analysis.has_dockerfile {
        None
    } else {
        Some(render_dockerfile(definition))
    };

    let endpoint = PredictionEndpoint {
        secret: &options.endpoint_secret,
        model_name: &options.model_name,
    };

    Ok(DeploymentConfig {
        deployment: manifests::deployment(
            &app_name,
            namespace,
            &options.image_for(&app_name),
            definition,
            resources,
        ),
        service: manifests::service(&app_name, namespace, definition.port),
        route: manifests::route(&app_name, namespace),
        dockerfile,
        github_actions: pipeline::deploy_workflow(&app_name, namespace, &endpoint),
        resources_needed: resources,
        application_type: definition.id.clone(),
        namespace: namespace.to_string(),
        app_name,
        deployment_result: None,
    })
}
