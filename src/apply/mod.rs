//! Manifest application
//!
//! Deployment is optional and runs after synthesis has already succeeded, so
//! every failure here is folded into a [`DeploymentOutcome::Failed`] instead of
//! failing the request.

use crate::synthesis::DeploymentConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

pub mod directory;
pub mod recording;

pub use directory::DirectoryApplier;
pub use recording::RecordingApplier;

#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("No orchestration applier configured")]
    NotConfigured,

    #[error("Manifest is missing {0}")]
    InvalidManifest(&'static str),

    #[error("Failed to prepare namespace {namespace}: {message}")]
    Namespace { namespace: String, message: String },

    #[error("Failed to apply {kind}/{name}: {message}")]
    Resource {
        kind: String,
        name: String,
        message: String,
    },

    #[error("Failed to serialize manifest: {0}")]
    Serialization(String),
}

/// Handle for a resource the applier accepted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedResource {
    pub kind: String,
    pub name: String,
    pub namespace: String,
    /// Where the applier put it, when that means anything (a file path, a URL)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Applies structured manifests to a cluster-like target
#[async_trait]
pub trait OrchestrationApplier: Send + Sync {
    fn name(&self) -> &str;

    async fn ensure_namespace(&self, namespace: &str) -> Result<(), ApplyError>;

    async fn apply(
        &self,
        namespace: &str,
        manifest: &serde_json::Value,
    ) -> Result<AppliedResource, ApplyError>;
}

/// Reads `kind` and `metadata.name` out of a manifest
pub fn manifest_identity(manifest: &serde_json::Value) -> Result<(String, String), ApplyError> {
    let kind = manifest
        .get("kind")
        .and_then(|v| v.as_str())
        .ok_or(ApplyError::InvalidManifest("kind"))?;
    let name = manifest
        .pointer("/metadata/name")
        .and_then(|v| v.as_str())
        .ok_or(ApplyError::InvalidManifest("metadata.name"))?;
    Ok((kind.to_string(), name.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DeploymentOutcome {
    Deployed {
        app_name: String,
        namespace: String,
        deployment: AppliedResource,
        service: AppliedResource,
        route: AppliedResource,
        url: String,
    },
    Failed {
        error: String,
    },
}

impl DeploymentOutcome {
    pub fn is_deployed(&self) -> bool {
        matches!(self, DeploymentOutcome::Deployed { .. })
    }
}

/// Public URL the route is expected to answer on
pub fn route_url(app_name: &str, namespace: &str, cluster_domain: &str) -> String {
    format!("https://{}-{}.{}", app_name, namespace, cluster_domain)
}

/// Ensures the namespace, then applies deployment, service and route in order
pub async fn deploy(
    applier: Option<&dyn OrchestrationApplier>,
    config: &DeploymentConfig,
    cluster_domain: &str,
) -> DeploymentOutcome {
    match try_deploy(applier, config, cluster_domain).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Deployment of {} failed: {}", config.app_name, e);
            DeploymentOutcome::Failed {
                error: e.to_string(),
            }
        }
    }
}

async fn try_deploy(
    applier: Option<&dyn OrchestrationApplier>,
    config: &DeploymentConfig,
    cluster_domain: &str,
) -> Result<DeploymentOutcome, ApplyError> {
    let applier = applier.ok_or(ApplyError::NotConfigured)?;
    let namespace = config.namespace.as_str();
    info!(
        "Deploying {} to {} via {}",
        config.app_name,
        namespace,
        applier.name()
    );

    applier.ensure_namespace(namespace).await?;

    let deployment = applier.apply(namespace, &to_manifest(&config.deployment)?).await?;
    let service = applier.apply(namespace, &to_manifest(&config.service)?).await?;
    let route = applier.apply(namespace, &to_manifest(&config.route)?).await?;

    Ok(DeploymentOutcome::Deployed {
        app_name: config.app_name.clone(),
        namespace: namespace.to_string(),
        deployment,
        service,
        route,
        url: route_url(&config.app_name, namespace, cluster_domain),
    })
}

fn to_manifest<T: Serialize>(manifest: &T) -> Result<serde_json::Value, ApplyError> {
    serde_json::to_value(manifest).map_err(|e| ApplyError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisResult;
    use crate::archetype::{ArchetypeCatalog, ArchetypeId};
    use crate::synthesis::{synthesize, SynthesisOptions};

    fn config() -> DeploymentConfig {
        let analysis = AnalysisResult::empty("acme/shop", ArchetypeId::NodeJs);
        synthesize(
            &analysis,
            "web",
            "auto",
            &ArchetypeCatalog::with_defaults(),
            &SynthesisOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_manifest_identity() {
        let manifest = serde_json::json!({"kind": "Service", "metadata": {"name": "shop"}});
        assert_eq!(
            manifest_identity(&manifest).unwrap(),
            ("Service".to_string(), "shop".to_string())
        );

        let err = manifest_identity(&serde_json::json!({"kind": "Service"})).unwrap_err();
        assert!(matches!(err, ApplyError::InvalidManifest("metadata.name")));
    }

    #[tokio::test]
    async fn test_deploy_applies_in_order() {
        let applier = RecordingApplier::new();
        let outcome = deploy(Some(&applier), &config(), "apps.example.com").await;

        match outcome {
            DeploymentOutcome::Deployed {
                url, deployment, ..
            } => {
                assert_eq!(url, "https://shop-web.apps.example.com");
                assert_eq!(deployment.kind, "Deployment");
            }
            other => panic!("expected deployed, got {other:?}"),
        }
        assert_eq!(applier.namespaces(), vec!["web"]);
        assert_eq!(applier.applied_kinds(), vec!["Deployment", "Service", "Route"]);
    }

    #[tokio::test]
    async fn test_deploy_without_applier_fails() {
        let outcome = deploy(None, &config(), "apps.example.com").await;
        assert_eq!(
            outcome,
            DeploymentOutcome::Failed {
                error: "No orchestration applier configured".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_deploy_stops_at_first_failure() {
        let applier = RecordingApplier::failing_on("Service");
        let outcome = deploy(Some(&applier), &config(), "apps.example.com").await;

        assert!(!outcome.is_deployed());
        assert_eq!(applier.applied_kinds(), vec!["Deployment"]);
    }

    #[test]
    fn test_outcome_wire_shape() {
        let failed = serde_json::to_value(DeploymentOutcome::Failed {
            error: "boom".to_string(),
        })
        .unwrap();
        assert_eq!(failed, serde_json::json!({"status": "failed", "error": "boom"}));
    }
}
