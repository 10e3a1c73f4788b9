//! Request entry point
//!
//! The [`Engine`] owns the injected collaborators and turns a
//! [`PredictionRequest`] into a [`PredictionResponse`]. Every failure becomes
//! the uniform error response; nothing here panics or returns `Err` to the
//! caller.

use crate::analysis::{AnalysisError, AnalysisResult, RepositoryAnalyzer};
use crate::apply::{self, OrchestrationApplier};
use crate::archetype::ArchetypeCatalog;
use crate::config::{PodsmithConfig, DEFAULT_CLUSTER_DOMAIN};
use crate::provider::RepositoryContentProvider;
use crate::recommendations::{recommend, CHECK_REPOSITORY};
use crate::synthesis::{synthesize, DeploymentConfig, SynthesisError, SynthesisOptions, AUTO_KIND};
use futures_util::future::join_all;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

pub const NO_INSTANCES: &str = "No instances provided";

/// RFC 1123 label, the form cluster namespaces must take
const NAMESPACE_PATTERN: &str = r"^[a-z0-9]([-a-z0-9]{0,61}[a-z0-9])?$";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_namespace() -> String {
    "default".to_string()
}

fn default_deployment_type() -> String {
    AUTO_KIND.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRequest {
    #[serde(default)]
    pub repository_url: Option<String>,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_deployment_type")]
    pub deployment_type: String,
    #[serde(default)]
    pub deploy_immediately: bool,
}

impl PredictionRequest {
    pub fn new(repository_url: impl Into<String>) -> Self {
        Self {
            repository_url: Some(repository_url.into()),
            branch: default_branch(),
            namespace: default_namespace(),
            deployment_type: default_deployment_type(),
            deploy_immediately: false,
        }
    }

    fn repository_url(&self) -> Result<&str, ServiceError> {
        self.repository_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ServiceError::Validation("repository_url is required".to_string()))
    }

    fn namespace(&self) -> Result<&str, ServiceError> {
        let valid = Regex::new(NAMESPACE_PATTERN)
            .map(|re| re.is_match(&self.namespace))
            .unwrap_or(false);
        if valid {
            Ok(&self.namespace)
        } else {
            Err(ServiceError::Validation(format!(
                "namespace '{}' must be a DNS-1123 label",
                self.namespace
            )))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PredictionResponse {
    Success {
        analysis: Box<AnalysisResult>,
        deployment_config: Box<DeploymentConfig>,
        recommendations: Vec<String>,
    },
    Error {
        error: String,
        recommendations: Vec<String>,
    },
}

impl PredictionResponse {
    pub fn error(err: &ServiceError) -> Self {
        PredictionResponse::Error {
            error: err.to_string(),
            recommendations: vec![CHECK_REPOSITORY.to_string()],
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PredictionResponse::Success { .. })
    }
}

/// `{ "instances": [...] }` as sent by the serving harness
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub instances: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BatchResponse {
    Predictions { predictions: Vec<PredictionResponse> },
    Error { error: String },
}

pub struct Engine {
    provider: Arc<dyn RepositoryContentProvider>,
    applier: Option<Arc<dyn OrchestrationApplier>>,
    catalog: Arc<ArchetypeCatalog>,
    options: SynthesisOptions,
    cluster_domain: String,
}

impl Engine {
    pub fn new(provider: Arc<dyn RepositoryContentProvider>) -> Self {
        Self {
            provider,
            applier: None,
            catalog: Arc::new(ArchetypeCatalog::with_defaults()),
            options: SynthesisOptions::default(),
            cluster_domain: DEFAULT_CLUSTER_DOMAIN.to_string(),
        }
    }

    pub fn from_config(provider: Arc<dyn RepositoryContentProvider>, config: &PodsmithConfig) -> Self {
        Self::new(provider)
            .with_options(config.synthesis_options())
            .with_cluster_domain(config.cluster_domain.clone())
    }

    pub fn with_applier(mut self, applier: Arc<dyn OrchestrationApplier>) -> Self {
        self.applier = Some(applier);
        self
    }

    pub fn with_catalog(mut self, catalog: Arc<ArchetypeCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_options(mut self, options: SynthesisOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_cluster_domain(mut self, cluster_domain: impl Into<String>) -> Self {
        self.cluster_domain = cluster_domain.into();
        self
    }

    pub fn catalog(&self) -> &ArchetypeCatalog {
        &self.catalog
    }

    pub async fn predict(&self, request: &PredictionRequest) -> PredictionResponse {
        match self.try_predict(request).await {
            Ok((analysis, deployment_config)) => {
                let recommendations = recommend(&analysis);
                PredictionResponse::Success {
                    analysis: Box::new(analysis),
                    deployment_config: Box::new(deployment_config),
                    recommendations,
                }
            }
            Err(e) => {
                error!("Prediction failed: {}", e);
                PredictionResponse::error(&e)
            }
        }
    }

    /// Decodes one raw instance, then predicts; decode failures are validation errors
    pub async fn predict_value(&self, instance: serde_json::Value) -> PredictionResponse {
        match serde_json::from_value::<PredictionRequest>(instance) {
            Ok(request) => self.predict(&request).await,
            Err(e) => PredictionResponse::error(&ServiceError::Validation(format!(
                "Invalid request: {}",
                e
            ))),
        }
    }

    /// Handles the `instances` envelope; instances run concurrently, results keep their order
    pub async fn predict_batch(&self, batch: BatchRequest) -> BatchResponse {
        if batch.instances.is_empty() {
            return BatchResponse::Error {
                error: NO_INSTANCES.to_string(),
            };
        }

        info!("Processing {} instance(s)", batch.instances.len());
        let predictions = join_all(
            batch
                .instances
                .into_iter()
                .map(|instance| self.predict_value(instance)),
        )
        .await;

        BatchResponse::Predictions { predictions }
    }

    async fn try_predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<(AnalysisResult, DeploymentConfig), ServiceError> {
        let repository_url = request.repository_url()?;
        let namespace = request.namespace()?;

        let analysis = RepositoryAnalyzer::new(self.provider.as_ref(), &self.catalog)
            .analyze(repository_url, &request.branch)
            .await?;

        let mut deployment_config = synthesize(
            &analysis,
            namespace,
            &request.deployment_type,
            &self.catalog,
            &self.options,
        )?;

        if request.deploy_immediately {
            let outcome = apply::deploy(
                self.applier.as_deref(),
                &deployment_config,
                &self.cluster_domain,
            )
            .await;
            deployment_config.deployment_result = Some(outcome);
        }

        Ok((analysis, deployment_config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::{ArchetypeDefinition, ArchetypeId};
    use crate::fs::MockFileSystem;
    use crate::provider::LocalRepositoryProvider;
    use yare::parameterized;

    fn engine() -> Engine {
        let fs = MockFileSystem::new();
        fs.add_file("package.json", r#"{"dependencies": {"express": "4"}}"#);
        fs.add_file("server.js", "");
        Engine::new(Arc::new(LocalRepositoryProvider::new(fs, "/mock")))
    }

    #[test]
    fn test_request_defaults() {
        let request: PredictionRequest =
            serde_json::from_str(r#"{"repository_url": "acme/shop"}"#).unwrap();
        assert_eq!(request.branch, "main");
        assert_eq!(request.namespace, "default");
        assert_eq!(request.deployment_type, "auto");
        assert!(!request.deploy_immediately);
        assert_eq!(request, PredictionRequest::new("acme/shop"));
    }

    #[tokio::test]
    async fn test_missing_repository_url_is_validation_error() {
        let response = engine().predict_value(serde_json::json!({"branch": "dev"})).await;
        assert_eq!(
            response,
            PredictionResponse::Error {
                error: "repository_url is required".to_string(),
                recommendations: vec![CHECK_REPOSITORY.to_string()],
            }
        );
    }

    #[tokio::test]
    async fn test_success_response_shape() {
        let response = engine().predict(&PredictionRequest::new("acme/shop")).await;
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["status"], "success");
        assert_eq!(json["analysis"]["application_type"], "node_js");
        assert_eq!(json["deployment_config"]["app_name"], "shop");
        assert!(json["deployment_config"].get("deployment_result").is_none());
        assert!(json["recommendations"].is_array());
    }

    #[tokio::test]
    async fn test_deploy_without_applier_reports_failed_substatus() {
        let mut request = PredictionRequest::new("acme/shop");
        request.deploy_immediately = true;

        let json = serde_json::to_value(engine().predict(&request).await).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["deployment_config"]["deployment_result"]["status"], "failed");
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let response = engine().predict_batch(BatchRequest::default()).await;
        assert_eq!(
            serde_json::to_value(response).unwrap(),
            serde_json::json!({"error": NO_INSTANCES})
        );
    }

    #[tokio::test]
    async fn test_batch_keeps_order_and_isolates_failures() {
        let batch: BatchRequest = serde_json::from_value(serde_json::json!({
            "instances": [
                {"repository_url": "acme/shop"},
                {"namespace": "web"},
                "not an object"
            ]
        }))
        .unwrap();

        let BatchResponse::Predictions { predictions } = engine().predict_batch(batch).await else {
            panic!("expected predictions");
        };
        assert_eq!(predictions.len(), 3);
        assert!(predictions[0].is_success());
        assert!(!predictions[1].is_success());
        assert!(!predictions[2].is_success());
    }

    #[parameterized(
        default = { "default" },
        single_char = { "a" },
        hyphenated = { "team-web-2" },
        max_length = { "a23456789012345678901234567890123456789012345678901234567890123" },
    )]
    fn test_namespace_accepts_dns_labels(namespace: &str) {
        let mut request = PredictionRequest::new("acme/shop");
        request.namespace = namespace.to_string();
        assert_eq!(request.namespace().unwrap(), namespace);
    }

    #[parameterized(
        empty = { "" },
        uppercase = { "Web" },
        leading_hyphen = { "-web" },
        trailing_hyphen = { "web-" },
        parent_dir = { "../escaped" },
        shell_quote = { "x'; touch /tmp/pwned; echo '" },
        too_long = { "a234567890123456789012345678901234567890123456789012345678901234" },
    )]
    fn test_namespace_rejects_non_labels(namespace: &str) {
        let mut request = PredictionRequest::new("acme/shop");
        request.namespace = namespace.to_string();
        assert!(matches!(request.namespace(), Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_invalid_namespace_is_error_response() {
        let mut request = PredictionRequest::new("acme/shop");
        request.namespace = "x'; touch /tmp/pwned; echo '".to_string();
        request.deploy_immediately = true;

        let response = engine().predict(&request).await;
        assert_eq!(
            response,
            PredictionResponse::Error {
                error: "namespace 'x'; touch /tmp/pwned; echo '' must be a DNS-1123 label"
                    .to_string(),
                recommendations: vec![CHECK_REPOSITORY.to_string()],
            }
        );
    }

    #[tokio::test]
    async fn test_custom_catalog_drives_classification() {
        let go = ArchetypeCatalog::with_defaults()
            .lookup(&ArchetypeId::Go)
            .cloned()
            .unwrap();
        let catalog = ArchetypeCatalog::new(vec![ArchetypeDefinition { port: 9090, ..go }]);
        let engine = engine().with_catalog(Arc::new(catalog));
        assert_eq!(engine.catalog().len(), 1);

        let json = serde_json::to_value(engine.predict(&PredictionRequest::new("acme/shop")).await)
            .unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["analysis"]["application_type"], "generic");
        assert_eq!(json["deployment_config"]["application_type"], "go");
        assert_eq!(
            json["deployment_config"]["deployment"]["spec"]["template"]["spec"]["containers"][0]
                ["ports"][0]["containerPort"],
            9090
        );
    }
}
