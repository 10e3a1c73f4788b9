//! Output formatting for predictions and the archetype catalog
//!
//! JSON and YAML render the wire shapes unchanged; the human format is a
//! summary for terminals.

use anyhow::{Context, Result};

use crate::apply::DeploymentOutcome;
use crate::archetype::ArchetypeCatalog;
use crate::engine::{BatchResponse, PredictionResponse};
use crate::synthesis::resources::base_profile;

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";
const BRANCH: &str = "\u{251C}\u{2500}";
const LAST: &str = "\u{2514}\u{2500}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_prediction(&self, response: &PredictionResponse) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(response)
                .context("Failed to serialize prediction to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(response).context("Failed to serialize prediction to YAML")
            }
            OutputFormat::Human => Ok(self.format_prediction_human(response)),
        }
    }

    /// Batch output is always JSON, matching what the serving harness returns
    pub fn format_batch(&self, response: &BatchResponse) -> Result<String> {
        serde_json::to_string_pretty(response).context("Failed to serialize batch response")
    }

    pub fn format_archetypes(&self, catalog: &ArchetypeCatalog) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let entries: Vec<_> = catalog.all().collect();
                serde_json::to_string_pretty(&entries)
                    .context("Failed to serialize archetypes to JSON")
            }
            OutputFormat::Yaml => {
                let entries: Vec<_> = catalog.all().collect();
                serde_yaml::to_string(&entries).context("Failed to serialize archetypes to YAML")
            }
            OutputFormat::Human => Ok(self.format_archetypes_human(catalog)),
        }
    }

    fn format_prediction_human(&self, response: &PredictionResponse) -> String {
        let mut output = String::new();

        let (analysis, config, recommendations) = match response {
            PredictionResponse::Success {
                analysis,
                deployment_config,
                recommendations,
            } => (analysis, deployment_config, recommendations),
            PredictionResponse::Error {
                error,
                recommendations,
            } => {
                output.push_str("\u{2717} Prediction Failed\n");
                output.push_str(RULE);
                output.push_str("\n\n");
                output.push_str(&format!("Error: {}\n", error));
                push_recommendations(&mut output, recommendations);
                return output;
            }
        };

        output.push_str("\u{2713} Deployment Prediction\n");
        output.push_str(RULE);
        output.push_str("\n\n");

        output.push_str(&format!(
            "Repository:   {} ({})\n",
            analysis.repository, analysis.branch
        ));
        output.push_str(&format!(
            "Archetype:    {} ({})\n",
            analysis.application_type,
            analysis.application_type.label()
        ));
        if config.application_type != analysis.application_type {
            output.push_str(&format!("Synthesized:  {}\n", config.application_type));
        }
        if let Some(language) = &analysis.language {
            output.push_str(&format!("Language:     {}\n", language));
        }
        output.push('\n');

        output.push_str("Analysis:\n");
        output.push_str(&format!(
            "{} Key files:    {}\n",
            BRANCH,
            analysis.file_structure.key_file_count()
        ));
        let deps = &analysis.dependencies;
        let managers = if deps.package_managers.is_empty() {
            "(none detected)".to_string()
        } else {
            deps.package_managers.join(", ")
        };
        output.push_str(&format!(
            "{} Dependencies: {} runtime, {} dev via {}\n",
            BRANCH,
            deps.dependencies.len(),
            deps.dev_dependencies.len(),
            managers
        ));
        let docker = &analysis.docker_analysis;
        let dockerfile = match (&docker.base_image, docker.has_dockerfile) {
            (Some(image), true) => format!("present (FROM {})", image),
            (None, true) => "present".to_string(),
            (_, false) => "missing (one was generated)".to_string(),
        };
        output.push_str(&format!("{} Dockerfile:   {}\n", LAST, dockerfile));
        output.push('\n');

        let resources = &config.resources_needed;
        output.push_str(&format!(
            "Deployment {} in namespace {}:\n",
            config.app_name, config.namespace
        ));
        if let Some(container) = config.deployment.spec.template.spec.containers.first() {
            output.push_str(&format!("{} Image:     {}\n", BRANCH, container.image));
        }
        output.push_str(&format!(
            "{} Requests:  cpu {}, memory {}\n",
            BRANCH, resources.requests.cpu, resources.requests.memory
        ));
        output.push_str(&format!(
            "{} Limits:    cpu {}, memory {}\n",
            if config.deployment_result.is_some() { BRANCH } else { LAST },
            resources.limits.cpu,
            resources.limits.memory
        ));
        match &config.deployment_result {
            Some(DeploymentOutcome::Deployed { url, .. }) => {
                output.push_str(&format!("{} Deployed:  {}\n", LAST, url));
            }
            Some(DeploymentOutcome::Failed { error }) => {
                output.push_str(&format!("{} Failed:    {}\n", LAST, error));
            }
            None => {}
        }

        push_recommendations(&mut output, recommendations);
        output
    }

    fn format_archetypes_human(&self, catalog: &ArchetypeCatalog) -> String {
        let mut output = String::new();
        output.push_str("Registered Archetypes\n");
        output.push_str(RULE);
        output.push_str("\n\n");

        for definition in catalog.all() {
            let profile = base_profile(definition);
            output.push_str(&format!(
                "{} ({})\n",
                definition.id,
                definition.id.label()
            ));
            output.push_str(&format!(
                "{} Port/health: {} {}\n",
                BRANCH, definition.port, definition.health_path
            ));
            output.push_str(&format!("{} Base image:  {}\n", BRANCH, definition.base_image));
            output.push_str(&format!(
                "{} Indicators:  {}\n",
                BRANCH,
                definition.indicators.join(", ")
            ));
            output.push_str(&format!(
                "{} Resources:   {}/{} \u{2192} {}/{}\n\n",
                LAST,
                profile.requests.cpu,
                profile.requests.memory,
                profile.limits.cpu,
                profile.limits.memory
            ));
        }

        output
    }
}

fn push_recommendations(output: &mut String, recommendations: &[String]) {
    if recommendations.is_empty() {
        return;
    }
    output.push_str("\nRecommendations:\n");
    for recommendation in recommendations {
        output.push_str(&format!("  - {}\n", recommendation));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisResult;
    use crate::archetype::ArchetypeId;
    use crate::recommendations::recommend;
    use crate::synthesis::{synthesize, SynthesisOptions};

    fn success() -> PredictionResponse {
        let analysis = AnalysisResult::empty("acme/shop", ArchetypeId::NodeJs);
        let config = synthesize(
            &analysis,
            "web",
            "auto",
            &ArchetypeCatalog::with_defaults(),
            &SynthesisOptions::default(),
        )
        .unwrap();
        PredictionResponse::Success {
            recommendations: recommend(&analysis),
            analysis: Box::new(analysis),
            deployment_config: Box::new(config),
        }
    }

    #[test]
    fn test_json_output_is_wire_shape() {
        let output = OutputFormatter::new(OutputFormat::Json)
            .format_prediction(&success())
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["status"], "success");
        assert_eq!(parsed["deployment_config"]["namespace"], "web");
    }

    #[test]
    fn test_yaml_output() {
        let output = OutputFormatter::new(OutputFormat::Yaml)
            .format_prediction(&success())
            .unwrap();
        assert!(output.contains("status: success"));
        assert!(output.contains("kind: Deployment"));
    }

    #[test]
    fn test_human_output() {
        let output = OutputFormatter::new(OutputFormat::Human)
            .format_prediction(&success())
            .unwrap();
        assert!(output.contains("Repository:   acme/shop (main)"));
        assert!(output.contains("Archetype:    node_js (Node.js service)"));
        assert!(output.contains("quay.io/your-org/shop:latest"));
        assert!(output.contains("cpu 100m, memory 128Mi"));
        assert!(output.contains("  - Consider adding a Dockerfile for consistent deployments"));
    }

    #[test]
    fn test_human_error_output() {
        let response = PredictionResponse::Error {
            error: "repository_url is required".to_string(),
            recommendations: vec!["Check repository URL and permissions".to_string()],
        };
        let output = OutputFormatter::new(OutputFormat::Human)
            .format_prediction(&response)
            .unwrap();
        assert!(output.contains("Error: repository_url is required"));
        assert!(output.contains("Check repository URL and permissions"));
    }

    #[test]
    fn test_archetype_listing() {
        let catalog = ArchetypeCatalog::with_defaults();
        let human = OutputFormatter::new(OutputFormat::Human)
            .format_archetypes(&catalog)
            .unwrap();
        assert!(human.contains("machine_learning (Machine learning workload)"));
        assert!(human.contains("500m/1Gi \u{2192} 2000m/4Gi"));

        let json = OutputFormatter::new(OutputFormat::Json)
            .format_archetypes(&catalog)
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), catalog.len());
        assert_eq!(parsed[0]["id"], "node_js");
    }
}
