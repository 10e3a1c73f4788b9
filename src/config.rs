//! Configuration management for podsmith
//!
//! Settings are read from environment variables with fallback defaults.
//! Only the CLI and service entry points read the environment; the
//! analysis and synthesis core receives everything through arguments.
//!
//! # Environment Variables
//!
//! - `PODSMITH_GITHUB_TOKEN`: GitHub API token - optional
//! - `PODSMITH_GITHUB_API_URL`: GitHub API base - default: "https://api.github.com"
//! - `PODSMITH_REQUEST_TIMEOUT`: Provider timeout in seconds - default: "30"
//! - `PODSMITH_IMAGE_REGISTRY`: Image repository prefix - default: "quay.io/your-org"
//! - `PODSMITH_CLUSTER_DOMAIN`: Route domain - default: "apps.your-cluster.com"
//! - `PODSMITH_MODEL_NAME`: Model name used by generated workflows - default: "mcp-deployment"
//! - `PODSMITH_ENDPOINT_SECRET`: Secret holding the endpoint URL - default: "MCP_MODEL_ENDPOINT"
//! - `PODSMITH_LOG_LEVEL`: Logging level - default: "info"
//!
//! # Example
//!
//! ```no_run
//! use podsmith::PodsmithConfig;
//!
//! let config = PodsmithConfig::default();
//! config.validate().expect("Invalid configuration");
//! let options = config.synthesis_options();
//! ```

use crate::provider::github::DEFAULT_API_URL;
use crate::provider::GitHubProvider;
use crate::synthesis::SynthesisOptions;
use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_IMAGE_REGISTRY: &str = "quay.io/your-org";
pub const DEFAULT_CLUSTER_DOMAIN: &str = "apps.your-cluster.com";
pub const DEFAULT_MODEL_NAME: &str = "mcp-deployment";
pub const DEFAULT_ENDPOINT_SECRET: &str = "MCP_MODEL_ENDPOINT";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

#[derive(Clone)]
pub struct PodsmithConfig {
    pub github_token: Option<String>,
    pub github_api_url: String,
    pub request_timeout_secs: u64,
    pub image_registry: String,
    pub cluster_domain: String,
    pub model_name: String,
    pub endpoint_secret: String,
    pub log_level: String,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl Default for PodsmithConfig {
    /// Loads `PODSMITH_*` variables, falling back to defaults for anything unset
    fn default() -> Self {
        let github_token = env::var("PODSMITH_GITHUB_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        let request_timeout_secs = env::var("PODSMITH_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        Self {
            github_token,
            github_api_url: env_or("PODSMITH_GITHUB_API_URL", DEFAULT_API_URL),
            request_timeout_secs,
            image_registry: env_or("PODSMITH_IMAGE_REGISTRY", DEFAULT_IMAGE_REGISTRY),
            cluster_domain: env_or("PODSMITH_CLUSTER_DOMAIN", DEFAULT_CLUSTER_DOMAIN),
            model_name: env_or("PODSMITH_MODEL_NAME", DEFAULT_MODEL_NAME),
            endpoint_secret: env_or("PODSMITH_ENDPOINT_SECRET", DEFAULT_ENDPOINT_SECRET),
            log_level: env_or("PODSMITH_LOG_LEVEL", DEFAULT_LOG_LEVEL).to_lowercase(),
        }
    }
}

impl PodsmithConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if self.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
            return Err(ConfigError::ValidationFailed(
                "Request timeout cannot exceed 10 minutes".to_string(),
            ));
        }

        reqwest::Url::parse(&self.github_api_url).map_err(|e| ConfigError::ParseError {
            field: "PODSMITH_GITHUB_API_URL".to_string(),
            error: e.to_string(),
        })?;

        if self.image_registry.trim_matches('/').is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Image registry cannot be empty".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn synthesis_options(&self) -> SynthesisOptions {
        SynthesisOptions {
            image_registry: self.image_registry.clone(),
            model_name: self.model_name.clone(),
            endpoint_secret: self.endpoint_secret.clone(),
        }
    }

    pub fn github_provider(&self) -> Result<GitHubProvider, ConfigError> {
        GitHubProvider::with_timeout(
            &self.github_api_url,
            self.github_token.clone(),
            self.request_timeout(),
        )
        .map_err(|e| ConfigError::ParseError {
            field: "PODSMITH_GITHUB_API_URL".to_string(),
            error: e.to_string(),
        })
    }
}

// Hand-written so the token never reaches logs
impl fmt::Debug for PodsmithConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PodsmithConfig")
            .field("github_token", &self.github_token.as_ref().map(|_| "***"))
            .field("github_api_url", &self.github_api_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("image_registry", &self.image_registry)
            .field("cluster_domain", &self.cluster_domain)
            .field("model_name", &self.model_name)
            .field("endpoint_secret", &self.endpoint_secret)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl fmt::Display for PodsmithConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Podsmith Configuration:")?;
        writeln!(f, "  GitHub API: {}", self.github_api_url)?;
        writeln!(
            f,
            "  GitHub Token: {}",
            if self.github_token.is_some() { "set" } else { "not set" }
        )?;
        writeln!(f, "  Request Timeout: {}s", self.request_timeout_secs)?;
        writeln!(f, "  Image Registry: {}", self.image_registry)?;
        writeln!(f, "  Cluster Domain: {}", self.cluster_domain)?;
        writeln!(f, "  Model Name: {}", self.model_name)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}
