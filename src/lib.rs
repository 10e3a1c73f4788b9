//! podsmith - repository classification and deployment synthesis
//!
//! podsmith looks at a repository's layout and a handful of well-known files,
//! decides which application archetype it is, and generates everything needed
//! to run it on a Kubernetes/OpenShift cluster: a Deployment, Service and
//! Route, a Dockerfile when the repository lacks one, and a CI workflow that
//! requests redeployment on push.
//!
//! # Core Concepts
//!
//! - **Archetypes**: Registered application shapes with their port, health
//!   path, base image, commands and resource profile
//! - **Content providers**: Read-only access to a repository, either through
//!   the GitHub REST API or a local checkout
//! - **Analysis**: File tree indexing, classification, dependency profiling,
//!   README and Dockerfile inspection
//! - **Synthesis**: Pure generation of manifests from an analysis
//! - **Appliers**: Optional collaborators that apply the generated manifests
//!
//! # Example Usage
//!
//! ```no_run
//! use podsmith::{Engine, PodsmithConfig, PredictionRequest};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PodsmithConfig::default();
//! let provider = Arc::new(config.github_provider()?);
//! let engine = Engine::from_config(provider, &config);
//!
//! let response = engine.predict(&PredictionRequest::new("acme/shop")).await;
//! println!("{}", serde_json::to_string_pretty(&response)?);
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`archetype`]: Archetype ids, definitions and the catalog
//! - [`provider`]: Repository content providers
//! - [`analysis`]: Repository analysis and classification
//! - [`synthesis`]: Manifest, Dockerfile and workflow generation
//! - [`apply`]: Manifest application
//! - [`engine`]: Request handling and batch envelopes

pub mod analysis;
pub mod apply;
pub mod archetype;
pub mod cli;
pub mod config;
pub mod engine;
pub mod fs;
pub mod provider;
pub mod recommendations;
pub mod synthesis;
pub mod util;

pub use analysis::{AnalysisError, AnalysisResult, RepositoryAnalyzer};
pub use apply::{DeploymentOutcome, OrchestrationApplier};
pub use archetype::{ArchetypeCatalog, ArchetypeDefinition, ArchetypeId};
pub use config::{ConfigError, PodsmithConfig};
pub use engine::{BatchRequest, BatchResponse, Engine, PredictionRequest, PredictionResponse, ServiceError};
pub use provider::{GitHubProvider, LocalRepositoryProvider, RepositoryContentProvider};
pub use synthesis::{synthesize, DeploymentConfig, SynthesisError, SynthesisOptions};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
