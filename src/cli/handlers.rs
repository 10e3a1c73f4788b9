//! Subcommand handlers; each returns the process exit code

use super::commands::{ArchetypesArgs, BatchArgs, PredictArgs};
use super::output::{OutputFormat, OutputFormatter};
use crate::apply::DirectoryApplier;
use crate::archetype::ArchetypeCatalog;
use crate::config::PodsmithConfig;
use crate::engine::{BatchRequest, BatchResponse, Engine, PredictionRequest};
use crate::fs::RealFileSystem;
use crate::provider::{LocalRepositoryProvider, RepositoryContentProvider};
use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info};

pub async fn handle_predict(args: &PredictArgs) -> i32 {
    info!("Starting prediction for {}", args.repository);

    let engine = match build_engine(args.local.as_deref(), args.manifest_dir.as_deref()) {
        Ok(engine) => engine,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("\nPlease check your environment variables and command-line arguments.");
            return 1;
        }
    };

    let request = PredictionRequest {
        repository_url: Some(args.repository.clone()),
        branch: args.branch.clone(),
        namespace: args.namespace.clone(),
        deployment_type: args.deployment_type.clone(),
        deploy_immediately: args.deploy,
    };
    debug!("Request: {:?}", request);

    let response = engine.predict(&request).await;
    let formatter = OutputFormatter::new(args.format.into());
    let rendered = match formatter.format_prediction(&response) {
        Ok(rendered) => rendered,
        Err(e) => {
            error!("{:#}", e);
            return 1;
        }
    };

    if let Err(e) = emit(&rendered, args.output.as_deref()) {
        error!("{:#}", e);
        return 1;
    }

    if response.is_success() {
        0
    } else {
        1
    }
}

pub async fn handle_batch(args: &BatchArgs) -> i32 {
    let engine = match build_engine(args.local.as_deref(), args.manifest_dir.as_deref()) {
        Ok(engine) => engine,
        Err(e) => {
            error!("{:#}", e);
            return 1;
        }
    };

    let batch = match read_batch(&args.request_file) {
        Ok(batch) => batch,
        Err(e) => {
            error!("{:#}", e);
            return 1;
        }
    };

    let response = engine.predict_batch(batch).await;
    let rendered = match OutputFormatter::new(OutputFormat::Json).format_batch(&response) {
        Ok(rendered) => rendered,
        Err(e) => {
            error!("{:#}", e);
            return 1;
        }
    };

    if let Err(e) = emit(&rendered, args.output.as_deref()) {
        error!("{:#}", e);
        return 1;
    }

    match response {
        BatchResponse::Predictions { .. } => 0,
        BatchResponse::Error { .. } => 1,
    }
}

pub fn handle_archetypes(args: &ArchetypesArgs) -> i32 {
    let catalog = ArchetypeCatalog::with_defaults();
    match OutputFormatter::new(args.format.into()).format_archetypes(&catalog) {
        Ok(rendered) => {
            println!("{}", rendered);
            0
        }
        Err(e) => {
            error!("{:#}", e);
            1
        }
    }
}

fn build_engine(local: Option<&Path>, manifest_dir: Option<&Path>) -> Result<Engine> {
    let config = PodsmithConfig::default();
    config.validate().context("Invalid configuration")?;
    debug!("Configuration: {}", config);

    let provider: Arc<dyn RepositoryContentProvider> = match local {
        Some(path) => {
            if !path.is_dir() {
                anyhow::bail!("Local repository path is not a directory: {}", path.display());
            }
            info!("Reading repository contents from {}", path.display());
            Arc::new(LocalRepositoryProvider::new(RealFileSystem::new(), path))
        }
        None => Arc::new(
            config
                .github_provider()
                .context("Failed to create GitHub provider")?,
        ),
    };

    let mut engine = Engine::from_config(provider, &config);
    if let Some(dir) = manifest_dir {
        info!("Manifests will be written under {}", dir.display());
        engine = engine.with_applier(Arc::new(DirectoryApplier::new(dir)));
    }
    Ok(engine)
}

fn read_batch(path: &Path) -> Result<BatchRequest> {
    let raw = if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read request from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file {}", path.display()))?
    };

    parse_batch(&raw)
}

fn parse_batch(raw: &str) -> Result<BatchRequest> {
    serde_json::from_str(raw).context("Request body is not a valid instances envelope")
}

fn emit(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            info!("Output written to {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::OutputFormatArg;
    use serial_test::serial;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_parse_batch() {
        let batch = parse_batch(r#"{"instances": [{"repository_url": "acme/shop"}]}"#).unwrap();
        assert_eq!(batch.instances.len(), 1);

        let empty = parse_batch("{}").unwrap();
        assert!(empty.instances.is_empty());

        assert!(parse_batch("[1, 2]").is_err());
    }

    #[test]
    fn test_emit_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        emit("{}", Some(path.as_path())).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[tokio::test]
    #[serial]
    async fn test_predict_from_local_checkout() {
        let repo = TempDir::new().unwrap();
        std::fs::write(repo.path().join("requirements.txt"), "flask==2.0\n").unwrap();
        std::fs::write(repo.path().join("app.py"), "").unwrap();
        let out = TempDir::new().unwrap();
        let output = out.path().join("prediction.json");

        let args = PredictArgs {
            repository: "acme/inventory_api".to_string(),
            local: Some(repo.path().to_path_buf()),
            branch: "main".to_string(),
            namespace: "default".to_string(),
            deployment_type: "auto".to_string(),
            deploy: false,
            manifest_dir: None,
            format: OutputFormatArg::Json,
            output: Some(output.clone()),
        };

        assert_eq!(handle_predict(&args).await, 0);
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(json["analysis"]["application_type"], "python_flask");
        assert_eq!(json["deployment_config"]["app_name"], "inventory-api");
    }

    #[tokio::test]
    #[serial]
    async fn test_missing_local_checkout_fails() {
        let args = PredictArgs {
            repository: "acme/shop".to_string(),
            local: Some(PathBuf::from("/definitely/not/here")),
            branch: "main".to_string(),
            namespace: "default".to_string(),
            deployment_type: "auto".to_string(),
            deploy: false,
            manifest_dir: None,
            format: OutputFormatArg::Json,
            output: None,
        };
        assert_eq!(handle_predict(&args).await, 1);
    }
}
