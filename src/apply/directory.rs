//! Writes manifests to disk, one YAML file per resource
//!
//! Layout: `{root}/{namespace}/{kind}-{name}.yaml`, ready for
//! `kubectl apply -f {root}/{namespace}`.

use super::{manifest_identity, AppliedResource, ApplyError, OrchestrationApplier};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

pub struct DirectoryApplier {
    root: PathBuf,
}

impl DirectoryApplier {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `namespace` must be one plain path component so writes stay under the root
    fn namespace_dir(&self, namespace: &str) -> Result<PathBuf, ApplyError> {
        let mut components = Path::new(namespace).components();
        let single = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single || namespace.contains(['/', '\\']) {
            return Err(ApplyError::Namespace {
                namespace: namespace.to_string(),
                message: "not a single directory name".to_string(),
            });
        }
        Ok(self.root.join(namespace))
    }
}

#[async_trait]
impl OrchestrationApplier for DirectoryApplier {
    fn name(&self) -> &str {
        "directory"
    }

    async fn ensure_namespace(&self, namespace: &str) -> Result<(), ApplyError> {
        let dir = self.namespace_dir(namespace)?;
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| ApplyError::Namespace {
                namespace: namespace.to_string(),
                message: format!("{}: {}", dir.display(), e),
            })
    }

    async fn apply(
        &self,
        namespace: &str,
        manifest: &serde_json::Value,
    ) -> Result<AppliedResource, ApplyError> {
        let (kind, name) = manifest_identity(manifest)?;
        let dir = self.namespace_dir(namespace)?;
        let yaml =
            serde_yaml::to_string(manifest).map_err(|e| ApplyError::Serialization(e.to_string()))?;

        let path = dir.join(format!("{}-{}.yaml", kind.to_lowercase(), name));

        tokio::fs::write(&path, yaml)
            .await
            .map_err(|e| ApplyError::Resource {
                kind: kind.clone(),
                name: name.clone(),
                message: format!("{}: {}", path.display(), e),
            })?;
        debug!("Wrote {}", path.display());

        Ok(AppliedResource {
            kind,
            name,
            namespace: namespace.to_string(),
            location: Some(path.display().to_string()),
        })
    }
}
