use super::{manifest_identity, AppliedResource, ApplyError, OrchestrationApplier};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

/// In-memory applier that records what it was asked to do.
///
/// Useful for dry runs and for tests that assert on apply order. Built with
/// [`RecordingApplier::failing_on`], it rejects every manifest of one kind.
#[derive(Default)]
pub struct RecordingApplier {
    namespaces: Mutex<Vec<String>>,
    applied: Mutex<Vec<(String, serde_json::Value)>>,
    fail_kind: Option<String>,
}

impl RecordingApplier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(kind: impl Into<String>) -> Self {
        Self {
            fail_kind: Some(kind.into()),
            ..Self::default()
        }
    }

    pub fn namespaces(&self) -> Vec<String> {
        lock(&self.namespaces).clone()
    }

    /// `(namespace, manifest)` pairs in apply order
    pub fn applied(&self) -> Vec<(String, serde_json::Value)> {
        lock(&self.applied).clone()
    }

    pub fn applied_kinds(&self) -> Vec<String> {
        lock(&self.applied)
            .iter()
            .filter_map(|(_, manifest)| manifest_identity(manifest).ok().map(|(kind, _)| kind))
            .collect()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl OrchestrationApplier for RecordingApplier {
    fn name(&self) -> &str {
        "recording"
    }

    async fn ensure_namespace(&self, namespace: &str) -> Result<(), ApplyError> {
        let mut namespaces = lock(&self.namespaces);
        if !namespaces.iter().any(|ns| ns == namespace) {
            namespaces.push(namespace.to_string());
        }
        Ok(())
    }

    async fn apply(
        &self,
        namespace: &str,
        manifest: &serde_json::Value,
    ) -> Result<AppliedResource, ApplyError> {
        let (kind, name) = manifest_identity(manifest)?;

        if self.fail_kind.as_deref() == Some(kind.as_str()) {
            return Err(ApplyError::Resource {
                kind,
                name,
                message: "rejected by recording applier".to_string(),
            });
        }

        lock(&self.applied).push((namespace.to_string(), manifest.clone()));
        Ok(AppliedResource {
            kind,
            name,
            namespace: namespace.to_string(),
            location: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_in_order() {
        let applier = RecordingApplier::new();
        applier.ensure_namespace("web").await.unwrap();
        applier.ensure_namespace("web").await.unwrap();

        for kind in ["Deployment", "Service"] {
            let manifest = serde_json::json!({"kind": kind, "metadata": {"name": "shop"}});
            let applied = applier.apply("web", &manifest).await.unwrap();
            assert_eq!(applied.kind, kind);
            assert_eq!(applied.namespace, "web");
        }

        assert_eq!(applier.namespaces(), vec!["web"]);
        assert_eq!(applier.applied_kinds(), vec!["Deployment", "Service"]);
        assert_eq!(applier.applied()[0].0, "web");
    }

    #[tokio::test]
    async fn test_failing_kind_is_rejected() {
        let applier = RecordingApplier::failing_on("Route");
        let manifest = serde_json::json!({"kind": "Route", "metadata": {"name": "shop"}});

        let err = applier.apply("web", &manifest).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to apply Route/shop: rejected by recording applier"
        );
        assert!(applier.applied().is_empty());
    }
}
