//! Typed workload, network and route manifests
//!
//! Field order is fixed by the struct definitions and label maps are sorted,
//! so rendering the same manifest twice is byte-identical.

use crate::archetype::{ArchetypeDefinition, ResourceProfile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MANAGED_BY: &str = "podsmith";
pub const SERVICE_PORT: u16 = 80;

pub type Labels = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
    pub namespace: String,
    #[serde(default)]
    pub labels: Labels,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: DeploymentSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentSpec {
    pub replicas: u32,
    pub selector: LabelSelector,
    pub template: PodTemplate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelSelector {
    pub match_labels: Labels,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodTemplate {
    pub metadata: TemplateMeta,
    pub spec: PodSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateMeta {
    pub labels: Labels,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodSpec {
    pub containers: Vec<Container>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub name: String,
    pub image: String,
    pub ports: Vec<ContainerPort>,
    pub env: Vec<EnvVar>,
    pub resources: ResourceProfile,
    pub readiness_probe: Probe,
    pub liveness_probe: Probe,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerPort {
    pub container_port: u16,
    pub protocol: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Probe {
    pub http_get: HttpGetAction,
    pub initial_delay_seconds: u32,
    pub period_seconds: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpGetAction {
    pub path: String,
    pub port: u16,
}

impl Probe {
    /// Gates traffic: starts at 10s, checks every 5s
    pub fn readiness(path: &str, port: u16) -> Self {
        Self::http(path, port, 10, 5)
    }

    /// Restarts the container: starts at 30s, checks every 10s
    pub fn liveness(path: &str, port: u16) -> Self {
        Self::http(path, port, 30, 10)
    }

    fn http(path: &str, port: u16, initial_delay_seconds: u32, period_seconds: u32) -> Self {
        Self {
            http_get: HttpGetAction {
                path: path.to_string(),
                port,
            },
            initial_delay_seconds,
            period_seconds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: ServiceSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSpec {
    pub selector: Labels,
    pub ports: Vec<ServicePort>,
    #[serde(rename = "type")]
    pub service_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePort {
    pub port: u16,
    pub target_port: u16,
    pub protocol: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: RouteSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSpec {
    pub to: RouteTarget,
    pub port: RoutePort,
    pub tls: RouteTls,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTarget {
    pub kind: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePort {
    pub target_port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteTls {
    pub termination: String,
    pub insecure_edge_termination_policy: String,
}

fn app_labels(app_name: &str) -> Labels {
    Labels::from([("app".to_string(), app_name.to_string())])
}

fn object_meta(app_name: &str, namespace: &str, labels: Labels) -> ObjectMeta {
    ObjectMeta {
        name: app_name.to_string(),
        namespace: namespace.to_string(),
        labels,
    }
}

pub fn deployment(
    app_name: &str,
    namespace: &str,
    image: &str,
    definition: &ArchetypeDefinition,
    resources: ResourceProfile,
) -> Deployment {
    let mut labels = app_labels(app_name);
    labels.insert("managed-by".to_string(), MANAGED_BY.to_string());
    labels.insert("app-type".to_string(), definition.id.to_string());

    let port = definition.port;
    let container = Container {
        name: app_name.to_string(),
        image: image.to_string(),
        ports: vec![ContainerPort {
            container_port: port,
            protocol: "TCP".to_string(),
        }],
        env: vec![
            EnvVar {
                name: "PORT".to_string(),
                value: port.to_string(),
            },
            EnvVar {
                name: "NODE_ENV".to_string(),
                value: "production".to_string(),
            },
        ],
        resources,
        readiness_probe: Probe::readiness(definition.health_path, port),
        liveness_probe: Probe::liveness(definition.health_path, port),
    };

    Deployment {
        api_version: "apps/v1".to_string(),
        kind: "Deployment".to_string(),
        metadata: object_meta(app_name, namespace, labels),
        spec: DeploymentSpec {
            replicas: 1,
            selector: LabelSelector {
                match_labels: app_labels(app_name),
            },
            template: PodTemplate {
                metadata: TemplateMeta {
                    labels: app_labels(app_name),
                },
                spec: PodSpec {
                    containers: vec![container],
                },
            },
        },
    }
}

pub fn service(app_name: &str, namespace: &str, target_port: u16) -> Service {
    Service {
        api_version: "v1".to_string(),
        kind: "Service".to_string(),
        metadata: object_meta(app_name, namespace, app_labels(app_name)),
        spec: ServiceSpec {
            selector: app_labels(app_name),
            ports: vec![ServicePort {
                port: SERVICE_PORT,
                target_port,
                protocol: "TCP".to_string(),
            }],
            service_type: "ClusterIP".to_string(),
        },
    }
}

pub fn route(app_name: &str, namespace: &str) -> Route {
    Route {
        api_version: "route.openshift.io/v1".to_string(),
        kind: "Route".to_string(),
        metadata: object_meta(app_name, namespace, app_labels(app_name)),
        spec: RouteSpec {
            to: RouteTarget {
                kind: "Service".to_string(),
                name: app_name.to_string(),
            },
            port: RoutePort {
                target_port: SERVICE_PORT,
            },
            tls: RouteTls {
                termination: "edge".to_string(),
                insecure_edge_termination_policy: "Redirect".to_string(),
            },
        },
    }
}
