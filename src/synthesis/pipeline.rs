//! CI workflow that calls back into the prediction endpoint on every push

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const CHECKOUT_ACTION: &str = "actions/checkout@v4";
pub const RUNNER: &str = "ubuntu-latest";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    pub name: String,
    #[serde(rename = "on")]
    pub triggers: Triggers,
    pub jobs: BTreeMap<String, Job>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triggers {
    pub push: PushTrigger,
    /// Always empty; present so the workflow can be run by hand
    pub workflow_dispatch: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushTrigger {
    pub branches: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "runs-on")]
    pub runs_on: String,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<String>,
}

/// Where the workflow sends its prediction request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionEndpoint<'a> {
    /// Name of the repository secret holding the endpoint base URL
    pub secret: &'a str,
    pub model_name: &'a str,
}

pub fn deploy_workflow(app_name: &str, namespace: &str, endpoint: &PredictionEndpoint) -> Workflow {
    let payload = serde_json::json!({
        "instances": [{
            "repository_url": "${{ github.repository }}",
            "branch": "${{ github.ref_name }}",
            "namespace": namespace,
            "deploy_immediately": true,
        }]
    });

    let script = format!(
        "curl -X POST ${{{{ secrets.{secret} }}}}/v1/models/{model}:predict \\\n  \
         -H \"Content-Type: application/json\" \\\n  \
         -d '{payload}'\n",
        secret = endpoint.secret,
        model = endpoint.model_name,
        payload = shell_single_quote(&payload.to_string()),
    );

    let steps = vec![
        Step {
            name: None,
            uses: Some(CHECKOUT_ACTION.to_string()),
            run: None,
        },
        Step {
            name: Some("Request deployment".to_string()),
            uses: None,
            run: Some(script),
        },
    ];

    Workflow {
        name: format!("Deploy {}", app_name),
        triggers: Triggers {
            push: PushTrigger {
                branches: vec!["main".to_string()],
            },
            workflow_dispatch: BTreeMap::new(),
        },
        jobs: BTreeMap::from([(
            "deploy".to_string(),
            Job {
                runs_on: RUNNER.to_string(),
                steps,
            },
        )]),
    }
}

/// Escapes `value` for use inside a single-quoted shell word
fn shell_single_quote(value: &str) -> String {
    value.replace('\'', "'\\''")
}
