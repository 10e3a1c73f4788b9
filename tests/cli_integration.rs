//! CLI integration tests
//!
//! Runs the built binary against local checkouts in temporary directories.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn podsmith() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_podsmith"));
    command.env("PODSMITH_LOG_LEVEL", "error");
    command
}

fn create_flask_repo(dir: &TempDir) -> PathBuf {
    let repo = dir.path().join("inventory_api");
    fs::create_dir_all(&repo).unwrap();
    fs::write(repo.join("requirements.txt"), "flask==3.0.0\ngunicorn>=21\n").unwrap();
    fs::write(repo.join("app.py"), "from flask import Flask\n").unwrap();
    fs::write(repo.join("README.md"), "# Inventory\n\nInstall with pip.\n").unwrap();
    repo
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

fn predict(repo: &Path, extra: &[&str]) -> Output {
    podsmith()
        .args(["predict", "acme/inventory_api", "--local"])
        .arg(repo)
        .args(extra)
        .output()
        .unwrap()
}

#[test]
fn test_cli_help() {
    let output = podsmith().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("predict"));
    assert!(stdout.contains("batch"));
    assert!(stdout.contains("archetypes"));
}

#[test]
fn test_predict_json() {
    let dir = TempDir::new().unwrap();
    let repo = create_flask_repo(&dir);

    let output = predict(&repo, &["--format", "json", "--namespace", "inventory"]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["status"], "success");
    assert_eq!(json["analysis"]["application_type"], "python_flask");
    assert_eq!(
        json["analysis"]["dependencies"]["dependencies"],
        serde_json::json!(["flask", "gunicorn"])
    );
    assert_eq!(json["deployment_config"]["namespace"], "inventory");
    assert_eq!(json["deployment_config"]["app_name"], "inventory-api");
}

#[test]
fn test_predict_human() {
    let dir = TempDir::new().unwrap();
    let repo = create_flask_repo(&dir);

    let output = predict(&repo, &[]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Archetype:    python_flask (Flask service)"));
    assert!(stdout.contains("Consider adding a Dockerfile"));
}

#[test]
fn test_predict_deploy_to_manifest_dir() {
    let dir = TempDir::new().unwrap();
    let repo = create_flask_repo(&dir);
    let manifests = dir.path().join("manifests");

    let output = predict(
        &repo,
        &[
            "--format",
            "yaml",
            "--namespace",
            "staging",
            "--deploy",
            "--manifest-dir",
            manifests.to_str().unwrap(),
        ],
    );
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("status: deployed"));
    assert!(manifests.join("staging/deployment-inventory-api.yaml").exists());
    assert!(manifests.join("staging/service-inventory-api.yaml").exists());
    assert!(manifests.join("staging/route-inventory-api.yaml").exists());
}

#[test]
fn test_predict_output_file() {
    let dir = TempDir::new().unwrap();
    let repo = create_flask_repo(&dir);
    let out = dir.path().join("prediction.json");

    let output = predict(&repo, &["-f", "json", "-o", out.to_str().unwrap()]);
    assert!(output.status.success());
    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(written["status"], "success");
}

#[test]
fn test_invalid_repository_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let repo = create_flask_repo(&dir);

    let output = podsmith()
        .args(["predict", "not-a-repository", "--format", "json", "--local"])
        .arg(&repo)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["status"], "error");
    assert_eq!(
        json["recommendations"],
        serde_json::json!(["Check repository URL and permissions"])
    );
}

#[test]
fn test_batch_from_file() {
    let dir = TempDir::new().unwrap();
    let repo = create_flask_repo(&dir);
    let request = dir.path().join("request.json");
    fs::write(
        &request,
        r#"{"instances": [{"repository_url": "acme/inventory_api"}, {"namespace": "x"}]}"#,
    )
    .unwrap();

    let output = podsmith()
        .arg("batch")
        .arg(&request)
        .arg("--local")
        .arg(&repo)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["predictions"][0]["status"], "success");
    assert_eq!(json["predictions"][1]["status"], "error");
}

#[test]
fn test_empty_batch_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let request = dir.path().join("request.json");
    fs::write(&request, r#"{"instances": []}"#).unwrap();

    let output = podsmith()
        .arg("batch")
        .arg(&request)
        .arg("--local")
        .arg(dir.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stdout_json(&output),
        serde_json::json!({"error": "No instances provided"})
    );
}

#[test]
fn test_archetypes_listing() {
    let output = podsmith()
        .args(["archetypes", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    let ids: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec![
            "node_js",
            "python_flask",
            "python_django",
            "java_spring",
            "go",
            "react",
            "machine_learning"
        ]
    );
}
