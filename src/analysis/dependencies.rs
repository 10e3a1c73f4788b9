//! Dependency profiling per archetype
//!
//! Three extraction strategies, chosen by archetype:
//! - manifest JSON (`package.json`): runtime and dev dependency names
//! - line list (`requirements.txt`, else `Pipfile`): names stripped of pins
//! - marker files (`pom.xml`/`build.gradle`, `go.mod`): package manager only
//!
//! A missing or unreadable candidate never fails the analysis; it falls
//! through to the next candidate or to an empty profile.

use crate::archetype::ArchetypeId;
use crate::provider::RepositoryContentProvider;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyProfile {
    pub package_managers: Vec<String>,
    pub dependencies: Vec<String>,
    pub dev_dependencies: Vec<String>,
    /// Reserved; nothing populates it yet
    pub security_vulnerabilities: Vec<String>,
}

impl DependencyProfile {
    pub fn dependency_count(&self) -> usize {
        self.dependencies.len()
    }

    fn manager_only(manager: &str) -> Self {
        Self {
            package_managers: vec![manager.to_string()],
            ..Default::default()
        }
    }
}

/// A manifest file and the package manager it implies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManifestCandidate {
    pub path: &'static str,
    pub manager: &'static str,
}

const fn candidate(path: &'static str, manager: &'static str) -> ManifestCandidate {
    ManifestCandidate { path, manager }
}

const JAVA_MARKERS: &[ManifestCandidate] = &[
    candidate("pom.xml", "maven"),
    candidate("build.gradle", "gradle"),
];
const GO_MARKERS: &[ManifestCandidate] = &[candidate("go.mod", "go-modules")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyStrategy {
    ManifestJson(ManifestCandidate),
    LineList {
        requirements: ManifestCandidate,
        alternate: ManifestCandidate,
    },
    MarkerFiles(&'static [ManifestCandidate]),
    Unsupported,
}

impl DependencyStrategy {
    pub fn for_archetype(id: &ArchetypeId) -> Self {
        match id {
            ArchetypeId::NodeJs | ArchetypeId::React => {
                Self::ManifestJson(candidate("package.json", "npm"))
            }
            ArchetypeId::PythonFlask | ArchetypeId::PythonDjango | ArchetypeId::MachineLearning => {
                Self::LineList {
                    requirements: candidate("requirements.txt", "pip"),
                    alternate: candidate("Pipfile", "pipenv"),
                }
            }
            ArchetypeId::JavaSpring => Self::MarkerFiles(JAVA_MARKERS),
            ArchetypeId::Go => Self::MarkerFiles(GO_MARKERS),
            ArchetypeId::Generic | ArchetypeId::Custom(_) => Self::Unsupported,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PackageManifest {
    #[serde(default)]
    dependencies: BTreeMap<String, serde_json::Value>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: BTreeMap<String, serde_json::Value>,
}

/// Extracts `(dependencies, devDependencies)` names from a package.json body
pub fn parse_package_json(content: &str) -> Result<(Vec<String>, Vec<String>), serde_json::Error> {
    let manifest: PackageManifest = serde_json::from_str(content)?;
    Ok((
        manifest.dependencies.into_keys().collect(),
        manifest.dev_dependencies.into_keys().collect(),
    ))
}

/// Extracts package names from a requirements.txt body.
///
/// Each name is cut at the first version specifier, extras bracket, or
/// environment marker. Blank lines, comments, and pip options are dropped.
pub fn parse_requirements(content: &str) -> Vec<String> {
    let name_re = Regex::new(r"^([^=<>!~;\[\s]+)").expect("valid regex");

    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('-'))
        .filter_map(|line| name_re.captures(line))
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

pub struct DependencyProfiler<'a> {
    provider: &'a dyn RepositoryContentProvider,
    repository: &'a str,
    branch: &'a str,
}

impl<'a> DependencyProfiler<'a> {
    pub fn new(
        provider: &'a dyn RepositoryContentProvider,
        repository: &'a str,
        branch: &'a str,
    ) -> Self {
        Self {
            provider,
            repository,
            branch,
        }
    }

    pub async fn profile(&self, archetype: &ArchetypeId) -> DependencyProfile {
        match DependencyStrategy::for_archetype(archetype) {
            DependencyStrategy::ManifestJson(manifest) => self.from_manifest_json(manifest).await,
            DependencyStrategy::LineList {
                requirements,
                alternate,
            } => self.from_line_list(requirements, alternate).await,
            DependencyStrategy::MarkerFiles(candidates) => self.from_marker_files(candidates).await,
            DependencyStrategy::Unsupported => {
                debug!("No dependency strategy for archetype {}", archetype);
                DependencyProfile::default()
            }
        }
    }

    async fn read(&self, path: &str) -> Option<String> {
        match self
            .provider
            .fetch_text(self.repository, path, self.branch)
            .await
        {
            Ok(content) => Some(content),
            Err(e) if e.is_not_found() => {
                debug!("{} not present", path);
                None
            }
            Err(e) => {
                warn!("Could not read {}: {}", path, e);
                None
            }
        }
    }

    async fn from_manifest_json(&self, manifest: ManifestCandidate) -> DependencyProfile {
        let Some(content) = self.read(manifest.path).await else {
            warn!("{} unavailable, using empty dependency profile", manifest.path);
            return DependencyProfile::default();
        };

        match parse_package_json(&content) {
            Ok((dependencies, dev_dependencies)) => DependencyProfile {
                package_managers: vec![manifest.manager.to_string()],
                dependencies,
                dev_dependencies,
                security_vulnerabilities: Vec::new(),
            },
            Err(e) => {
                warn!(
                    "Malformed {}: {}, using empty dependency profile",
                    manifest.path, e
                );
                DependencyProfile::default()
            }
        }
    }

    async fn from_line_list(
        &self,
        requirements: ManifestCandidate,
        alternate: ManifestCandidate,
    ) -> DependencyProfile {
        if let Some(content) = self.read(requirements.path).await {
            return DependencyProfile {
                dependencies: parse_requirements(&content),
                ..DependencyProfile::manager_only(requirements.manager)
            };
        }

        if self.read(alternate.path).await.is_some() {
            debug!("Falling back to {}", alternate.path);
            return DependencyProfile::manager_only(alternate.manager);
        }

        DependencyProfile::default()
    }

    async fn from_marker_files(&self, candidates: &[ManifestCandidate]) -> DependencyProfile {
        for candidate in candidates {
            if self.read(candidate.path).await.is_some() {
                return DependencyProfile::manager_only(candidate.manager);
            }
        }
        DependencyProfile::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use crate::provider::LocalRepositoryProvider;

    async fn profile(fs: MockFileSystem, archetype: ArchetypeId) -> DependencyProfile {
        let provider = LocalRepositoryProvider::new(fs, "/mock");
        DependencyProfiler::new(&provider, "o/r", "main")
            .profile(&archetype)
            .await
    }

    #[test]
    fn test_parse_package_json() {
        let (deps, dev) = parse_package_json(
            r#"{
                "name": "demo",
                "dependencies": {"express": "^4.18.0", "cors": "2.8.5"},
                "devDependencies": {"jest": "^29"}
            }"#,
        )
        .unwrap();
        assert_eq!(deps, vec!["cors", "express"]);
        assert_eq!(dev, vec!["jest"]);
    }

    #[test]
    fn test_parse_package_json_without_dependency_maps() {
        let (deps, dev) = parse_package_json(r#"{"name": "bare"}"#).unwrap();
        assert!(deps.is_empty());
        assert!(dev.is_empty());
    }

    #[test]
    fn test_parse_requirements_strips_pins() {
        let deps = parse_requirements(
            "flask==2.3.0\n\n# web\nrequests[security]>=2.31\ngunicorn\nnumpy ~= 1.26\n-r base.txt\npywin32; sys_platform == 'win32'\n",
        );
        assert_eq!(deps, vec!["flask", "requests", "gunicorn", "numpy", "pywin32"]);
    }

    #[tokio::test]
    async fn test_node_profile() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "package.json",
            r#"{"dependencies": {"express": "4"}, "devDependencies": {"nodemon": "3"}}"#,
        );

        let profile = profile(fs, ArchetypeId::NodeJs).await;
        assert_eq!(profile.package_managers, vec!["npm"]);
        assert_eq!(profile.dependencies, vec!["express"]);
        assert_eq!(profile.dev_dependencies, vec!["nodemon"]);
        assert!(profile.security_vulnerabilities.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_package_json_degrades_to_empty() {
        let fs = MockFileSystem::new();
        fs.add_file("package.json", "{ not json");

        assert_eq!(
            profile(fs, ArchetypeId::React).await,
            DependencyProfile::default()
        );
    }

    #[tokio::test]
    async fn test_missing_package_json_degrades_to_empty() {
        assert_eq!(
            profile(MockFileSystem::new(), ArchetypeId::NodeJs).await,
            DependencyProfile::default()
        );
    }

    #[tokio::test]
    async fn test_python_requirements() {
        let fs = MockFileSystem::new();
        fs.add_file("requirements.txt", "Django==4.2\npsycopg2-binary\n");

        let profile = profile(fs, ArchetypeId::PythonDjango).await;
        assert_eq!(profile.package_managers, vec!["pip"]);
        assert_eq!(profile.dependencies, vec!["Django", "psycopg2-binary"]);
    }

    #[tokio::test]
    async fn test_python_falls_back_to_pipfile() {
        let fs = MockFileSystem::new();
        fs.add_file("Pipfile", "[packages]\nflask = \"*\"\n");

        let profile = profile(fs, ArchetypeId::PythonFlask).await;
        assert_eq!(profile.package_managers, vec!["pipenv"]);
        assert!(profile.dependencies.is_empty());
    }

    #[tokio::test]
    async fn test_java_prefers_maven_over_gradle() {
        let fs = MockFileSystem::new();
        fs.add_file("pom.xml", "<project/>");
        fs.add_file("build.gradle", "plugins {}");

        let profile = profile(fs, ArchetypeId::JavaSpring).await;
        assert_eq!(profile.package_managers, vec!["maven"]);
    }

    #[tokio::test]
    async fn test_java_gradle_only() {
        let fs = MockFileSystem::new();
        fs.add_file("build.gradle", "plugins {}");

        let profile = profile(fs, ArchetypeId::JavaSpring).await;
        assert_eq!(profile.package_managers, vec!["gradle"]);
        assert!(profile.dependencies.is_empty());
    }

    #[tokio::test]
    async fn test_go_modules() {
        let fs = MockFileSystem::new();
        fs.add_file("go.mod", "module example.com/app\n");

        let profile = profile(fs, ArchetypeId::Go).await;
        assert_eq!(profile.package_managers, vec!["go-modules"]);
    }

    #[tokio::test]
    async fn test_generic_has_no_strategy() {
        let fs = MockFileSystem::new();
        fs.add_file("package.json", r#"{"dependencies": {"a": "1"}}"#);

        assert_eq!(
            profile(fs, ArchetypeId::Generic).await,
            DependencyProfile::default()
        );
    }
}
