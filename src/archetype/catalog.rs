use super::resources::{Cpu, Memory};
use super::{ArchetypeDefinition, ArchetypeId, ResourceProfile};

/// Fixed resource profile for machine learning workloads
pub const ML_RESOURCES: ResourceProfile = ResourceProfile::new(
    Cpu::millis(500),
    Memory::gibibytes(1),
    Cpu::millis(2000),
    Memory::gibibytes(4),
);

/// Archetype used by synthesis when the classified id is not registered
pub const FALLBACK_ARCHETYPE: ArchetypeId = ArchetypeId::NodeJs;

/// Ordered, immutable registry of archetype definitions.
///
/// Iteration order is registration order; the classifier relies on it to break
/// score ties, so entries must never be reordered casually.
#[derive(Debug, Clone)]
pub struct ArchetypeCatalog {
    entries: Vec<ArchetypeDefinition>,
}

impl ArchetypeCatalog {
    pub fn new(entries: Vec<ArchetypeDefinition>) -> Self {
        Self { entries }
    }

    pub fn with_defaults() -> Self {
        Self::new(vec![
            ArchetypeDefinition {
                id: ArchetypeId::NodeJs,
                indicators: &["package.json", "node_modules", "app.js", "server.js"],
                port: 3000,
                health_path: "/health",
                base_image: "node:18-alpine",
                build_command: "npm install && npm run build",
                start_command: "npm start",
                static_site: false,
                resources: None,
            },
            ArchetypeDefinition {
                id: ArchetypeId::PythonFlask,
                indicators: &["requirements.txt", "app.py", "wsgi.py", "flask"],
                port: 5000,
                health_path: "/health",
                base_image: "python:3.11-slim",
                build_command: "pip install -r requirements.txt",
                start_command: "python app.py",
                static_site: false,
                resources: None,
            },
            ArchetypeDefinition {
                id: ArchetypeId::PythonDjango,
                indicators: &["requirements.txt", "manage.py", "settings.py", "django"],
                port: 8000,
                health_path: "/health/",
                base_image: "python:3.11-slim",
                build_command:
                    "pip install -r requirements.txt && python manage.py collectstatic --noinput",
                start_command: "python manage.py runserver 0.0.0.0:8000",
                static_site: false,
                resources: None,
            },
            ArchetypeDefinition {
                id: ArchetypeId::JavaSpring,
                indicators: &["pom.xml", "build.gradle", "src/main/java", "spring"],
                port: 8080,
                health_path: "/actuator/health",
                base_image: "openjdk:17-jre-slim",
                build_command: "mvn clean package -DskipTests",
                start_command: "java -jar target/*.jar",
                static_site: false,
                resources: None,
            },
            ArchetypeDefinition {
                id: ArchetypeId::Go,
                indicators: &["go.mod", "main.go", "*.go"],
                port: 8080,
                health_path: "/health",
                base_image: "golang:1.21-alpine",
                build_command: "go mod download && go build -o app .",
                start_command: "./app",
                static_site: false,
                resources: None,
            },
            ArchetypeDefinition {
                id: ArchetypeId::React,
                indicators: &["package.json", "src/App.js", "public/index.html", "react"],
                port: 80,
                health_path: "/",
                base_image: "nginx:alpine",
                build_command: "npm install && npm run build",
                start_command: "nginx -g 'daemon off;'",
                static_site: true,
                resources: None,
            },
            ArchetypeDefinition {
                id: ArchetypeId::MachineLearning,
                indicators: &[
                    "requirements.txt",
                    "model.pkl",
                    "*.ipynb",
                    "tensorflow",
                    "pytorch",
                    "scikit-learn",
                ],
                port: 8000,
                health_path: "/health",
                base_image: "python:3.11-slim",
                build_command: "pip install -r requirements.txt",
                start_command: "python serve.py",
                static_site: false,
                resources: Some(ML_RESOURCES),
            },
        ])
    }

    pub fn lookup(&self, id: &ArchetypeId) -> Option<&ArchetypeDefinition> {
        self.entries.iter().find(|def| &def.id == id)
    }

    /// Resolves `id`, falling back to [`FALLBACK_ARCHETYPE`] (or the first entry)
    /// so synthesis always has a definition to work from.
    pub fn resolve(&self, id: &ArchetypeId) -> Option<&ArchetypeDefinition> {
        self.lookup(id)
            .or_else(|| self.lookup(&FALLBACK_ARCHETYPE))
            .or_else(|| self.entries.first())
    }

    pub fn all(&self) -> impl Iterator<Item = &ArchetypeDefinition> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ArchetypeCatalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}
