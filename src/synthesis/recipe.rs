//! Dockerfile templates for repositories that ship without one

use crate::archetype::{ArchetypeDefinition, ArchetypeId};

/// Image used for the build stage of static-site recipes
pub const STATIC_BUILD_IMAGE: &str = "node:18-alpine";

const RUNTIME_USER: u32 = 1001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeTemplate {
    Node,
    Python,
    StaticSite,
    Generic,
}

impl RecipeTemplate {
    pub fn for_definition(definition: &ArchetypeDefinition) -> Self {
        if definition.static_site {
            return Self::StaticSite;
        }
        match definition.id {
            ArchetypeId::NodeJs => Self::Node,
            ArchetypeId::PythonFlask | ArchetypeId::PythonDjango | ArchetypeId::MachineLearning => {
                Self::Python
            }
            _ => Self::Generic,
        }
    }

    /// Dependency manifest copied before the build step so the layer caches
    fn manifest_copy(self) -> Option<&'static str> {
        match self {
            Self::Node | Self::StaticSite => Some("COPY package*.json ./"),
            Self::Python => Some("COPY requirements.txt ."),
            Self::Generic => None,
        }
    }
}

pub fn render_dockerfile(definition: &ArchetypeDefinition) -> String {
    let template = RecipeTemplate::for_definition(definition);
    let mut lines: Vec<String> = Vec::new();

    match template {
        RecipeTemplate::StaticSite => {
            lines.push(format!("FROM {} AS build", STATIC_BUILD_IMAGE));
            lines.push("WORKDIR /app".to_string());
            lines.extend(template.manifest_copy().map(str::to_string));
            lines.push("COPY . .".to_string());
            lines.push(format!("RUN {}", definition.build_command));
            lines.push(String::new());
            lines.push(format!("FROM {}", definition.base_image));
            lines.push("COPY --from=build /app/build /usr/share/nginx/html".to_string());
            lines.push(format!("EXPOSE {}", definition.port));
        }
        RecipeTemplate::Node | RecipeTemplate::Python => {
            lines.push(format!("FROM {}", definition.base_image));
            lines.push("WORKDIR /app".to_string());
            lines.extend(template.manifest_copy().map(str::to_string));
            lines.push(format!("RUN {}", definition.build_command));
            lines.push("COPY . .".to_string());
            lines.push(format!("EXPOSE {}", definition.port));
            lines.push(format!("USER {}", RUNTIME_USER));
        }
        RecipeTemplate::Generic => {
            lines.push(format!("FROM {}", definition.base_image));
            lines.push("WORKDIR /app".to_string());
            lines.push("COPY . .".to_string());
            lines.push(format!("RUN {}", definition.build_command));
            lines.push(format!("EXPOSE {}", definition.port));
            lines.push(format!("USER {}", RUNTIME_USER));
        }
    }

    lines.push(format!("CMD {}", command_instruction(definition.start_command)));

    let mut rendered = lines.join("\n");
    rendered.push('\n');
    rendered
}

/// Exec form when the command splits cleanly; shell form when it relies on
/// globbing or chaining.
fn command_instruction(command: &str) -> String {
    if command.contains('*') || command.contains("&&") {
        return command.to_string();
    }
    match split_command(command) {
        Some(tokens) if !tokens.is_empty() => {
            let quoted: Vec<String> = tokens
                .iter()
                .map(|t| serde_json::Value::String(t.clone()).to_string())
                .collect();
            format!("[{}]", quoted.join(", "))
        }
        _ => command.to_string(),
    }
}

/// Splits on whitespace, honoring single and double quotes.
/// Returns `None` on an unterminated quote.
fn split_command(command: &str) -> Option<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for c in command.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '\'' || c == '"' => {
                quote = Some(c);
                in_token = true;
            }
            None if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quote.is_some() {
        return None;
    }
    if in_token {
        tokens.push(current);
    }
    Some(tokens)
}
