use super::{ArchetypeId, ResourceProfile};
use serde::Serialize;

/// Deployment defaults for one application archetype
#[derive(Debug, Clone, Serialize)]
pub struct ArchetypeDefinition {
    pub id: ArchetypeId,
    /// File-name substrings that count as evidence for this archetype
    pub indicators: &'static [&'static str],
    pub port: u16,
    pub health_path: &'static str,
    pub base_image: &'static str,
    pub build_command: &'static str,
    pub start_command: &'static str,
    /// Built once and served as static files (two-stage image)
    pub static_site: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceProfile>,
}
