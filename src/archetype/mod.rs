//! Archetype registry
//!
//! An archetype is a recognized application shape (scripted web backend,
//! compiled service, static frontend, ML workload) together with the deployment
//! defaults used when synthesizing manifests for it. The catalog is built once
//! and shared read-only by every request.

#[macro_use]
pub mod id_enum_macro;

pub mod archetype_id;
pub mod catalog;
pub mod definition;
pub mod resources;

pub use archetype_id::ArchetypeId;
pub use catalog::{ArchetypeCatalog, FALLBACK_ARCHETYPE, ML_RESOURCES};
pub use definition::ArchetypeDefinition;
pub use resources::{Cpu, Memory, ResourceProfile, ResourceQuantities, DEFAULT_RESOURCES};
