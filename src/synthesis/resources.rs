//! Resource sizing
//!
//! Each request sizes from a copy of the archetype's profile; the catalog's
//! definitions are never touched. Escalation rules only raise values.

use crate::archetype::{
    ArchetypeDefinition, ArchetypeId, Cpu, Memory, ResourceProfile, DEFAULT_RESOURCES,
    ML_RESOURCES,
};
use tracing::debug;

/// Repository size (as reported by the provider) above which memory is raised
pub const LARGE_REPOSITORY_SIZE: u64 = 100_000;

/// Runtime dependency count above which CPU is raised
pub const MANY_DEPENDENCIES: usize = 50;

const LARGE_REPOSITORY_MEMORY: (Memory, Memory) = (Memory::mebibytes(256), Memory::gibibytes(1));
const MANY_DEPENDENCIES_CPU: (Cpu, Cpu) = (Cpu::millis(200), Cpu::millis(1000));

/// Archetype profile before any escalation
pub fn base_profile(definition: &ArchetypeDefinition) -> ResourceProfile {
    if definition.id == ArchetypeId::MachineLearning {
        return ML_RESOURCES;
    }
    definition.resources.unwrap_or(DEFAULT_RESOURCES)
}

/// Applies the size and dependency-count rules; order does not matter
pub fn escalate(
    mut profile: ResourceProfile,
    repository_size: u64,
    dependency_count: usize,
) -> ResourceProfile {
    if repository_size > LARGE_REPOSITORY_SIZE {
        debug!("Large repository ({}), raising memory", repository_size);
        let (request, limit) = LARGE_REPOSITORY_MEMORY;
        profile.requests.memory = profile.requests.memory.max(request);
        profile.limits.memory = profile.limits.memory.max(limit);
    }

    if dependency_count > MANY_DEPENDENCIES {
        debug!("{} dependencies, raising CPU", dependency_count);
        let (request, limit) = MANY_DEPENDENCIES_CPU;
        profile.requests.cpu = profile.requests.cpu.max(request);
        profile.limits.cpu = profile.limits.cpu.max(limit);
    }

    profile
}

pub fn size_resources(
    definition: &ArchetypeDefinition,
    repository_size: u64,
    dependency_count: usize,
) -> ResourceProfile {
    escalate(base_profile(definition), repository_size, dependency_count)
}
