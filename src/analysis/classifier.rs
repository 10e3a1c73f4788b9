//! Indicator-based archetype classification
//!
//! Each archetype scores one point per indicator that appears (case-insensitive
//! substring) in at least one file name. Highest score wins; ties go to the
//! archetype registered first. A zero best score yields [`ArchetypeId::Generic`].
//!
//! Only file names are considered. The repository's declared language and
//! topics are collected by the analyzer but deliberately not scored.

use crate::archetype::{ArchetypeCatalog, ArchetypeDefinition, ArchetypeId};
use serde::Serialize;

/// Score of a single archetype against a file set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchetypeScore {
    pub archetype: ArchetypeId,
    pub score: usize,
}

pub struct Classifier<'a> {
    catalog: &'a ArchetypeCatalog,
}

impl<'a> Classifier<'a> {
    pub fn new(catalog: &'a ArchetypeCatalog) -> Self {
        Self { catalog }
    }

    /// Scores every archetype, in catalog order
    pub fn scores<S: AsRef<str>>(&self, files: &[S]) -> Vec<ArchetypeScore> {
        let lowered: Vec<String> = files.iter().map(|f| f.as_ref().to_lowercase()).collect();

        self.catalog
            .all()
            .map(|def| ArchetypeScore {
                archetype: def.id.clone(),
                score: score_definition(def, &lowered),
            })
            .collect()
    }

    pub fn classify<S: AsRef<str>>(&self, files: &[S]) -> ArchetypeId {
        let mut best: Option<ArchetypeScore> = None;

        for candidate in self.scores(files) {
            // strict comparison keeps the earliest registration on ties
            if best.as_ref().map_or(true, |b| candidate.score > b.score) {
                best = Some(candidate);
            }
        }

        match best {
            Some(best) if best.score > 0 => best.archetype,
            _ => ArchetypeId::Generic,
        }
    }
}

fn score_definition(def: &ArchetypeDefinition, lowered_files: &[String]) -> usize {
    def.indicators
        .iter()
        .filter(|indicator| {
            let needle = indicator.to_lowercase();
            lowered_files.iter().any(|file| file.contains(&needle))
        })
        .count()
}
