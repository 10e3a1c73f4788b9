//! Advisory rules evaluated against an analysis
//!
//! Rules are independent; output order is declaration order.

use crate::analysis::AnalysisResult;
use crate::archetype::ArchetypeId;

/// Dependency count above which optimization is suggested
pub const LARGE_DEPENDENCY_COUNT: usize = 100;

pub const ADD_DOCKERFILE: &str = "Consider adding a Dockerfile for consistent deployments";
pub const ADD_SETUP_INSTRUCTIONS: &str =
    "Add setup instructions to README for better maintainability";
pub const UNKNOWN_APPLICATION_TYPE: &str =
    "Could not detect application type - manual configuration may be needed";
pub const TOO_MANY_DEPENDENCIES: &str =
    "Large number of dependencies detected - consider optimization";
pub const ML_ACCELERATORS: &str = "ML workload detected - consider GPU resources for training";

/// Returned in place of analysis-based advice when a request fails
pub const CHECK_REPOSITORY: &str = "Check repository URL and permissions";

struct Rule {
    applies: fn(&AnalysisResult) -> bool,
    message: &'static str,
}

const RULES: &[Rule] = &[
    Rule {
        applies: |a| !a.docker_analysis.has_dockerfile,
        message: ADD_DOCKERFILE,
    },
    Rule {
        applies: |a| !a.documentation.setup_instructions,
        message: ADD_SETUP_INSTRUCTIONS,
    },
    Rule {
        applies: |a| a.application_type.is_generic(),
        message: UNKNOWN_APPLICATION_TYPE,
    },
    Rule {
        applies: |a| a.dependencies.dependency_count() > LARGE_DEPENDENCY_COUNT,
        message: TOO_MANY_DEPENDENCIES,
    },
    Rule {
        applies: |a| a.application_type == ArchetypeId::MachineLearning,
        message: ML_ACCELERATORS,
    },
];

pub fn recommend(analysis: &AnalysisResult) -> Vec<String> {
    RULES
        .iter()
        .filter(|rule| (rule.applies)(analysis))
        .map(|rule| rule.message.to_string())
        .collect()
}
