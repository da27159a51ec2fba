//! Deployment requirements and the boundary that produces them from text.

pub mod rule_parser;
pub mod types;

pub use rule_parser::RuleBasedParser;
pub use types::{CloudProvider, DeploymentRequirements, DeploymentStrategy, ScalingConfig};

use crate::analyzer::AnalysisResult;
use crate::error::Result;

/// Turns a free-text deployment description into structured requirements.
///
/// Implementations may consult the repository analysis for context, but must
/// leave any field the description does not mention at its default.
pub trait RequirementParser {
    fn parse(&self, description: &str, analysis: &AnalysisResult) -> Result<DeploymentRequirements>;
}
