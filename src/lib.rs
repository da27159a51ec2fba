pub mod analyzer;
pub mod cli;
pub mod common;
pub mod config;
pub mod error;
pub mod handlers;
pub mod infrastructure;
pub mod requirements;

// Re-export commonly used types and functions
pub use analyzer::{AnalysisResult, analyze_repository};
pub use error::{AutodeployError, Result};
pub use infrastructure::{InfrastructureDecision, decide};
pub use requirements::{DeploymentRequirements, RequirementParser, RuleBasedParser};

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
