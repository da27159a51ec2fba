//! # Infrastructure Module
//!
//! Turns an [`AnalysisResult`](crate::analyzer::AnalysisResult) and parsed
//! deployment requirements into a concrete plan: deployment strategy, compute
//! sizing, networking, data services and a static cost estimate.

pub mod decision_engine;
pub mod pricing;
pub mod provider_data;
pub mod sizing;
pub mod types;

pub use decision_engine::{DecisionEngine, decide, fired_rule_from_reasoning};
pub use types::{
    AdditionalService, ComputeResources, CostEstimate, CostItem, DatabaseConfig,
    InfrastructureDecision, NetworkingConfig, ServiceKind, StrategyRule, SubnetPlan,
};
