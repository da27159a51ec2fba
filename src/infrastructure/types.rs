use crate::analyzer::DatabaseType;
use crate::infrastructure::pricing::format_cents;
use crate::requirements::{CloudProvider, DeploymentStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Strategy precedence rules, evaluated in order; the first match wins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyRule {
    #[serde(rename = "rule-1")]
    ExplicitRequest,
    #[serde(rename = "rule-2")]
    SimpleApp,
    #[serde(rename = "rule-3")]
    StatefulApp,
    #[serde(rename = "rule-4")]
    MultiService,
    #[serde(rename = "rule-5")]
    EventDriven,
    #[serde(rename = "rule-6")]
    Fallback,
}

impl StrategyRule {
    pub const ALL: [StrategyRule; 6] = [
        StrategyRule::ExplicitRequest,
        StrategyRule::SimpleApp,
        StrategyRule::StatefulApp,
        StrategyRule::MultiService,
        StrategyRule::EventDriven,
        StrategyRule::Fallback,
    ];

    pub fn number(&self) -> u8 {
        match self {
            StrategyRule::ExplicitRequest => 1,
            StrategyRule::SimpleApp => 2,
            StrategyRule::StatefulApp => 3,
            StrategyRule::MultiService => 4,
            StrategyRule::EventDriven => 5,
            StrategyRule::Fallback => 6,
        }
    }

    pub fn from_number(number: u8) -> Option<StrategyRule> {
        StrategyRule::ALL.into_iter().find(|r| r.number() == number)
    }

    pub fn name(&self) -> &'static str {
        match self {
            StrategyRule::ExplicitRequest => "explicit-request",
            StrategyRule::SimpleApp => "simple-app",
            StrategyRule::StatefulApp => "stateful-app",
            StrategyRule::MultiService => "multi-service",
            StrategyRule::EventDriven => "event-driven",
            StrategyRule::Fallback => "fallback",
        }
    }
}

impl fmt::Display for StrategyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule {} {}", self.number(), self.name())
    }
}

/// Category of a requested supporting service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Database,
    Cache,
    Queue,
    Storage,
    Networking,
    Monitoring,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Database => "database",
            ServiceKind::Cache => "cache",
            ServiceKind::Queue => "queue",
            ServiceKind::Storage => "storage",
            ServiceKind::Networking => "networking",
            ServiceKind::Monitoring => "monitoring",
        }
    }

    /// Kind of a requested service name; flags such as high availability have none
    pub fn of(service: &str) -> Option<ServiceKind> {
        match service {
            "database" => Some(ServiceKind::Database),
            "redis" | "cache" => Some(ServiceKind::Cache),
            "queue" => Some(ServiceKind::Queue),
            "storage" => Some(ServiceKind::Storage),
            "cdn" | "load_balancer" => Some(ServiceKind::Networking),
            "monitoring" => Some(ServiceKind::Monitoring),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeResources {
    pub instance_type: String,
    pub min_instances: u32,
    pub max_instances: u32,
    pub auto_scaling: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubnetPlan {
    #[serde(rename = "public-only")]
    PublicOnly,
    #[serde(rename = "public+private")]
    PublicPrivate,
}

impl fmt::Display for SubnetPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubnetPlan::PublicOnly => f.write_str("public-only"),
            SubnetPlan::PublicPrivate => f.write_str("public+private"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkingConfig {
    pub vpc_needed: bool,
    pub subnet_plan: SubnetPlan,
    pub load_balancer: bool,
    pub ssl: bool,
    pub custom_domain: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub engine: DatabaseType,
    pub engine_version: Option<String>,
    /// Managed instance class, or the volume SKU for embedded engines
    pub instance_class: String,
    /// Whether the provider runs the engine as a managed service
    pub managed: bool,
    pub storage_gb: u32,
    pub multi_az: bool,
    pub backup_retention_days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalService {
    pub name: String,
    pub rationale: String,
}

/// One priced line of the estimate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostItem {
    pub item: String,
    pub sku: String,
    pub quantity: u32,
    pub monthly_cents: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub total_cents: u64,
    pub currency: String,
    pub period: String,
    /// Rendered total, e.g. `$42.10/month`
    pub formatted: String,
    pub breakdown: Vec<CostItem>,
}

impl CostEstimate {
    pub fn from_items(breakdown: Vec<CostItem>) -> Self {
        let total_cents = breakdown.iter().map(|i| i.monthly_cents).sum();
        Self {
            total_cents,
            currency: "USD".to_string(),
            period: "month".to_string(),
            formatted: format!("{}/month", format_cents(total_cents)),
            breakdown,
        }
    }
}

impl fmt::Display for CostEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted)
    }
}

/// Concrete infrastructure chosen for an application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfrastructureDecision {
    pub provider: CloudProvider,
    pub region: String,
    pub deployment_strategy: DeploymentStrategy,
    pub strategy_rule: StrategyRule,
    pub compute_resources: ComputeResources,
    pub networking: NetworkingConfig,
    pub database: Option<DatabaseConfig>,
    pub additional_services: Vec<AdditionalService>,
    pub estimated_cost: CostEstimate,
    /// Audit trail, one line per decision step
    pub reasoning: Vec<String>,
}

impl InfrastructureDecision {
    pub fn reasoning_text(&self) -> String {
        self.reasoning.join("\n")
    }
}
