//! Infrastructure decision engine.
//!
//! `decide` is pure: the same analysis and requirements always produce the
//! same decision, byte for byte once serialized. Every step appends a line to
//! the decision's reasoning so the result can be audited.

use crate::analyzer::{AnalysisResult, DatabaseType};
use crate::config::types::{Config, PlannerConfig};
use crate::error::{DecisionError, Result};
use crate::infrastructure::pricing::{PriceTable, format_cents};
use crate::infrastructure::provider_data::{self, ServiceCatalog};
use crate::infrastructure::sizing::{
    MIN_KUBERNETES_NODES, SizingSignal, choose_compute_tier, choose_database_tier,
};
use crate::infrastructure::types::{
    AdditionalService, ComputeResources, CostEstimate, CostItem, DatabaseConfig,
    InfrastructureDecision, NetworkingConfig, ServiceKind, StrategyRule, SubnetPlan,
};
use crate::requirements::{CloudProvider, DeploymentRequirements, DeploymentStrategy};
use std::collections::{BTreeMap, BTreeSet};

/// Managed database storage provisioned up front
pub const DEFAULT_STORAGE_GB: u32 = 20;

/// Requested service names the engine knows how to place
const KNOWN_SERVICES: &[&str] = &[
    "redis",
    "cache",
    "storage",
    "queue",
    "cdn",
    "monitoring",
    "load_balancer",
    "high_availability",
];

fn fired(rule: StrategyRule, strategy: DeploymentStrategy, reason: &str) -> String {
    format!("[strategy] {}: fired -> {} ({})", rule, strategy, reason)
}

fn skipped(rule: StrategyRule, reason: &str) -> String {
    format!("[strategy] {}: skipped ({})", rule, reason)
}

/// The rule that fired, recovered from a reasoning trail
pub fn fired_rule_from_reasoning(reasoning: &[String]) -> Option<StrategyRule> {
    reasoning.iter().find_map(|line| {
        let rest = line.strip_prefix("[strategy] rule ")?;
        if !rest.contains(": fired -> ") {
            return None;
        }
        let number = rest.split_whitespace().next()?.parse::<u8>().ok()?;
        StrategyRule::from_number(number)
    })
}

/// Distinct kinds among the requested services
pub fn requested_kinds(requirements: &DeploymentRequirements) -> BTreeSet<ServiceKind> {
    requirements
        .additional_services
        .iter()
        .filter_map(|s| ServiceKind::of(s))
        .collect()
}

/// Evaluate the precedence rules in order and return the first that matches.
pub fn select_strategy(
    analysis: &AnalysisResult,
    requirements: &DeploymentRequirements,
    reasoning: &mut Vec<String>,
) -> Result<(DeploymentStrategy, StrategyRule)> {
    // Rule 1: honor an explicit request unless the app contradicts it
    let rule = StrategyRule::ExplicitRequest;
    match requirements.deployment_type {
        Some(DeploymentStrategy::Serverless)
            if analysis.is_persistent_server() && !analysis.serverless_handler =>
        {
            return Err(DecisionError::IncompatibleRequirements {
                requested: DeploymentStrategy::Serverless.to_string(),
                reason: format!(
                    "{} runs a persistent server on port {} and no function handler was found",
                    analysis.app_type, analysis.port
                ),
            }
            .into());
        }
        Some(requested) => {
            reasoning.push(fired(rule, requested, "requested explicitly"));
            return Ok((requested, rule));
        }
        None => reasoning.push(skipped(rule, "no deployment type requested")),
    }

    // Rule 2: nothing stateful and nothing extra runs on a single VM
    let rule = StrategyRule::SimpleApp;
    let mut blockers = Vec::new();
    if let Some(engine) = analysis.database_type.filter(|_| analysis.requires_database) {
        blockers.push(format!("database required: {}", engine));
    } else if analysis.requires_database {
        blockers.push("database required".to_string());
    }
    if analysis.docker_compose_present {
        blockers.push("compose file present".to_string());
    }
    if !requirements.additional_services.is_empty() {
        let names: Vec<&str> = requirements.additional_services.iter().map(|s| s.as_str()).collect();
        blockers.push(format!("additional services requested: {}", names.join(", ")));
    }
    if blockers.is_empty() {
        reasoning.push(fired(
            rule,
            DeploymentStrategy::Vm,
            "no database, compose file or additional services",
        ));
        return Ok((DeploymentStrategy::Vm, rule));
    }
    reasoning.push(skipped(rule, &blockers.join("; ")));

    // Rule 3: stateful or multi-container apps go to containers
    let rule = StrategyRule::StatefulApp;
    if analysis.requires_database || analysis.docker_compose_present {
        let reason = if analysis.requires_database {
            format!(
                "database required: {}",
                analysis.database_type.unwrap_or(DatabaseType::Postgresql)
            )
        } else {
            "compose file present".to_string()
        };
        reasoning.push(fired(rule, DeploymentStrategy::Container, &reason));
        return Ok((DeploymentStrategy::Container, rule));
    }
    reasoning.push(skipped(rule, "no database and no compose file"));

    // Rule 4: several kinds of supporting services need an orchestrator
    let rule = StrategyRule::MultiService;
    let kinds = requested_kinds(requirements);
    let kind_names: Vec<&str> = kinds.iter().map(|k| k.as_str()).collect();
    if kinds.len() > 1 {
        reasoning.push(fired(
            rule,
            DeploymentStrategy::Kubernetes,
            &format!("{} service kinds requested: {}", kinds.len(), kind_names.join(", ")),
        ));
        return Ok((DeploymentStrategy::Kubernetes, rule));
    }
    reasoning.push(skipped(
        rule,
        &format!("{} service kind requested", kinds.len()),
    ));

    // Rule 5: stateless or event-driven apps go serverless
    let rule = StrategyRule::EventDriven;
    let event_reason = if analysis.serverless_handler {
        Some("function handler found".to_string())
    } else if analysis.is_frontend_only() {
        Some("static frontend only".to_string())
    } else if analysis.entry_point.is_none() {
        Some("no persistent entry point".to_string())
    } else {
        None
    };
    if let Some(reason) = event_reason {
        reasoning.push(fired(rule, DeploymentStrategy::Serverless, &reason));
        return Ok((DeploymentStrategy::Serverless, rule));
    }
    reasoning.push(skipped(
        rule,
        &format!(
            "persistent entry point {} and no function handler",
            analysis.entry_point.as_deref().unwrap_or_default()
        ),
    ));

    // Rule 6
    let rule = StrategyRule::Fallback;
    reasoning.push(fired(rule, DeploymentStrategy::Container, "no other rule matched"));
    Ok((DeploymentStrategy::Container, rule))
}

/// Turns an analysis plus requirements into a concrete infrastructure plan
#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    planner: PlannerConfig,
    pricing: BTreeMap<String, BTreeMap<String, f64>>,
}

impl DecisionEngine {
    pub fn new(planner: PlannerConfig) -> Self {
        Self {
            planner,
            pricing: BTreeMap::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            planner: config.planner.clone(),
            pricing: config.pricing.clone(),
        }
    }

    pub fn decide(
        &self,
        analysis: &AnalysisResult,
        requirements: &DeploymentRequirements,
    ) -> Result<InfrastructureDecision> {
        let provider = requirements.cloud_provider;
        let catalog = provider_data::services(provider);
        let prices = PriceTable::new(provider).with_overrides(&self.pricing);
        let mut reasoning = vec![format!(
            "[analysis] {} ({}), confidence {:.2}",
            analysis.app_type, analysis.language, analysis.confidence_score
        )];

        let region = resolve_region(provider, requirements.region.as_deref(), &mut reasoning);
        let (strategy, strategy_rule) = select_strategy(analysis, requirements, &mut reasoning)?;

        let signal = SizingSignal::from_inputs(
            analysis,
            requirements,
            self.planner.non_trivial_dependency_threshold,
        );
        let tiers = provider_data::compute_tiers(provider, strategy);
        let choice = choose_compute_tier(tiers, strategy, requirements.instance_type.as_deref(), signal);
        reasoning.push(format!(
            "[sizing] {} on {}: {}",
            strategy,
            choice.tier.id,
            choice.notes.join("; ")
        ));

        let compute = compute_resources(strategy, requirements, choice.tier.id, &mut reasoning);
        let networking = networking(analysis, requirements, strategy, &compute, &mut reasoning);
        let database = self.database(analysis, requirements, provider, catalog, signal, &mut reasoning);
        let additional_services = additional_services(analysis, requirements, catalog);
        for service in &additional_services {
            reasoning.push(format!("[services] {}: {}", service.name, service.rationale));
        }

        let estimated_cost = estimate_cost(
            &prices,
            catalog,
            strategy,
            &compute,
            &networking,
            database.as_ref(),
            &additional_services,
        );
        reasoning.push(format!(
            "[cost] {} across {} line items",
            estimated_cost, estimated_cost.breakdown.len()
        ));

        log::info!(
            "Decided {} on {} ({}) at {}",
            strategy,
            provider,
            strategy_rule,
            estimated_cost
        );

        Ok(InfrastructureDecision {
            provider,
            region,
            deployment_strategy: strategy,
            strategy_rule,
            compute_resources: compute,
            networking,
            database,
            additional_services,
            estimated_cost,
            reasoning,
        })
    }

    fn database(
        &self,
        analysis: &AnalysisResult,
        requirements: &DeploymentRequirements,
        provider: CloudProvider,
        catalog: &ServiceCatalog,
        signal: SizingSignal,
        reasoning: &mut Vec<String>,
    ) -> Option<DatabaseConfig> {
        if !analysis.requires_database {
            return None;
        }
        let engine = analysis.database_type.unwrap_or(DatabaseType::Postgresql);
        let backup_retention_days = self.planner.backup_retention_days.max(1);

        if engine == DatabaseType::Sqlite {
            reasoning.push(format!(
                "[database] sqlite is embedded; data lives on a persistent volume ({})",
                catalog.persistent_volume
            ));
            return Some(DatabaseConfig {
                engine,
                engine_version: None,
                instance_class: catalog.persistent_volume.to_string(),
                managed: false,
                storage_gb: DEFAULT_STORAGE_GB,
                multi_az: false,
                backup_retention_days,
            });
        }

        let tier = choose_database_tier(provider_data::database_tiers(provider), signal);
        let multi_az = requirements.wants("high_availability");
        reasoning.push(format!(
            "[database] managed {} on {}{}, {} day backups",
            engine,
            tier.id,
            if multi_az { ", multi-AZ for high availability" } else { ", single zone" },
            backup_retention_days
        ));

        Some(DatabaseConfig {
            engine,
            engine_version: provider_data::engine_version(engine).map(String::from),
            instance_class: tier.id.to_string(),
            managed: true,
            storage_gb: DEFAULT_STORAGE_GB,
            multi_az,
            backup_retention_days,
        })
    }
}

/// Decide with default planner settings and list prices
pub fn decide(
    analysis: &AnalysisResult,
    requirements: &DeploymentRequirements,
) -> Result<InfrastructureDecision> {
    DecisionEngine::default().decide(analysis, requirements)
}

fn resolve_region(provider: CloudProvider, requested: Option<&str>, reasoning: &mut Vec<String>) -> String {
    let default = provider_data::default_region(provider);
    match requested {
        Some(region) if provider_data::regions(provider).iter().any(|r| r.id == region) => {
            reasoning.push(format!("[region] {} (requested)", region));
            region.to_string()
        }
        Some(region) => {
            reasoning.push(format!(
                "[region] {} is not a known {} region, using {}",
                region,
                provider.display_name(),
                default
            ));
            default.to_string()
        }
        None => {
            reasoning.push(format!("[region] {} ({} default)", default, provider.display_name()));
            default.to_string()
        }
    }
}

fn compute_resources(
    strategy: DeploymentStrategy,
    requirements: &DeploymentRequirements,
    instance_type: &str,
    reasoning: &mut Vec<String>,
) -> ComputeResources {
    let scaling = requirements.scaling;
    let (min_instances, max_instances, auto_scaling) = match strategy {
        DeploymentStrategy::Vm => {
            if scaling.enabled && requirements.ssl_required && scaling.max > 1 {
                (scaling.min, scaling.max, true)
            } else {
                if scaling.enabled || scaling.min > 1 {
                    reasoning.push(
                        "[scaling] a VM without a load balancer runs a single instance".to_string(),
                    );
                }
                (1, 1, false)
            }
        }
        DeploymentStrategy::Container => {
            if scaling.enabled {
                (scaling.min, scaling.max.max(scaling.min), true)
            } else {
                (scaling.min, scaling.min, false)
            }
        }
        DeploymentStrategy::Kubernetes => {
            let nodes = scaling.min.max(MIN_KUBERNETES_NODES);
            if scaling.enabled {
                (nodes, scaling.max.max(nodes), true)
            } else {
                (nodes, nodes, false)
            }
        }
        DeploymentStrategy::Serverless => (0, scaling.max.max(1), false),
    };

    reasoning.push(format!(
        "[scaling] {}..{} instances, auto-scaling {}",
        min_instances,
        max_instances,
        if auto_scaling { "on" } else { "off" }
    ));

    ComputeResources {
        instance_type: instance_type.to_string(),
        min_instances,
        max_instances,
        auto_scaling,
    }
}

fn networking(
    analysis: &AnalysisResult,
    requirements: &DeploymentRequirements,
    strategy: DeploymentStrategy,
    compute: &ComputeResources,
    reasoning: &mut Vec<String>,
) -> NetworkingConfig {
    let private_tier = analysis.requires_database || analysis.requires_redis;
    let vpc_needed = analysis.requires_database || strategy != DeploymentStrategy::Serverless;
    let subnet_plan = if private_tier {
        SubnetPlan::PublicPrivate
    } else {
        SubnetPlan::PublicOnly
    };
    let load_balancer =
        compute.auto_scaling || (requirements.ssl_required && compute.min_instances > 1);
    // A custom domain gets a certificate but does not by itself add a load balancer
    let ssl = requirements.ssl_required || requirements.custom_domain.is_some();

    reasoning.push(format!(
        "[network] {}, {} subnets, load balancer {}{}",
        if vpc_needed { "VPC" } else { "no VPC" },
        subnet_plan,
        if load_balancer { "yes" } else { "no" },
        if ssl { ", TLS termination" } else { "" }
    ));
    if requirements.wants("load_balancer") && !load_balancer {
        reasoning.push(
            "[network] load balancer requested but a single instance does not need one".to_string(),
        );
    }

    NetworkingConfig {
        vpc_needed,
        subnet_plan,
        load_balancer,
        ssl,
        custom_domain: requirements.custom_domain.clone(),
    }
}

fn service(name: &str, rationale: impl Into<String>) -> AdditionalService {
    AdditionalService {
        name: name.to_string(),
        rationale: rationale.into(),
    }
}

/// Supporting services in a fixed order: cache, storage, DNS and certificate,
/// queue, CDN, monitoring, then pass-through requests.
fn additional_services(
    analysis: &AnalysisResult,
    requirements: &DeploymentRequirements,
    catalog: &ServiceCatalog,
) -> Vec<AdditionalService> {
    let mut services = Vec::new();

    if analysis.requires_redis {
        services.push(service(catalog.cache, "redis client detected in the application"));
    } else if requirements.wants("redis") || requirements.wants("cache") {
        services.push(service(catalog.cache, "cache requested"));
    }

    if analysis.static_files {
        services.push(service(catalog.object_storage, "static assets served from object storage"));
    } else if requirements.wants("storage") {
        services.push(service(catalog.object_storage, "object storage requested"));
    }

    if let Some(domain) = &requirements.custom_domain {
        services.push(service(catalog.dns_zone, format!("DNS zone for {}", domain)));
        services.push(service(catalog.certificate, format!("managed TLS certificate for {}", domain)));
    }

    if requirements.wants("queue") {
        services.push(service(catalog.queue, "message queue requested"));
    }
    if requirements.wants("cdn") {
        services.push(service(catalog.cdn, "CDN requested"));
    }

    services.push(service(
        catalog.monitoring,
        if requirements.wants("monitoring") {
            "monitoring requested"
        } else {
            "baseline logs and metrics"
        },
    ));

    for name in &requirements.additional_services {
        if KNOWN_SERVICES.contains(&name.as_str()) {
            continue;
        }
        let rationale = if name == "database" && !analysis.requires_database {
            "requested explicitly; no database driver detected, so no instance is sized"
        } else if name == "database" {
            continue;
        } else {
            "requested explicitly"
        };
        services.push(service(name, rationale));
    }

    services
}

fn item(label: impl Into<String>, sku: &str, quantity: u32, monthly_cents: u64) -> CostItem {
    CostItem {
        item: label.into(),
        sku: sku.to_string(),
        quantity,
        monthly_cents,
    }
}

fn estimate_cost(
    prices: &PriceTable,
    catalog: &ServiceCatalog,
    strategy: DeploymentStrategy,
    compute: &ComputeResources,
    networking: &NetworkingConfig,
    database: Option<&DatabaseConfig>,
    services: &[AdditionalService],
) -> CostEstimate {
    let mut items = Vec::new();

    let count = match strategy {
        DeploymentStrategy::Serverless => 1,
        _ => compute.min_instances.max(1),
    };
    let unit = prices.monthly_cents(&compute.instance_type);
    items.push(item("compute", &compute.instance_type, count, unit * u64::from(count)));

    if strategy == DeploymentStrategy::Kubernetes {
        let sku = catalog.kubernetes_control_plane;
        items.push(item("kubernetes control plane", sku, 1, prices.monthly_cents(sku)));
    }

    if let Some(db) = database {
        if db.managed {
            let copies: u32 = if db.multi_az { 2 } else { 1 };
            let unit = prices.monthly_cents(&db.instance_class);
            items.push(item("database", &db.instance_class, copies, unit * u64::from(copies)));
            items.push(item(
                format!("database storage ({} GB)", db.storage_gb),
                catalog.database_storage,
                copies,
                prices.per_gb_cents(catalog.database_storage, db.storage_gb) * u64::from(copies),
            ));
        } else {
            items.push(item(
                "persistent volume",
                &db.instance_class,
                1,
                prices.monthly_cents(&db.instance_class),
            ));
        }
    }

    if networking.load_balancer {
        let sku = catalog.load_balancer;
        items.push(item("load balancer", sku, 1, prices.monthly_cents(sku)));
    }

    items.push(item("egress baseline", catalog.egress, 1, prices.monthly_cents(catalog.egress)));

    let priced = [
        catalog.cache,
        catalog.object_storage,
        catalog.dns_zone,
        catalog.certificate,
        catalog.queue,
        catalog.cdn,
        catalog.monitoring,
    ];
    for svc in services.iter().filter(|s| priced.contains(&s.name.as_str())) {
        items.push(item(svc.name.clone(), &svc.name, 1, prices.monthly_cents(&svc.name)));
    }

    let estimate = CostEstimate::from_items(items);
    log::debug!(
        "Cost estimate {} ({})",
        format_cents(estimate.total_cents),
        estimate
            .breakdown
            .iter()
            .map(|i| format!("{}={}", i.sku, i.monthly_cents))
            .collect::<Vec<_>>()
            .join(", ")
    );
    estimate
}
