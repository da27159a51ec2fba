use crate::analyzer::analyze_repository_with_config;
use crate::config::types::Config;
use crate::handlers::analyze::render_analysis;
use crate::infrastructure::{DecisionEngine, InfrastructureDecision};
use crate::requirements::{CloudProvider, DeploymentStrategy, RequirementParser, RuleBasedParser};
use colored::Colorize;
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

/// Analysis and decision together, for JSON consumers
#[derive(Serialize)]
struct PlanOutput<'a> {
    analysis: &'a crate::analyzer::AnalysisResult,
    requirements: &'a crate::requirements::DeploymentRequirements,
    decision: &'a InfrastructureDecision,
}

pub fn handle_plan(
    path: &Path,
    description: &str,
    provider: Option<CloudProvider>,
    deployment_type: Option<DeploymentStrategy>,
    json: bool,
    config: &Config,
) -> crate::Result<String> {
    let analysis = analyze_repository_with_config(path, &config.analysis)?;

    let mut requirements = RuleBasedParser::new().parse(description, &analysis)?;
    if let Some(provider) = provider {
        requirements = requirements.with_provider(provider);
    }
    if let Some(strategy) = deployment_type {
        requirements = requirements.with_deployment_type(strategy);
    }

    let decision = DecisionEngine::from_config(config).decide(&analysis, &requirements)?;

    if json {
        return Ok(serde_json::to_string_pretty(&PlanOutput {
            analysis: &analysis,
            requirements: &requirements,
            decision: &decision,
        })?);
    }

    let mut output = format!("🔍 Analyzing project: {}\n\n", path.display());
    output.push_str(&render_analysis(&analysis));
    output.push('\n');
    output.push_str(&render_decision(&decision));
    Ok(output)
}

/// Human-readable summary of a decision, reasoning included verbatim
pub fn render_decision(decision: &InfrastructureDecision) -> String {
    let mut out = String::new();
    let compute = &decision.compute_resources;
    let net = &decision.networking;

    let _ = writeln!(out, "{}", "🚀 INFRASTRUCTURE DECISION".bright_cyan().bold());
    let _ = writeln!(
        out,
        "├── Provider:   {} ({})",
        decision.provider.display_name().bold(),
        decision.region
    );
    let _ = writeln!(
        out,
        "├── Strategy:   {} [{}]",
        decision.deployment_strategy.to_string().green().bold(),
        decision.strategy_rule
    );
    let _ = writeln!(
        out,
        "├── Compute:    {} x{}..{}{}",
        compute.instance_type,
        compute.min_instances,
        compute.max_instances,
        if compute.auto_scaling { " (auto-scaling)" } else { "" }
    );
    let _ = writeln!(
        out,
        "├── Network:    vpc {}, {} subnets, load balancer {}",
        if net.vpc_needed { "yes" } else { "no" },
        net.subnet_plan,
        if net.load_balancer { "yes" } else { "no" }
    );
    match &decision.database {
        Some(db) => {
            let _ = writeln!(
                out,
                "├── Database:   {}{} on {} ({} GB{}, {}d backups)",
                db.engine,
                db.engine_version.as_deref().map(|v| format!(" {}", v)).unwrap_or_default(),
                db.instance_class,
                db.storage_gb,
                if db.multi_az { ", multi-AZ" } else { "" },
                db.backup_retention_days
            );
        }
        None => {
            let _ = writeln!(out, "├── Database:   none");
        }
    }
    for service in &decision.additional_services {
        let _ = writeln!(out, "├── Service:    {} ({})", service.name, service.rationale);
    }
    let _ = writeln!(
        out,
        "└── Cost:       {}",
        decision.estimated_cost.to_string().yellow().bold()
    );

    let _ = writeln!(out, "\n{}", "🧭 REASONING".bright_cyan().bold());
    let _ = writeln!(out, "{}", decision.reasoning_text());
    out
}
