use crate::analyzer::{AnalysisResult, analyze_repository_with_config};
use crate::config::types::Config;
use colored::Colorize;
use std::fmt::Write;
use std::path::Path;

pub fn handle_analyze(path: &Path, json: bool, config: &Config) -> crate::Result<String> {
    let analysis = analyze_repository_with_config(path, &config.analysis)?;

    if json {
        return Ok(serde_json::to_string_pretty(&analysis)?);
    }

    let mut output = format!("🔍 Analyzing project: {}\n\n", path.display());
    output.push_str(&render_analysis(&analysis));
    Ok(output)
}

fn or_none(value: Option<&str>) -> String {
    value.map(String::from).unwrap_or_else(|| "-".dimmed().to_string())
}

/// Human-readable summary of an analysis
pub fn render_analysis(analysis: &AnalysisResult) -> String {
    let mut out = String::new();
    let confidence = format!("{:.2}", analysis.confidence_score);
    let confidence = if analysis.confidence_score >= 0.8 {
        confidence.green()
    } else if analysis.confidence_score >= 0.5 {
        confidence.yellow()
    } else {
        confidence.red()
    };

    let _ = writeln!(out, "{}", "📊 ANALYSIS".bright_cyan().bold());
    let _ = writeln!(out, "├── App type:     {}", analysis.app_type.bold());
    let _ = writeln!(out, "├── Language:     {}", analysis.language);
    let _ = writeln!(
        out,
        "├── Framework:    {}",
        or_none(analysis.framework.map(|f| f.display_name()))
    );
    let _ = writeln!(out, "├── Entry point:  {}", or_none(analysis.entry_point.as_deref()));
    let _ = writeln!(out, "├── Build:        {}", or_none(analysis.build_command.as_deref()));
    let _ = writeln!(out, "├── Start:        {}", or_none(analysis.start_command.as_deref()));
    let _ = writeln!(
        out,
        "├── Port:         {} ({})",
        analysis.port,
        analysis.port_source.description()
    );
    let _ = writeln!(
        out,
        "├── Database:     {}",
        or_none(analysis.database_type.map(|d| d.as_str()))
    );
    let _ = writeln!(out, "├── Redis:        {}", if analysis.requires_redis { "yes" } else { "no" });
    let _ = writeln!(
        out,
        "├── Docker:       Dockerfile {}, compose {}",
        if analysis.dockerfile_present { "yes" } else { "no" },
        if analysis.docker_compose_present { "yes" } else { "no" }
    );
    if !analysis.compose_services.is_empty() {
        let _ = writeln!(out, "│   └── services: {}", analysis.compose_services.join(", "));
    }
    let _ = writeln!(out, "├── Static files: {}", if analysis.static_files { "yes" } else { "no" });
    let _ = writeln!(out, "├── Files:        {}", analysis.files_analyzed);
    let _ = writeln!(out, "└── Confidence:   {}", confidence);

    if !analysis.dependencies.is_empty() {
        let _ = writeln!(out, "\n{}", "📦 DEPENDENCIES".bright_cyan().bold());
        for (ecosystem, deps) in &analysis.dependencies {
            let names: Vec<String> = deps
                .iter()
                .map(|d| match &d.version {
                    Some(v) => format!("{} {}", d.name, v),
                    None => d.name.clone(),
                })
                .collect();
            let _ = writeln!(out, "├── {} ({}): {}", ecosystem, deps.len(), names.join(", "));
        }
    }

    if !analysis.environment_vars.is_empty() {
        let names: Vec<&str> = analysis.environment_vars.iter().map(|s| s.as_str()).collect();
        let _ = writeln!(out, "\n{} {}", "🔑 ENVIRONMENT:".bright_cyan().bold(), names.join(", "));
    }

    for warning in &analysis.warnings {
        let _ = writeln!(out, "{} {}", "⚠️ ".yellow(), warning);
    }

    out
}
