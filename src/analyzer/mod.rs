//! # Analyzer Module
//!
//! Derives a structured profile of an arbitrary repository:
//! - Programming language and framework
//! - Dependencies per ecosystem
//! - Entry point, build/start commands and listening port
//! - Database, cache and container needs
//!
//! Detection never fails on ambiguity; it lowers `confidence_score` instead.

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

pub mod context;
pub mod dependency_parser;
pub mod docker_analyzer;
pub mod file_signals;
pub mod framework_detector;
pub mod language_detector;
pub mod service_detector;

pub use crate::config::types::AnalysisConfig;
pub use context::PortSource;
pub use dependency_parser::{DependencyMap, DependencySpec};
pub use file_signals::{FileSignal, FileSignals};
pub use framework_detector::{FRAMEWORK_REGISTRY, Framework, FrameworkScore};
pub use language_detector::Language;
pub use service_detector::DatabaseType;

const FRAMEWORK_WEIGHT: f64 = 0.55;
const ENTRY_POINT_WEIGHT: f64 = 0.20;
const MANIFEST_WEIGHT: f64 = 0.15;
const PORT_WEIGHT: f64 = 0.10;

/// Structured profile of a repository
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    /// Framework id, or `generic-<language>` without a framework
    pub app_type: String,
    pub framework: Option<Framework>,
    pub language: Language,
    pub dependencies: DependencyMap,
    pub entry_point: Option<String>,
    pub build_command: Option<String>,
    pub start_command: Option<String>,
    pub port: u16,
    pub port_source: PortSource,
    pub environment_vars: BTreeSet<String>,
    pub requires_database: bool,
    pub database_type: Option<DatabaseType>,
    pub requires_redis: bool,
    pub requires_docker: bool,
    pub dockerfile_present: bool,
    pub docker_compose_present: bool,
    pub compose_services: Vec<String>,
    pub static_files: bool,
    pub serverless_handler: bool,
    pub confidence_score: f64,
    pub warnings: Vec<String>,
    pub files_analyzed: usize,
}

impl AnalysisResult {
    /// Number of runtime (non-dev) dependencies across ecosystems
    pub fn runtime_dependency_count(&self) -> usize {
        dependency_parser::runtime_names(&self.dependencies).len()
    }

    /// Whether the app runs as a long-lived listening process
    pub fn is_persistent_server(&self) -> bool {
        match self.framework {
            Some(framework) => framework.is_persistent_server(),
            None => self.start_command.is_some(),
        }
    }

    pub fn is_frontend_only(&self) -> bool {
        self.framework.is_some_and(|f| f.is_frontend_only())
    }

    /// JVM runtimes need a larger memory baseline
    pub fn is_jvm(&self) -> bool {
        self.language == Language::Java
    }
}

/// Inputs of the confidence score, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceFactors {
    pub framework_certainty: f64,
    pub entry_point_found: bool,
    /// Parsed manifests over recognized manifests, 0 when none were found
    pub manifest_ratio: f64,
    pub port_certainty: f64,
}

/// Weighted sum of the confidence factors, rounded to three decimals
pub fn calculate_confidence(factors: &ConfidenceFactors) -> f64 {
    let entry = if factors.entry_point_found { 1.0 } else { 0.0 };
    let score = factors.framework_certainty * FRAMEWORK_WEIGHT
        + entry * ENTRY_POINT_WEIGHT
        + factors.manifest_ratio * MANIFEST_WEIGHT
        + factors.port_certainty * PORT_WEIGHT;
    (score.clamp(0.0, 1.0) * 1000.0).round() / 1000.0
}

/// Analyzes a repository with default configuration
pub fn analyze_repository(path: &Path) -> Result<AnalysisResult> {
    analyze_repository_with_config(path, &AnalysisConfig::default())
}

/// Analyzes a repository with custom configuration
pub fn analyze_repository_with_config(path: &Path, config: &AnalysisConfig) -> Result<AnalysisResult> {
    let start_time = std::time::Instant::now();

    let project_root =
        crate::common::file_utils::validate_project_path(path, config.allowed_root.as_deref())?;

    log::info!("Starting analysis of repository: {}", project_root.display());

    let signals = FileSignals::extract(&project_root, config);
    let result = analyze_signals(&signals, config).map_err(|e| match e {
        crate::error::AutodeployError::Analysis(AnalysisError::EmptyRepository { .. }) => {
            AnalysisError::EmptyRepository {
                path: project_root.clone(),
            }
            .into()
        }
        other => other,
    })?;

    log::info!(
        "Analysis complete in {}ms: {} (confidence {:.2})",
        start_time.elapsed().as_millis(),
        result.app_type,
        result.confidence_score
    );
    Ok(result)
}

/// Build an [`AnalysisResult`] from already extracted file signals
pub fn analyze_signals(signals: &FileSignals, config: &AnalysisConfig) -> Result<AnalysisResult> {
    let mut warnings = Vec::new();
    if signals.truncated() {
        warnings.push(format!(
            "File limit of {} reached; analysis is based on a partial file list",
            config.max_files
        ));
    }

    let counts = language_detector::count_source_files(signals);
    if counts.is_empty() {
        return Err(AnalysisError::EmptyRepository {
            path: Path::new(".").to_path_buf(),
        }
        .into());
    }

    let deps = dependency_parser::parse_dependencies(signals);
    warnings.extend(deps.failures.iter().map(|e| e.to_string()));

    let ranked = framework_detector::score_frameworks(signals, &deps.dependencies);
    let framework_languages: Vec<&[Language]> =
        ranked.iter().map(|s| s.framework.languages()).collect();

    let language = language_detector::detect_language(&counts, &framework_languages).ok_or_else(
        || AnalysisError::EmptyRepository {
            path: Path::new(".").to_path_buf(),
        },
    )?;

    let selected = framework_detector::select_framework(&ranked, Some(language));
    let framework = selected.map(|s| s.framework);
    log::debug!("Language {}, framework {:?}", language, framework);

    let entry_point = context::detect_entry_point(signals, framework, Some(language));
    let (port, port_source) = context::detect_port(
        signals,
        framework,
        entry_point.as_deref(),
        config.text_scan_file_limit,
    )?;
    let commands = context::infer_commands(
        signals,
        framework,
        Some(language),
        entry_point.as_deref(),
        port,
    );
    let environment_vars = context::detect_environment_vars(signals, config.text_scan_file_limit)?;
    let services = service_detector::detect_services(
        signals,
        &deps.dependencies,
        config.text_scan_file_limit,
    );

    let (docker, compose_failure) = docker_analyzer::analyze_docker(signals);
    if let Some(failure) = compose_failure {
        warnings.push(failure.to_string());
    }

    let manifest_ratio = if deps.manifests_found.is_empty() {
        0.0
    } else {
        deps.manifests_parsed as f64 / deps.manifests_found.len() as f64
    };
    let confidence_score = calculate_confidence(&ConfidenceFactors {
        framework_certainty: selected.map(|s| s.certainty()).unwrap_or(0.0),
        entry_point_found: entry_point.is_some(),
        manifest_ratio,
        port_certainty: port_source.certainty(),
    });

    let app_type = match framework {
        Some(framework) => framework.as_str().to_string(),
        None => format!("generic-{}", language),
    };
    let database_type = services.database_type();

    Ok(AnalysisResult {
        app_type,
        framework,
        language,
        dependencies: deps.dependencies,
        entry_point,
        build_command: commands.build,
        start_command: commands.start,
        port,
        port_source,
        environment_vars,
        requires_database: database_type.is_some(),
        database_type,
        requires_redis: services.requires_redis(),
        requires_docker: docker.requires_docker(),
        dockerfile_present: docker.dockerfile_present(),
        docker_compose_present: docker.compose_present(),
        compose_services: docker.compose_services,
        static_files: context::detect_static_files(signals),
        serverless_handler: services.serverless_handler,
        confidence_score,
        warnings,
        files_analyzed: signals.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(files: &[(&str, &str)]) -> FileSignals {
        FileSignals::from_files(
            files
                .iter()
                .map(|(p, c)| FileSignal {
                    path: p.to_string(),
                    content: Some(c.to_string()),
                })
                .collect(),
        )
    }

    #[test]
    fn test_confidence_weights() {
        let full = calculate_confidence(&ConfidenceFactors {
            framework_certainty: 1.0,
            entry_point_found: true,
            manifest_ratio: 1.0,
            port_certainty: 0.5,
        });
        assert_eq!(full, 0.95);

        let no_framework = calculate_confidence(&ConfidenceFactors {
            framework_certainty: 0.0,
            entry_point_found: true,
            manifest_ratio: 1.0,
            port_certainty: 1.0,
        });
        assert!(no_framework < 0.5);
    }

    #[test]
    fn test_flask_profile() {
        let result = analyze_signals(
            &signals(&[
                ("app.py", "from flask import Flask\napp = Flask(__name__)\n\nif __name__ == '__main__':\n    app.run()\n"),
                ("requirements.txt", "flask==3.0.0\n"),
            ]),
            &AnalysisConfig::default(),
        )
        .unwrap();
        assert_eq!(result.framework, Some(Framework::Flask));
        assert_eq!(result.app_type, "flask");
        assert_eq!(result.language, Language::Python);
        assert_eq!(result.port, 5000);
        assert_eq!(result.port_source, PortSource::FrameworkDefault);
        assert_eq!(result.entry_point.as_deref(), Some("app.py"));
        assert!(!result.requires_database);
        assert_eq!(result.database_type, None);
        assert_eq!(result.confidence_score, 0.95);
    }

    #[test]
    fn test_generic_app_type() {
        let result = analyze_signals(
            &signals(&[("main.go", "package main\nfunc main() {}\n")]),
            &AnalysisConfig::default(),
        )
        .unwrap();
        assert_eq!(result.framework, None);
        assert_eq!(result.app_type, "generic-go");
        assert!(result.confidence_score < 0.5);
    }

    #[test]
    fn test_empty_repository() {
        let err = analyze_signals(&signals(&[("README.md", "# hi")]), &AnalysisConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::AutodeployError::Analysis(AnalysisError::EmptyRepository { .. })
        ));
    }

    #[test]
    fn test_broken_manifest_lowers_confidence() {
        let files = [
            ("app.py", "from flask import Flask\napp = Flask(__name__)\n"),
            ("requirements.txt", "flask\n"),
        ];
        let clean = analyze_signals(&signals(&files), &AnalysisConfig::default()).unwrap();

        let mut broken_files = files.to_vec();
        broken_files.push(("package.json", "{ nope"));
        let broken = analyze_signals(&signals(&broken_files), &AnalysisConfig::default()).unwrap();

        assert!(broken.confidence_score < clean.confidence_score);
        assert_eq!(broken.warnings.len(), 1);
        assert!(broken.warnings[0].contains("package.json"));
    }
}
