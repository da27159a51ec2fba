//! # Docker Analyzer Module
//!
//! Detects container tooling already present in the repository:
//! - a Dockerfile (or variant such as `Dockerfile.prod`) at the root
//! - a Docker Compose file at the root and the services it declares

use crate::analyzer::file_signals::FileSignals;
use crate::error::AnalysisError;
use serde::Serialize;

/// Compose file names, in lookup order
pub const COMPOSE_FILES: &[&str] = &[
    "docker-compose.yml",
    "docker-compose.yaml",
    "compose.yml",
    "compose.yaml",
];

/// Container tooling found at the repository root
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DockerSignals {
    pub dockerfile: Option<String>,
    pub compose_file: Option<String>,
    /// Services declared by the compose file, in declaration order
    pub compose_services: Vec<String>,
}

impl DockerSignals {
    pub fn dockerfile_present(&self) -> bool {
        self.dockerfile.is_some()
    }

    pub fn compose_present(&self) -> bool {
        self.compose_file.is_some()
    }

    /// The project already ships with a container setup
    pub fn requires_docker(&self) -> bool {
        self.dockerfile_present() || self.compose_present()
    }
}

/// Checks if a filename matches Dockerfile patterns
fn is_dockerfile_name(filename: &str) -> bool {
    let filename_lower = filename.to_lowercase();
    filename_lower == "dockerfile"
        || filename_lower.starts_with("dockerfile.")
        || filename_lower.ends_with(".dockerfile")
}

/// Detect Dockerfiles and compose files at the root.
///
/// A compose file that is not valid YAML still counts as present; the parse
/// failure is returned alongside so the caller can report it.
pub fn analyze_docker(signals: &FileSignals) -> (DockerSignals, Option<AnalysisError>) {
    let root_files = || signals.iter().filter(|f| !f.path.contains('/'));

    let dockerfile = root_files()
        .filter(|f| is_dockerfile_name(&f.path))
        .min_by_key(|f| (f.path.to_lowercase() != "dockerfile", f.path.clone()))
        .map(|f| f.path.clone());

    let compose_file = COMPOSE_FILES
        .iter()
        .find(|name| signals.contains(name))
        .map(|name| name.to_string());

    let mut failure = None;
    let compose_services = match compose_file.as_deref() {
        Some(name) => match parse_compose_services(signals.content(name).unwrap_or_default()) {
            Ok(services) => services,
            Err(reason) => {
                log::warn!("Could not parse {}: {}", name, reason);
                failure = Some(AnalysisError::UnsupportedManifest {
                    manifest: name.to_string(),
                    reason,
                });
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    let docker = DockerSignals {
        dockerfile,
        compose_file,
        compose_services,
    };
    log::debug!("Docker signals: {:?}", docker);
    (docker, failure)
}

/// Service names under the top-level `services` key
fn parse_compose_services(content: &str) -> Result<Vec<String>, String> {
    let yaml_value: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| format!("YAML parsing error: {}", e))?;

    Ok(yaml_value
        .get("services")
        .and_then(|s| s.as_mapping())
        .map(|services| {
            services
                .iter()
                .filter_map(|(name, _)| name.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default())
}
