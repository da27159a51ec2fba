use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub planner: PlannerConfig,
    /// Price overrides keyed by provider id, then SKU, in USD per month
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub pricing: BTreeMap<String, BTreeMap<String, f64>>,
}

/// Analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub ignore_patterns: Vec<String>,
    pub max_file_size: usize,
    pub max_files: usize,
    /// Upper bound on files read by the keyword fallback scan
    pub text_scan_file_limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_root: Option<PathBuf>,
}

/// Decision engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub non_trivial_dependency_threshold: usize,
    pub backup_retention_days: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ignore_patterns: vec![
                "node_modules".to_string(),
                ".git".to_string(),
                "target".to_string(),
                "build".to_string(),
                ".next".to_string(),
                "dist".to_string(),
                "venv".to_string(),
                ".venv".to_string(),
                "__pycache__".to_string(),
                "vendor".to_string(),
            ],
            max_file_size: 256 * 1024, // 256KB sample per file
            max_files: 10_000,
            text_scan_file_limit: 500,
            allowed_root: None,
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            non_trivial_dependency_threshold: 15,
            backup_retention_days: 7,
        }
    }
}
