use std::path::PathBuf;
use thiserror::Error;

/// Top-level error for every operation the crate exposes.
#[derive(Debug, Error)]
pub enum AutodeployError {
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Decision error: {0}")]
    Decision(#[from] DecisionError),

    #[error("Requirements error: {0}")]
    Requirements(#[from] RequirementsError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

/// Errors raised while analyzing a repository.
///
/// Only `Access` and `EmptyRepository` abort an analysis. `UnsupportedManifest`
/// is recoverable: the analyzer records it as a warning and lowers confidence.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Cannot access repository at {path}: {reason}")]
    Access { path: PathBuf, reason: String },

    #[error("No source files found in {path}")]
    EmptyRepository { path: PathBuf },

    #[error("Unsupported manifest {manifest}: {reason}")]
    UnsupportedManifest { manifest: String, reason: String },
}

/// Errors raised by the infrastructure decision engine.
#[derive(Debug, Error)]
pub enum DecisionError {
    #[error("Requested {requested} deployment is incompatible with the application: {reason}")]
    IncompatibleRequirements { requested: String, reason: String },
}

/// Errors raised while turning a free-text description into requirements.
#[derive(Debug, Error)]
pub enum RequirementsError {
    #[error("Deployment description too short (at least {min} characters required)")]
    DescriptionTooShort { min: usize },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParsingFailed(String),

    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

pub type Result<T> = std::result::Result<T, AutodeployError>;
