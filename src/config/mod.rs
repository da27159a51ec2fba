pub mod types;

use crate::error::{ConfigError, Result};
use crate::infrastructure::pricing::{PriceTable, format_cents};
use crate::requirements::CloudProvider;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = ".autodeploy.toml";

/// Get the global config file path (~/.autodeploy.toml)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME))
}

/// Get the local config file path (project/.autodeploy.toml)
pub fn local_config_path(project_path: &Path) -> PathBuf {
    project_path.join(CONFIG_FILE_NAME)
}

/// Load configuration from an explicit file. The file must exist and parse.
pub fn load_config_file(path: &Path) -> Result<types::Config> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Load configuration from file or use defaults
/// Checks local config first, then global config
pub fn load_config(project_path: Option<&Path>) -> Result<types::Config> {
    if let Some(path) = project_path {
        let local = local_config_path(path);
        if local.exists() {
            match fs::read_to_string(&local).map(|c| parse_config(&c)) {
                Ok(Ok(config)) => return Ok(config),
                Ok(Err(e)) => log::warn!("Ignoring {}: {}", local.display(), e),
                Err(e) => log::warn!("Cannot read {}: {}", local.display(), e),
            }
        }
    }

    if let Some(global) = global_config_path() {
        if global.exists() {
            match fs::read_to_string(&global).map(|c| parse_config(&c)) {
                Ok(Ok(config)) => return Ok(config),
                Ok(Err(e)) => log::warn!("Ignoring {}: {}", global.display(), e),
                Err(e) => log::warn!("Cannot read {}: {}", global.display(), e),
            }
        }
    }

    Ok(types::Config::default())
}

/// Parse and validate configuration text
pub fn parse_config(content: &str) -> Result<types::Config> {
    let config: types::Config =
        toml::from_str(content).map_err(|e| ConfigError::ParsingFailed(e.to_string()))?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &types::Config) -> Result<()> {
    if config.planner.backup_retention_days == 0 {
        return Err(ConfigError::InvalidValue {
            field: "planner.backup_retention_days".to_string(),
            reason: "must be at least 1 day".to_string(),
        }
        .into());
    }
    if config.analysis.max_files == 0 {
        return Err(ConfigError::InvalidValue {
            field: "analysis.max_files".to_string(),
            reason: "must be greater than zero".to_string(),
        }
        .into());
    }
    for (provider, prices) in &config.pricing {
        if let Some((sku, price)) = prices.iter().find(|(_, p)| !p.is_finite() || **p < 0.0) {
            return Err(ConfigError::InvalidValue {
                field: format!("pricing.{}.{}", provider, sku),
                reason: format!("price {} must be a non-negative number", price),
            }
            .into());
        }
    }
    for provider in CloudProvider::ALL {
        let table = PriceTable::new(provider).with_overrides(&config.pricing);
        if let Some((smaller, larger)) = table.ladder_inversion() {
            return Err(ConfigError::InvalidValue {
                field: format!("pricing.{}", provider),
                reason: format!(
                    "{} ({}) would cost less than the smaller tier {} ({})",
                    larger,
                    format_cents(table.monthly_cents(larger)),
                    smaller,
                    format_cents(table.monthly_cents(smaller))
                ),
            }
            .into());
        }
    }
    Ok(())
}
