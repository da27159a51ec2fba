// Handler modules
pub mod analyze;
pub mod plan;
pub mod support;

// Re-export all handler functions
pub use analyze::handle_analyze;
pub use plan::handle_plan;
pub use support::handle_support;

use crate::config::{self, types::Config};
use std::path::Path;

/// Configuration for a command: an explicit file must load, otherwise the
/// project-local file, then the global file, then defaults.
pub fn resolve_config(explicit: Option<&Path>, project_path: Option<&Path>) -> crate::Result<Config> {
    match explicit {
        Some(path) => config::load_config_file(path),
        None => config::load_config(project_path),
    }
}
