//! Runtime context of an application: entry point, build/start commands,
//! listening port and environment variables.

pub mod commands;
pub mod entry_point;
pub mod env;
pub mod port;

pub use commands::{Commands, infer_commands};
pub use entry_point::detect_entry_point;
pub use env::{detect_environment_vars, detect_static_files};
pub use port::{PortSource, detect_port};

use crate::analyzer::file_signals::{FileSignal, FileSignals};
use crate::analyzer::language_detector::Language;
pub(crate) use crate::common::pattern_utils::create_regex;

/// Source files of any known language, in path order
pub(crate) fn source_files(signals: &FileSignals) -> impl Iterator<Item = &FileSignal> {
    signals
        .iter()
        .filter(|f| f.extension().and_then(Language::from_extension).is_some())
}
