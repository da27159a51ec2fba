pub mod file_utils;
pub mod pattern_utils;
