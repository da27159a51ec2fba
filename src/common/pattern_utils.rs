use crate::error::{AutodeployError, Result};
use regex::Regex;

/// Compile a detection or keyword pattern, mapping failures to a crate error
pub fn create_regex(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| AutodeployError::InvalidPattern(format!("'{}': {}", pattern, e)))
}

/// Case-sensitive word-boundary alternation of literal keywords
pub fn keyword_regex(words: &[&str]) -> Result<Regex> {
    let alternatives: Vec<String> = words.iter().map(|w| regex::escape(w)).collect();
    create_regex(&format!(r"\b(?:{})\b", alternatives.join("|")))
}
