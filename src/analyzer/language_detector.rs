use crate::analyzer::file_signals::FileSignals;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Source languages the analyzer counts.
///
/// Variants are declared in alphabetical order of their identifiers, so the
/// derived `Ord` is the alphabetical tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Go,
    Java,
    #[serde(rename = "javascript")]
    JavaScript,
    Php,
    Python,
    Ruby,
    Rust,
    #[serde(rename = "typescript")]
    TypeScript,
}

impl Language {
    pub const ALL: [Language; 8] = [
        Language::Go,
        Language::Java,
        Language::JavaScript,
        Language::Php,
        Language::Python,
        Language::Ruby,
        Language::Rust,
        Language::TypeScript,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Go => "go",
            Language::Java => "java",
            Language::JavaScript => "javascript",
            Language::Php => "php",
            Language::Python => "python",
            Language::Ruby => "ruby",
            Language::Rust => "rust",
            Language::TypeScript => "typescript",
        }
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::Go => &["go"],
            Language::Java => &["java"],
            Language::JavaScript => &["js", "jsx", "mjs", "cjs"],
            Language::Php => &["php"],
            Language::Python => &["py"],
            Language::Ruby => &["rb"],
            Language::Rust => &["rs"],
            Language::TypeScript => &["ts", "tsx"],
        }
    }

    pub fn from_extension(ext: &str) -> Option<Language> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.extensions().contains(&ext))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Count source files per language
pub fn count_source_files(signals: &FileSignals) -> BTreeMap<Language, usize> {
    let mut counts = BTreeMap::new();
    for file in signals.iter() {
        if let Some(lang) = file.extension().and_then(Language::from_extension) {
            *counts.entry(lang).or_insert(0) += 1;
        }
    }
    counts
}

/// Select the plurality language.
///
/// `framework_languages` lists, best framework first, the ecosystems of the
/// frameworks that scored above zero. On a tie the first tied language any of
/// them supports wins; otherwise the alphabetically first tied language.
pub fn detect_language(
    counts: &BTreeMap<Language, usize>,
    framework_languages: &[&[Language]],
) -> Option<Language> {
    let max = counts.values().copied().max().filter(|m| *m > 0)?;
    let tied: Vec<Language> = counts
        .iter()
        .filter(|(_, count)| **count == max)
        .map(|(lang, _)| *lang)
        .collect();

    if tied.len() > 1 {
        for supported in framework_languages {
            if let Some(lang) = tied.iter().find(|lang| supported.contains(lang)) {
                log::debug!("Language tie between {:?} resolved by framework to {}", tied, lang);
                return Some(*lang);
            }
        }
    }

    tied.first().copied()
}
