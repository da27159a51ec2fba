//! File signal extraction.
//!
//! Walks a repository and produces `(relative path, content sample)` pairs.
//! No inference happens here. Content is sampled in parallel with `rayon`, but
//! the path list is sorted before reading and the indexed collect keeps that
//! order, so the output is identical across runs.

use crate::analyzer::AnalysisConfig;
use crate::common::file_utils::{is_ignored, normalize_relative, read_sample};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One file of the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSignal {
    /// Path relative to the repository root, `/`-separated
    pub path: String,
    /// First `max_file_size` bytes as text, `None` for binary or unreadable files
    pub content: Option<String>,
}

impl FileSignal {
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name();
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() { None } else { Some(ext) }
    }

    /// Directory components of the path, excluding the file name
    pub fn directories(&self) -> impl Iterator<Item = &str> {
        let mut parts: Vec<&str> = self.path.split('/').collect();
        parts.pop();
        parts.into_iter()
    }
}

/// The ordered set of files extracted from a repository
#[derive(Debug, Clone, Default)]
pub struct FileSignals {
    files: Vec<FileSignal>,
    truncated: bool,
}

impl FileSignals {
    /// Walk `root` and sample every non-ignored regular file.
    ///
    /// Symlinks are not followed. Unreadable subdirectories are logged and
    /// skipped. The walk stops after `config.max_files` files.
    pub fn extract(root: &Path, config: &AnalysisConfig) -> Self {
        let mut paths: Vec<(PathBuf, String)> = Vec::new();
        let mut truncated = false;

        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || entry
                        .path()
                        .strip_prefix(root)
                        .map(|rel| !is_ignored(rel, &config.ignore_patterns))
                        .unwrap_or(false)
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable path during walk: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if paths.len() >= config.max_files {
                truncated = true;
                log::warn!(
                    "File limit of {} reached, remaining files are not analyzed",
                    config.max_files
                );
                break;
            }
            if let Ok(rel) = entry.path().strip_prefix(root) {
                paths.push((entry.path().to_path_buf(), normalize_relative(rel)));
            }
        }

        paths.sort_by(|a, b| a.1.cmp(&b.1));

        let files: Vec<FileSignal> = paths
            .par_iter()
            .map(|(absolute, relative)| FileSignal {
                path: relative.clone(),
                content: read_sample(absolute, config.max_file_size),
            })
            .collect();

        log::debug!("Extracted {} file signals from {}", files.len(), root.display());
        Self { files, truncated }
    }

    /// Build a signal set from in-memory files (sorted by path on construction).
    pub fn from_files(mut files: Vec<FileSignal>) -> Self {
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Self {
            files,
            truncated: false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileSignal> {
        self.files.iter()
    }

    pub fn get(&self, path: &str) -> Option<&FileSignal> {
        self.files
            .binary_search_by(|f| f.path.as_str().cmp(path))
            .ok()
            .map(|idx| &self.files[idx])
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn content(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|f| f.content.as_deref())
    }

    /// Files whose extension is one of `extensions`, in path order
    pub fn with_extensions<'a>(
        &'a self,
        extensions: &'a [&'a str],
    ) -> impl Iterator<Item = &'a FileSignal> + 'a {
        self.files
            .iter()
            .filter(move |f| f.extension().is_some_and(|ext| extensions.contains(&ext)))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Whether the walk stopped early because of the file limit
    pub fn truncated(&self) -> bool {
        self.truncated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_extract_sorted_and_ignores_patterns() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "b.py", "print('b')");
        write(temp.path(), "a/z.py", "print('z')");
        write(temp.path(), "node_modules/express/index.js", "module.exports = {}");

        let signals = FileSignals::extract(temp.path(), &AnalysisConfig::default());
        let paths: Vec<&str> = signals.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["a/z.py", "b.py"]);
        assert_eq!(signals.content("b.py"), Some("print('b')"));
        assert!(!signals.truncated());
    }

    #[test]
    fn test_extract_respects_file_limit() {
        let temp = TempDir::new().unwrap();
        for i in 0..5 {
            write(temp.path(), &format!("f{}.py", i), "x = 1");
        }
        let config = AnalysisConfig {
            max_files: 3,
            ..AnalysisConfig::default()
        };
        let signals = FileSignals::extract(temp.path(), &config);
        assert_eq!(signals.len(), 3);
        assert!(signals.truncated());
    }

    #[test]
    fn test_file_signal_helpers() {
        let signal = FileSignal {
            path: "static/css/site.css".to_string(),
            content: None,
        };
        assert_eq!(signal.file_name(), "site.css");
        assert_eq!(signal.extension(), Some("css"));
        assert_eq!(signal.directories().collect::<Vec<_>>(), vec!["static", "css"]);

        let dotfile = FileSignal {
            path: ".env".to_string(),
            content: None,
        };
        assert_eq!(dotfile.extension(), None);
    }
}
