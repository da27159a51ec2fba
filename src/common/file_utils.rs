use crate::error::{AnalysisError, Result};
use std::fs::File;
use std::io::Read;
use std::path::{Component, Path, PathBuf};

/// Resolve and validate a repository root.
///
/// The path is canonicalized so `..` segments and symlinks cannot move the
/// analysis outside `allowed_root` when one is configured.
pub fn validate_project_path(path: &Path, allowed_root: Option<&Path>) -> Result<PathBuf> {
    let canonical = path.canonicalize().map_err(|e| AnalysisError::Access {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    if !canonical.is_dir() {
        return Err(AnalysisError::Access {
            path: path.to_path_buf(),
            reason: "not a directory".to_string(),
        }
        .into());
    }

    if let Some(allowed) = allowed_root {
        let allowed = allowed.canonicalize().map_err(|e| AnalysisError::Access {
            path: allowed.to_path_buf(),
            reason: format!("allowed root is unreadable: {}", e),
        })?;
        if !canonical.starts_with(&allowed) {
            return Err(AnalysisError::Access {
                path: path.to_path_buf(),
                reason: format!("outside of allowed root {}", allowed.display()),
            }
            .into());
        }
    }

    std::fs::read_dir(&canonical).map_err(|e| AnalysisError::Access {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(canonical)
}

/// Read at most `limit` bytes of a file as text.
///
/// Returns `None` for unreadable files and for content that looks binary
/// (a NUL byte in the sample).
pub fn read_sample(path: &Path, limit: usize) -> Option<String> {
    let file = File::open(path).ok()?;
    let mut buffer = Vec::new();
    file.take(limit as u64).read_to_end(&mut buffer).ok()?;

    if buffer.contains(&0) {
        return None;
    }

    Some(String::from_utf8_lossy(&buffer).into_owned())
}

/// Whether any component of a relative path matches one of the ignore patterns.
pub fn is_ignored(relative: &Path, ignore_patterns: &[String]) -> bool {
    relative.components().any(|component| match component {
        Component::Normal(name) => name
            .to_str()
            .is_some_and(|name| ignore_patterns.iter().any(|p| p == name)),
        _ => false,
    })
}

/// Render a relative path with forward slashes so matching is platform independent.
pub fn normalize_relative(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(name) => name.to_str(),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_rejects_missing_path() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        let err = validate_project_path(&missing, None).unwrap_err();
        assert!(err.to_string().contains("Cannot access repository"));
    }

    #[test]
    fn test_validate_rejects_escape_from_allowed_root() {
        let temp = TempDir::new().unwrap();
        let allowed = temp.path().join("allowed");
        let outside = temp.path().join("outside");
        std::fs::create_dir_all(&allowed).unwrap();
        std::fs::create_dir_all(&outside).unwrap();

        let sneaky = allowed.join("..").join("outside");
        assert!(validate_project_path(&sneaky, Some(&allowed)).is_err());
        assert!(validate_project_path(&allowed, Some(temp.path())).is_ok());
    }

    #[test]
    fn test_read_sample_truncates_and_skips_binary() {
        let temp = TempDir::new().unwrap();
        let text = temp.path().join("a.txt");
        std::fs::write(&text, "hello world").unwrap();
        assert_eq!(read_sample(&text, 5).as_deref(), Some("hello"));

        let binary = temp.path().join("b.bin");
        std::fs::write(&binary, [0x7f, 0x00, 0x01]).unwrap();
        assert!(read_sample(&binary, 1024).is_none());
    }

    #[test]
    fn test_is_ignored_matches_components() {
        let patterns = vec!["node_modules".to_string(), ".git".to_string()];
        assert!(is_ignored(Path::new("node_modules/express/index.js"), &patterns));
        assert!(is_ignored(Path::new("web/node_modules/x.js"), &patterns));
        assert!(!is_ignored(Path::new("src/node_modules_helper.js"), &patterns));
    }
}
