use super::{create_regex, port::ENV_FILES, source_files};
use crate::analyzer::file_signals::FileSignals;
use crate::error::Result;
use std::collections::BTreeSet;

const ENV_NAME: &str = "[A-Z_][A-Z0-9_]*";

fn reference_patterns() -> Vec<String> {
    [
        r#"os\.environ(?:\.get)?\(\s*["']({name})["']"#,
        r#"os\.environ\[\s*["']({name})["']\s*\]"#,
        r#"getenv\(\s*["']({name})["']"#,
        r"process\.env\.({name})\b",
        r#"process\.env\[\s*["']({name})["']\s*\]"#,
        r#"ENV(?:\.fetch\(|\[)\s*["']({name})["']"#,
        r#"os\.Getenv\(\s*"({name})""#,
        r#"System\.getenv\(\s*"({name})""#,
        r#"\benv\(\s*["']({name})["']"#,
    ]
    .iter()
    .map(|p| p.replace("{name}", ENV_NAME))
    .collect()
}

/// Environment variable names the application reads or documents.
///
/// Names come from example environment files and from variable lookups in
/// at most `scan_limit` source files.
pub fn detect_environment_vars(signals: &FileSignals, scan_limit: usize) -> Result<BTreeSet<String>> {
    let mut names = BTreeSet::new();

    let assignment = create_regex(&format!(r"(?m)^\s*(?:export\s+)?({})\s*=", ENV_NAME))?;
    for file in ENV_FILES {
        if let Some(text) = signals.content(file) {
            for cap in assignment.captures_iter(text) {
                names.insert(cap[1].to_string());
            }
        }
    }

    let references = reference_patterns()
        .iter()
        .map(|p| create_regex(p))
        .collect::<Result<Vec<_>>>()?;

    for file in source_files(signals).take(scan_limit) {
        let Some(text) = file.content.as_deref() else {
            continue;
        };
        for regex in &references {
            for cap in regex.captures_iter(text) {
                names.insert(cap[1].to_string());
            }
        }
    }

    log::debug!("Found {} environment variables", names.len());
    Ok(names)
}

/// Directory names that hold assets served as-is
const STATIC_DIRS: &[&str] = &["static", "public", "assets"];

/// Whether the repository ships static assets
pub fn detect_static_files(signals: &FileSignals) -> bool {
    signals
        .iter()
        .any(|f| f.directories().any(|dir| STATIC_DIRS.contains(&dir)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::file_signals::FileSignal;

    fn signals(files: &[(&str, &str)]) -> FileSignals {
        FileSignals::from_files(
            files
                .iter()
                .map(|(p, c)| FileSignal {
                    path: p.to_string(),
                    content: Some(c.to_string()),
                })
                .collect(),
        )
    }

    #[test]
    fn test_env_names_from_files_and_sources() {
        let s = signals(&[
            (".env.example", "# comment\nSECRET_KEY=\nexport API_TOKEN=abc\n"),
            ("app.py", "import os\nDB = os.environ.get('DATABASE_URL')\nX = os.getenv(\"FEATURE_FLAG\")"),
            ("server.js", "const key = process.env.STRIPE_KEY;"),
            ("main.go", "addr := os.Getenv(\"LISTEN_ADDR\")"),
        ]);
        let names: Vec<String> = detect_environment_vars(&s, 100).unwrap().into_iter().collect();
        assert_eq!(
            names,
            vec!["API_TOKEN", "DATABASE_URL", "FEATURE_FLAG", "LISTEN_ADDR", "SECRET_KEY", "STRIPE_KEY"]
        );
    }

    #[test]
    fn test_static_dirs() {
        assert!(detect_static_files(&signals(&[("app/static/site.css", "")])));
        assert!(!detect_static_files(&signals(&[("static.py", "")])));
    }
}
