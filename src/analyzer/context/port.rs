use super::{create_regex, source_files};
use crate::analyzer::file_signals::FileSignals;
use crate::analyzer::framework_detector::Framework;
use crate::error::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Port used when nothing else is known
pub const FALLBACK_PORT: u16 = 8000;

/// Example environment files, checked in this order
pub const ENV_FILES: &[&str] = &[".env.example", ".env.sample", "env.example", ".env"];

/// Where the listening port was discovered, strongest evidence first
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PortSource {
    /// An explicit `PORT` entry in an environment example file
    EnvFile,
    /// A port literal in application source
    SourceCode,
    /// The framework's conventional port
    FrameworkDefault,
    /// Nothing found
    Fallback,
}

impl PortSource {
    pub fn description(&self) -> &'static str {
        match self {
            PortSource::EnvFile => "environment file",
            PortSource::SourceCode => "source code",
            PortSource::FrameworkDefault => "framework default",
            PortSource::Fallback => "fallback default",
        }
    }

    /// Sub-score used by the confidence calculation
    pub fn certainty(&self) -> f64 {
        match self {
            PortSource::EnvFile | PortSource::SourceCode => 1.0,
            PortSource::FrameworkDefault => 0.5,
            PortSource::Fallback => 0.0,
        }
    }
}

/// Env keys for the listening port, strongest first. Service ports such as
/// `DB_PORT` or `REDIS_PORT` belong to dependencies and are never read.
const ENV_PORT_PATTERNS: &[&str] = &[
    r#"(?mi)^\s*(?:export\s+)?PORT\s*=\s*["']?(\d{2,5})\b"#,
    r#"(?mi)^\s*(?:export\s+)?(?:APP|SERVER|HTTP|WEB)_PORT\s*=\s*["']?(\d{2,5})\b"#,
];

const SOURCE_PORT_PATTERNS: &[&str] = &[
    r"\.listen\(\s*(\d{2,5})\b",
    r#"(?:environ\.get|getenv)\(\s*["']PORT["']\s*,\s*["']?(\d{2,5})"#,
    r"process\.env\.PORT\s*(?:\|\||\?\?)\s*(\d{2,5})\b",
    r"--port[= ](\d{2,5})\b",
    r#"(?i)\bport\s*[=:]\s*(\d{2,5})\b"#,
    r#"["']:(\d{2,5})["']"#,
];

/// Spring reads its port from resources rather than Java source
pub const CONFIG_SOURCES: &[&str] = &[
    "src/main/resources/application.properties",
    "src/main/resources/application.yml",
    "src/main/resources/application.yaml",
];

fn first_port(regex: &Regex, text: &str) -> Option<u16> {
    regex
        .captures_iter(text)
        .filter_map(|cap| cap.get(1)?.as_str().parse::<u16>().ok())
        .find(|port| *port > 0)
}

/// Resolve the listening port with its source.
///
/// Precedence: environment example file, then port literals in source (entry
/// point first, then the remaining sources in path order, at most
/// `scan_limit` files), then the framework default, then [`FALLBACK_PORT`].
pub fn detect_port(
    signals: &FileSignals,
    framework: Option<Framework>,
    entry_point: Option<&str>,
    scan_limit: usize,
) -> Result<(u16, PortSource)> {
    for pattern in ENV_PORT_PATTERNS {
        let env_regex = create_regex(pattern)?;
        for name in ENV_FILES {
            if let Some(port) = signals.content(name).and_then(|text| first_port(&env_regex, text)) {
                log::debug!("Port {} from {}", port, name);
                return Ok((port, PortSource::EnvFile));
            }
        }
    }

    let source_regexes = SOURCE_PORT_PATTERNS
        .iter()
        .map(|p| create_regex(p))
        .collect::<Result<Vec<_>>>()?;

    let ordered = entry_point
        .into_iter()
        .chain(CONFIG_SOURCES.iter().copied())
        .chain(
            source_files(signals)
                .map(|f| f.path.as_str())
                .filter(|path| Some(*path) != entry_point),
        )
        .take(scan_limit);

    for path in ordered {
        let Some(text) = signals.content(path) else {
            continue;
        };
        if let Some(port) = source_regexes.iter().find_map(|re| first_port(re, text)) {
            log::debug!("Port {} from {}", port, path);
            return Ok((port, PortSource::SourceCode));
        }
    }

    Ok(match framework {
        Some(framework) => (framework.default_port(), PortSource::FrameworkDefault),
        None => (FALLBACK_PORT, PortSource::Fallback),
    })
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
    fn test_env_file_wins() {
        let s = signals(&[
            (".env.example", "DEBUG=1\nAPP_PORT=7000\n"),
            ("server.js", "app.listen(3000)"),
        ]);
        let port = detect_port(&s, Some(Framework::Express), Some("server.js"), 100).unwrap();
        assert_eq!(port, (7000, PortSource::EnvFile));
    }

    #[test]
    fn test_service_ports_in_env_file_are_skipped() {
        let s = signals(&[(
            ".env.example",
            "DB_PORT=5432\nREDIS_PORT=6379\nPOSTGRES_PORT=5433\nPORT=8080\n",
        )]);
        let port = detect_port(&s, Some(Framework::Express), None, 100).unwrap();
        assert_eq!(port, (8080, PortSource::EnvFile));
    }

    #[test]
    fn test_exact_port_key_beats_app_port() {
        let s = signals(&[(".env.example", "APP_PORT=7000\nPORT=8080\n")]);
        let port = detect_port(&s, Some(Framework::Express), None, 100).unwrap();
        assert_eq!(port, (8080, PortSource::EnvFile));
    }

    #[test]
    fn test_only_service_ports_fall_through() {
        let s = signals(&[(".env.example", "DB_PORT=5432\nREDIS_PORT=6379\n")]);
        let port = detect_port(&s, Some(Framework::Flask), None, 100).unwrap();
        assert_eq!(port, (5000, PortSource::FrameworkDefault));
    }

    #[test]
    fn test_source_literal_entry_point_first() {
        let s = signals(&[
            ("a_helper.js", "const PORT = 4000"),
            ("server.js", "app.listen(3001)"),
        ]);
        let port = detect_port(&s, Some(Framework::Express), Some("server.js"), 100).unwrap();
        assert_eq!(port, (3001, PortSource::SourceCode));
    }

    #[test]
    fn test_python_environ_default() {
        let s = signals(&[(
            "app.py",
            "port = int(os.environ.get(\"PORT\", 5050))\napp.run(host='0.0.0.0', port=port)",
        )]);
        let port = detect_port(&s, Some(Framework::Flask), Some("app.py"), 100).unwrap();
        assert_eq!(port, (5050, PortSource::SourceCode));
    }

    #[test]
    fn test_spring_properties() {
        let s = signals(&[("src/main/resources/application.properties", "server.port=9090\n")]);
        let port = detect_port(&s, Some(Framework::Spring), None, 100).unwrap();
        assert_eq!(port, (9090, PortSource::SourceCode));
    }

    #[test]
    fn test_framework_default_then_fallback() {
        let s = signals(&[("app.py", "app.run()")]);
        assert_eq!(
            detect_port(&s, Some(Framework::Flask), Some("app.py"), 100).unwrap(),
            (5000, PortSource::FrameworkDefault)
        );
        assert_eq!(
            detect_port(&s, None, Some("app.py"), 100).unwrap(),
            (FALLBACK_PORT, PortSource::Fallback)
        );
    }
}
