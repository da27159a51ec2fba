//! Dependency manifest parsing.
//!
//! Every recognized manifest at the repository root is parsed into a
//! normalized `ecosystem -> [DependencySpec]` map. Manifests are visited in the
//! fixed order of [`ManifestKind::ALL`] and packages keep their declaration
//! order, so the map is deterministic. A manifest that cannot be parsed is
//! skipped and reported as [`AnalysisError::UnsupportedManifest`].

use crate::analyzer::file_signals::FileSignals;
use crate::common::pattern_utils::create_regex;
use crate::error::AnalysisError;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A declared package and its version constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencySpec {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl DependencySpec {
    pub fn new(name: impl Into<String>, version: Option<String>) -> Self {
        Self {
            name: name.into(),
            version: version.filter(|v| !v.is_empty() && v != "*"),
        }
    }
}

/// Ecosystem name to declared packages, in insertion order
pub type DependencyMap = IndexMap<String, Vec<DependencySpec>>;

/// Ecosystems ending with this suffix hold development-only packages
pub const DEV_SUFFIX: &str = "_dev";

/// Whether an ecosystem key holds runtime (non-dev) dependencies
pub fn is_runtime_ecosystem(ecosystem: &str) -> bool {
    !ecosystem.ends_with(DEV_SUFFIX)
}

/// Recognized manifest formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    RequirementsTxt,
    Pipfile,
    PyProject,
    PackageJson,
    Gemfile,
    ComposerJson,
    GoMod,
    PomXml,
}

impl ManifestKind {
    pub const ALL: [ManifestKind; 8] = [
        ManifestKind::RequirementsTxt,
        ManifestKind::Pipfile,
        ManifestKind::PyProject,
        ManifestKind::PackageJson,
        ManifestKind::Gemfile,
        ManifestKind::ComposerJson,
        ManifestKind::GoMod,
        ManifestKind::PomXml,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            ManifestKind::RequirementsTxt => "requirements.txt",
            ManifestKind::Pipfile => "Pipfile",
            ManifestKind::PyProject => "pyproject.toml",
            ManifestKind::PackageJson => "package.json",
            ManifestKind::Gemfile => "Gemfile",
            ManifestKind::ComposerJson => "composer.json",
            ManifestKind::GoMod => "go.mod",
            ManifestKind::PomXml => "pom.xml",
        }
    }

    fn parse(&self, content: &str) -> Result<Vec<(&'static str, Vec<DependencySpec>)>, String> {
        match self {
            ManifestKind::RequirementsTxt => parse_requirements_txt(content),
            ManifestKind::Pipfile => parse_pipfile(content),
            ManifestKind::PyProject => parse_pyproject(content),
            ManifestKind::PackageJson => parse_package_json(content),
            ManifestKind::Gemfile => parse_gemfile(content),
            ManifestKind::ComposerJson => parse_composer_json(content),
            ManifestKind::GoMod => parse_go_mod(content),
            ManifestKind::PomXml => parse_pom_xml(content),
        }
    }
}

/// Result of parsing every manifest in a repository
#[derive(Debug, Default)]
pub struct DependencyAnalysis {
    pub dependencies: DependencyMap,
    /// File names of recognized manifests, in visiting order
    pub manifests_found: Vec<&'static str>,
    pub manifests_parsed: usize,
    pub failures: Vec<AnalysisError>,
}

impl DependencyAnalysis {
    /// Runtime dependency names across all ecosystems, lowercased
    pub fn runtime_names(&self) -> Vec<String> {
        runtime_names(&self.dependencies)
    }
}

/// Runtime dependency names across all ecosystems of a map, lowercased
pub fn runtime_names(dependencies: &DependencyMap) -> Vec<String> {
    dependencies
        .iter()
        .filter(|(eco, _)| is_runtime_ecosystem(eco))
        .flat_map(|(_, deps)| deps.iter().map(|d| d.name.to_lowercase()))
        .collect()
}

/// Whether a dependency name matches a lookup pattern.
///
/// Patterns ending in `:` or `/` are prefixes (Maven group ids, Go module
/// paths, npm scopes); anything else must match the whole name, ignoring case.
pub fn name_matches(pattern: &str, name: &str) -> bool {
    if pattern.ends_with(':') || pattern.ends_with('/') {
        name.to_lowercase().starts_with(pattern)
    } else {
        name.eq_ignore_ascii_case(pattern)
    }
}

/// Parse all recognized manifests at the repository root
pub fn parse_dependencies(signals: &FileSignals) -> DependencyAnalysis {
    let mut analysis = DependencyAnalysis::default();

    for kind in ManifestKind::ALL {
        let Some(file) = signals.get(kind.file_name()) else {
            continue;
        };
        analysis.manifests_found.push(kind.file_name());

        let parsed = match &file.content {
            Some(content) => kind.parse(content),
            None => Err("file is not valid text".to_string()),
        };

        match parsed {
            Ok(groups) => {
                analysis.manifests_parsed += 1;
                for (ecosystem, specs) in groups {
                    log::debug!(
                        "{}: {} {} dependencies",
                        kind.file_name(),
                        specs.len(),
                        ecosystem
                    );
                    insert_specs(&mut analysis.dependencies, ecosystem, specs);
                }
            }
            Err(reason) => {
                log::warn!("Skipping {}: {}", kind.file_name(), reason);
                analysis.failures.push(AnalysisError::UnsupportedManifest {
                    manifest: kind.file_name().to_string(),
                    reason,
                });
            }
        }
    }

    analysis
}

fn insert_specs(map: &mut DependencyMap, ecosystem: &str, specs: Vec<DependencySpec>) {
    let entry = map.entry(ecosystem.to_string()).or_default();
    for spec in specs {
        if !entry.iter().any(|existing| existing.name.eq_ignore_ascii_case(&spec.name)) {
            entry.push(spec);
        }
    }
}

const REQUIREMENT_LINE: &str = r"^([A-Za-z0-9][A-Za-z0-9._-]*)\s*(\[[^\]]*\])?\s*(.*)$";
const GEM_LINE: &str = r#"(?m)^\s*gem\s+['"]([^'"]+)['"](?:\s*,\s*['"]([^'"]+)['"])?"#;
const POM_DEPENDENCY: &str = r"(?s)<dependency>(.*?)</dependency>";

fn compile(pattern: &str) -> Result<Regex, String> {
    create_regex(pattern).map_err(|e| e.to_string())
}

/// Parse one PEP 508 style requirement (`name[extra] >=1.0 ; marker`)
fn parse_requirement(line: &str, requirement_line: &Regex) -> Result<Option<DependencySpec>, String> {
    let line = line.split(" #").next().unwrap_or(line).trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
        return Ok(None);
    }
    if line.contains("://") && !line.contains(" @ ") {
        // bare VCS/URL requirement without a package name
        return Ok(None);
    }

    let caps = requirement_line
        .captures(line)
        .ok_or_else(|| format!("invalid requirement line '{}'", line))?;
    let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    let rest = caps.get(3).map(|m| m.as_str()).unwrap_or_default();
    let constraint = rest.split(';').next().unwrap_or_default().trim();
    let constraint = if constraint.starts_with('@') { "" } else { constraint };

    if !constraint.is_empty() && !constraint.starts_with(['=', '<', '>', '~', '!', '(']) {
        return Err(format!("invalid version constraint in '{}'", line));
    }

    Ok(Some(DependencySpec::new(name, Some(constraint.to_string()))))
}

fn parse_requirements_txt(content: &str) -> Result<Vec<(&'static str, Vec<DependencySpec>)>, String> {
    let requirement_line = compile(REQUIREMENT_LINE)?;
    let mut specs = Vec::new();
    for line in content.lines() {
        if let Some(spec) = parse_requirement(line, &requirement_line)? {
            specs.push(spec);
        }
    }
    Ok(vec![("python", specs)])
}

fn toml_version(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Table(t) => t.get("version").and_then(|v| v.as_str()).map(String::from),
        _ => None,
    }
}

fn toml_table_specs(table: Option<&toml::Value>, skip: &[&str]) -> Vec<DependencySpec> {
    table
        .and_then(|t| t.as_table())
        .map(|t| {
            t.iter()
                .filter(|(name, _)| !skip.contains(&name.as_str()))
                .map(|(name, value)| DependencySpec::new(name.clone(), toml_version(value)))
                .collect()
        })
        .unwrap_or_default()
}

fn parse_pipfile(content: &str) -> Result<Vec<(&'static str, Vec<DependencySpec>)>, String> {
    let value: toml::Value = toml::from_str(content).map_err(|e| e.to_string())?;
    let mut groups = vec![("python", toml_table_specs(value.get("packages"), &[]))];
    let dev = toml_table_specs(value.get("dev-packages"), &[]);
    if !dev.is_empty() {
        groups.push(("python_dev", dev));
    }
    Ok(groups)
}

fn parse_pyproject(content: &str) -> Result<Vec<(&'static str, Vec<DependencySpec>)>, String> {
    let value: toml::Value = toml::from_str(content).map_err(|e| e.to_string())?;
    let requirement_line = compile(REQUIREMENT_LINE)?;
    let mut specs = Vec::new();

    if let Some(deps) = value
        .get("project")
        .and_then(|p| p.get("dependencies"))
        .and_then(|d| d.as_array())
    {
        for dep in deps {
            let line = dep
                .as_str()
                .ok_or_else(|| "project.dependencies must contain strings".to_string())?;
            if let Some(spec) = parse_requirement(line, &requirement_line)? {
                specs.push(spec);
            }
        }
    }

    let poetry = value.get("tool").and_then(|t| t.get("poetry"));
    specs.extend(toml_table_specs(
        poetry.and_then(|p| p.get("dependencies")),
        &["python"],
    ));

    Ok(vec![("python", specs)])
}

fn json_object_specs(value: &Value, key: &str, skip: impl Fn(&str) -> bool) -> Vec<DependencySpec> {
    value
        .get(key)
        .and_then(|d| d.as_object())
        .map(|obj| {
            obj.iter()
                .filter(|(name, _)| !skip(name))
                .map(|(name, version)| {
                    DependencySpec::new(name.clone(), version.as_str().map(String::from))
                })
                .collect()
        })
        .unwrap_or_default()
}

fn parse_package_json(content: &str) -> Result<Vec<(&'static str, Vec<DependencySpec>)>, String> {
    let value: Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
    if !value.is_object() {
        return Err("top-level value is not an object".to_string());
    }
    let mut groups = vec![("node", json_object_specs(&value, "dependencies", |_| false))];
    let dev = json_object_specs(&value, "devDependencies", |_| false);
    if !dev.is_empty() {
        groups.push(("node_dev", dev));
    }
    Ok(groups)
}

fn parse_gemfile(content: &str) -> Result<Vec<(&'static str, Vec<DependencySpec>)>, String> {
    let specs = compile(GEM_LINE)?
        .captures_iter(content)
        .filter_map(|cap| {
            let name = cap.get(1)?.as_str();
            Some(DependencySpec::new(name, cap.get(2).map(|m| m.as_str().to_string())))
        })
        .collect();
    Ok(vec![("ruby", specs)])
}

fn parse_composer_json(content: &str) -> Result<Vec<(&'static str, Vec<DependencySpec>)>, String> {
    let value: Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
    let platform = |name: &str| name == "php" || name.starts_with("ext-");
    let mut groups = vec![("php", json_object_specs(&value, "require", platform))];
    let dev = json_object_specs(&value, "require-dev", platform);
    if !dev.is_empty() {
        groups.push(("php_dev", dev));
    }
    Ok(groups)
}

fn parse_go_mod(content: &str) -> Result<Vec<(&'static str, Vec<DependencySpec>)>, String> {
    if !content.lines().any(|l| l.trim_start().starts_with("module ")) {
        return Err("missing module directive".to_string());
    }

    let mut specs = Vec::new();
    let mut in_block = false;
    for raw in content.lines() {
        let line = raw.split("//").next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let requirement = if in_block {
            if line == ")" {
                in_block = false;
                continue;
            }
            line
        } else if line == "require (" || line == "require(" {
            in_block = true;
            continue;
        } else if let Some(rest) = line.strip_prefix("require ") {
            rest.trim()
        } else {
            continue;
        };

        let mut parts = requirement.split_whitespace();
        if let Some(module) = parts.next() {
            specs.push(DependencySpec::new(module, parts.next().map(String::from)));
        }
    }
    Ok(vec![("go", specs)])
}

fn xml_tag(block: &str, tag: &str) -> Option<String> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let start = block.find(&open)? + open.len();
    let end = block[start..].find(&close)? + start;
    Some(block[start..end].trim().to_string())
}

fn parse_pom_xml(content: &str) -> Result<Vec<(&'static str, Vec<DependencySpec>)>, String> {
    if !content.contains("<project") {
        return Err("missing <project> element".to_string());
    }
    let specs = compile(POM_DEPENDENCY)?
        .captures_iter(content)
        .filter_map(|cap| {
            let block = cap.get(1)?.as_str();
            let group = xml_tag(block, "groupId")?;
            let artifact = xml_tag(block, "artifactId")?;
            Some(DependencySpec::new(
                format!("{}:{}", group, artifact),
                xml_tag(block, "version"),
            ))
        })
        .collect();
    Ok(vec![("java", specs)])
}
