use crate::analyzer::dependency_parser::ManifestKind;
use crate::analyzer::{FRAMEWORK_REGISTRY, Language};
use std::fmt::Write;

pub fn handle_support(languages: bool, frameworks: bool) -> crate::Result<String> {
    let show_all = !languages && !frameworks;
    let mut out = String::new();

    if languages || show_all {
        let _ = writeln!(out, "🌐 Supported Languages:");
        for (i, lang) in Language::ALL.iter().enumerate() {
            let branch = if i + 1 == Language::ALL.len() { "└──" } else { "├──" };
            let _ = writeln!(out, "{} {} (.{})", branch, lang, lang.extensions().join(", ."));
        }
    }

    if frameworks || show_all {
        let _ = writeln!(out, "\n🚀 Supported Frameworks:");
        for (i, rule) in FRAMEWORK_REGISTRY.iter().enumerate() {
            let branch = if i + 1 == FRAMEWORK_REGISTRY.len() { "└──" } else { "├──" };
            let langs: Vec<&str> = rule.framework.languages().iter().map(|l| l.as_str()).collect();
            let _ = writeln!(
                out,
                "{} {} ({}, default port {})",
                branch,
                rule.framework.display_name(),
                langs.join("/"),
                rule.framework.default_port()
            );
        }
    }

    if show_all {
        let manifests: Vec<&str> = ManifestKind::ALL.iter().map(|m| m.file_name()).collect();
        let _ = writeln!(out, "\n📦 Dependency manifests: {}", manifests.join(", "));
        let _ = writeln!(out, "🗄️  Databases: postgresql, mysql, mongodb, sqlite (plus redis)");
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_support_lists_everything_by_default() {
        let out = handle_support(false, false).unwrap();
        assert!(out.contains("python"));
        assert!(out.contains("Spring Boot"));
        assert!(out.contains("pom.xml"));
    }

    #[test]
    fn test_support_languages_only() {
        let out = handle_support(true, false).unwrap();
        assert!(out.contains("typescript"));
        assert!(!out.contains("Frameworks"));
    }
}
