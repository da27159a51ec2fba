use crate::analyzer::file_signals::{FileSignal, FileSignals};
use crate::analyzer::framework_detector::{Framework, IndicatorKind};
use crate::analyzer::language_detector::Language;

/// Locate the file that starts the application.
///
/// With a framework: its canonical files in order, then the first file
/// containing a bootstrap call, then the first file matching its import
/// indicator. Without one: conventional per-language names, then the first
/// file declaring a program `main`.
pub fn detect_entry_point(
    signals: &FileSignals,
    framework: Option<Framework>,
    language: Option<Language>,
) -> Option<String> {
    let entry = match framework {
        Some(framework) => framework_entry_point(signals, framework),
        None => language.and_then(|lang| generic_entry_point(signals, lang)),
    };
    log::debug!("Entry point: {:?}", entry);
    entry
}

fn framework_entry_point(signals: &FileSignals, framework: Framework) -> Option<String> {
    let rule = framework.rule();

    if let Some(file) = rule.entry_files.iter().find(|f| signals.contains(f)) {
        return Some((*file).to_string());
    }

    let files: Vec<&FileSignal> = framework_files(signals, framework).collect();
    let imports: Vec<&str> = rule.patterns(IndicatorKind::Import).collect();
    first_containing(&files, rule.bootstrap_calls).or_else(|| first_containing(&files, &imports))
}

fn first_containing(files: &[&FileSignal], patterns: &[&str]) -> Option<String> {
    files
        .iter()
        .find(|f| {
            f.content
                .as_deref()
                .is_some_and(|text| patterns.iter().any(|p| text.contains(p)))
        })
        .map(|f| f.path.clone())
}

fn framework_files(signals: &FileSignals, framework: Framework) -> impl Iterator<Item = &FileSignal> {
    signals.iter().filter(move |f| {
        f.extension()
            .and_then(Language::from_extension)
            .is_some_and(|lang| framework.supports(lang))
    })
}

fn generic_candidates(language: Language) -> &'static [&'static str] {
    match language {
        Language::Python => &["main.py", "app.py", "__main__.py", "run.py", "server.py", "src/main.py"],
        Language::JavaScript => &["index.js", "server.js", "app.js", "main.js", "src/index.js", "src/server.js"],
        Language::TypeScript => &["index.ts", "server.ts", "main.ts", "src/index.ts", "src/main.ts", "src/server.ts"],
        Language::Go => &["main.go", "cmd/main.go", "cmd/server/main.go"],
        Language::Rust => &["src/main.rs"],
        Language::Java => &[],
        Language::Ruby => &["app.rb", "config.ru", "main.rb"],
        Language::Php => &["index.php", "public/index.php"],
    }
}

fn main_markers(language: Language) -> &'static [&'static str] {
    match language {
        Language::Python => &["if __name__ == \"__main__\"", "if __name__ == '__main__'"],
        Language::JavaScript | Language::TypeScript => &[".listen(", "createServer("],
        Language::Go => &["func main()"],
        Language::Rust => &["fn main()"],
        Language::Java => &["static void main("],
        Language::Ruby | Language::Php => &[],
    }
}

fn generic_entry_point(signals: &FileSignals, language: Language) -> Option<String> {
    if matches!(language, Language::JavaScript | Language::TypeScript) {
        if let Some(main) = package_json_main(signals) {
            return Some(main);
        }
    }

    if let Some(file) = generic_candidates(language).iter().find(|f| signals.contains(f)) {
        return Some((*file).to_string());
    }

    let markers = main_markers(language);
    signals
        .with_extensions(language.extensions())
        .find(|f| {
            f.content
                .as_deref()
                .is_some_and(|text| markers.iter().any(|m| text.contains(m)))
        })
        .map(|f| f.path.clone())
}

/// The `main` field of package.json, when it names an existing file
fn package_json_main(signals: &FileSignals) -> Option<String> {
    let content = signals.content("package.json")?;
    let value: serde_json::Value = serde_json::from_str(content).ok()?;
    let main = value.get("main")?.as_str()?;
    let main = main.trim_start_matches("./");
    signals.contains(main).then(|| main.to_string())
}
