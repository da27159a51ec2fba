use crate::analyzer::file_signals::FileSignals;
use crate::analyzer::framework_detector::Framework;
use crate::analyzer::language_detector::Language;
use serde::Serialize;

/// Build and start commands for the detected application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Commands {
    pub build: Option<String>,
    pub start: Option<String>,
}

/// Scripts declared in package.json
#[derive(Debug, Default)]
struct NpmScripts {
    build: bool,
    start: bool,
}

impl NpmScripts {
    fn read(signals: &FileSignals) -> Self {
        let scripts = signals
            .content("package.json")
            .and_then(|text| serde_json::from_str::<serde_json::Value>(text).ok())
            .and_then(|value| value.get("scripts").cloned());
        let has = |name: &str| scripts.as_ref().is_some_and(|s| s.get(name).is_some());
        Self {
            build: has("build"),
            start: has("start"),
        }
    }

    fn install_command(&self) -> String {
        if self.build {
            "npm ci && npm run build".to_string()
        } else {
            "npm ci".to_string()
        }
    }
}

/// Python module path of an entry file (`app/main.py` -> `app.main`)
fn python_module(entry: &str) -> String {
    entry.trim_end_matches(".py").replace('/', ".")
}

fn python_install(signals: &FileSignals) -> Option<String> {
    if signals.contains("requirements.txt") {
        Some("pip install -r requirements.txt".to_string())
    } else if signals.contains("Pipfile") {
        Some("pipenv install --deploy --system".to_string())
    } else if signals.contains("pyproject.toml") {
        Some("pip install .".to_string())
    } else {
        None
    }
}

fn java_build(signals: &FileSignals) -> (Option<String>, &'static str) {
    if signals.contains("pom.xml") {
        (Some("mvn -B package -DskipTests".to_string()), "target")
    } else if signals.contains("build.gradle") || signals.contains("build.gradle.kts") {
        (Some("./gradlew build -x test".to_string()), "build/libs")
    } else {
        (None, "target")
    }
}

/// Infer build and start commands from framework conventions.
pub fn infer_commands(
    signals: &FileSignals,
    framework: Option<Framework>,
    language: Option<Language>,
    entry_point: Option<&str>,
    port: u16,
) -> Commands {
    let npm = NpmScripts::read(signals);

    let commands = match framework {
        Some(Framework::Flask) => Commands {
            build: python_install(signals),
            start: Some(match entry_point {
                Some(entry) => format!("python {}", entry),
                None => format!("flask run --host=0.0.0.0 --port={}", port),
            }),
        },
        Some(Framework::Django) => Commands {
            build: python_install(signals),
            start: Some(format!("python manage.py runserver 0.0.0.0:{}", port)),
        },
        Some(Framework::FastApi) => Commands {
            build: python_install(signals),
            start: Some(format!(
                "uvicorn {}:app --host 0.0.0.0 --port {}",
                entry_point.map(python_module).unwrap_or_else(|| "main".to_string()),
                port
            )),
        },
        Some(Framework::Express) => Commands {
            build: Some(npm.install_command()),
            start: node_start(&npm, entry_point),
        },
        Some(Framework::NextJs) => Commands {
            build: Some("npm ci && npm run build".to_string()),
            start: Some(if npm.start {
                "npm start".to_string()
            } else {
                format!("npx next start -p {}", port)
            }),
        },
        Some(Framework::React) | Some(Framework::Vue) => Commands {
            build: Some("npm ci && npm run build".to_string()),
            start: None,
        },
        Some(Framework::Angular) => Commands {
            build: Some("npm ci && npx ng build".to_string()),
            start: None,
        },
        Some(Framework::Rails) => Commands {
            build: Some("bundle install && bundle exec rails assets:precompile".to_string()),
            start: Some(format!("bundle exec rails server -b 0.0.0.0 -p {}", port)),
        },
        Some(Framework::Laravel) => Commands {
            build: Some("composer install --no-dev --optimize-autoloader".to_string()),
            start: Some(format!("php artisan serve --host=0.0.0.0 --port={}", port)),
        },
        Some(Framework::Spring) => {
            let (build, dir) = java_build(signals);
            Commands {
                build,
                start: Some(format!("java -jar {}/*.jar", dir)),
            }
        }
        None => generic_commands(signals, language, entry_point, port, &npm),
    };

    log::debug!("Commands: build={:?} start={:?}", commands.build, commands.start);
    commands
}

fn node_start(npm: &NpmScripts, entry_point: Option<&str>) -> Option<String> {
    if npm.start {
        Some("npm start".to_string())
    } else {
        entry_point.map(|entry| format!("node {}", entry))
    }
}

fn generic_commands(
    signals: &FileSignals,
    language: Option<Language>,
    entry_point: Option<&str>,
    port: u16,
    npm: &NpmScripts,
) -> Commands {
    match language {
        Some(Language::Python) => Commands {
            build: python_install(signals),
            start: entry_point.map(|entry| format!("python {}", entry)),
        },
        Some(Language::JavaScript) => Commands {
            build: signals.contains("package.json").then(|| npm.install_command()),
            start: node_start(npm, entry_point),
        },
        Some(Language::TypeScript) => Commands {
            build: Some("npm ci && npm run build".to_string()),
            start: if npm.start {
                Some("npm start".to_string())
            } else {
                entry_point.map(|entry| format!("npx ts-node {}", entry))
            },
        },
        Some(Language::Go) => Commands {
            build: Some("go build -o app .".to_string()),
            start: Some("./app".to_string()),
        },
        Some(Language::Rust) => Commands {
            build: Some("cargo build --release".to_string()),
            start: Some("cargo run --release".to_string()),
        },
        Some(Language::Java) => {
            let (build, dir) = java_build(signals);
            Commands {
                build,
                start: entry_point.map(|_| format!("java -jar {}/*.jar", dir)),
            }
        }
        Some(Language::Ruby) => Commands {
            build: signals.contains("Gemfile").then(|| "bundle install".to_string()),
            start: entry_point.map(|entry| {
                if entry.ends_with("config.ru") {
                    format!("bundle exec rackup -o 0.0.0.0 -p {}", port)
                } else {
                    format!("ruby {}", entry)
                }
            }),
        },
        Some(Language::Php) => Commands {
            build: signals
                .contains("composer.json")
                .then(|| "composer install --no-dev".to_string()),
            start: Some(format!("php -S 0.0.0.0:{} -t .", port)),
        },
        None => Commands::default(),
    }
}
