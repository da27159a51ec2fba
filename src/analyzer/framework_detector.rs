//! Weighted framework detection.
//!
//! Every framework in [`FRAMEWORK_REGISTRY`] is scored against the repository
//! signals. An indicator contributes its weight at most once, no matter how many
//! of its patterns match. The highest score wins; ties go to the framework
//! declared first in the registry.

use crate::analyzer::dependency_parser::{DependencyMap, name_matches};
use crate::analyzer::file_signals::FileSignals;
use crate::analyzer::language_detector::Language;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Frameworks the analyzer recognizes, in registry order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    Flask,
    Django,
    #[serde(rename = "fastapi")]
    FastApi,
    Express,
    #[serde(rename = "nextjs")]
    NextJs,
    React,
    Vue,
    Angular,
    Rails,
    Laravel,
    Spring,
}

const JS_FAMILY: &[Language] = &[Language::JavaScript, Language::TypeScript];

impl Framework {
    pub fn as_str(&self) -> &'static str {
        match self {
            Framework::Flask => "flask",
            Framework::Django => "django",
            Framework::FastApi => "fastapi",
            Framework::Express => "express",
            Framework::NextJs => "nextjs",
            Framework::React => "react",
            Framework::Vue => "vue",
            Framework::Angular => "angular",
            Framework::Rails => "rails",
            Framework::Laravel => "laravel",
            Framework::Spring => "spring",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Framework::Flask => "Flask",
            Framework::Django => "Django",
            Framework::FastApi => "FastAPI",
            Framework::Express => "Express.js",
            Framework::NextJs => "Next.js",
            Framework::React => "React",
            Framework::Vue => "Vue.js",
            Framework::Angular => "Angular",
            Framework::Rails => "Ruby on Rails",
            Framework::Laravel => "Laravel",
            Framework::Spring => "Spring Boot",
        }
    }

    /// Languages a framework can be written in
    pub fn languages(&self) -> &'static [Language] {
        match self {
            Framework::Flask | Framework::Django | Framework::FastApi => &[Language::Python],
            Framework::Express
            | Framework::NextJs
            | Framework::React
            | Framework::Vue
            | Framework::Angular => JS_FAMILY,
            Framework::Rails => &[Language::Ruby],
            Framework::Laravel => &[Language::Php],
            Framework::Spring => &[Language::Java],
        }
    }

    pub fn supports(&self, language: Language) -> bool {
        self.languages().contains(&language)
    }

    /// Port the framework's development/production server listens on by default
    pub fn default_port(&self) -> u16 {
        match self {
            Framework::Flask => 5000,
            Framework::Django | Framework::FastApi | Framework::Laravel => 8000,
            Framework::Express | Framework::NextJs | Framework::React | Framework::Rails => 3000,
            Framework::Vue | Framework::Spring => 8080,
            Framework::Angular => 4200,
        }
    }

    /// Single-page frontends that build to static assets
    pub fn is_frontend_only(&self) -> bool {
        matches!(self, Framework::React | Framework::Vue | Framework::Angular)
    }

    /// Whether the deployed app is a long-running listening server
    pub fn is_persistent_server(&self) -> bool {
        !self.is_frontend_only()
    }

    pub fn is_jvm(&self) -> bool {
        matches!(self, Framework::Spring)
    }

    pub fn rule(&self) -> &'static FrameworkRule {
        FRAMEWORK_REGISTRY
            .iter()
            .find(|rule| rule.framework == *self)
            .unwrap_or(&FRAMEWORK_REGISTRY[0])
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of evidence an indicator looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    /// A manifest declares the framework package
    Manifest,
    /// An import/require statement in a source file of the framework's languages
    Import,
    /// A configuration file unique to the framework
    ConfigFile,
}

impl IndicatorKind {
    pub fn weight(&self) -> u32 {
        match self {
            IndicatorKind::Manifest => 1,
            IndicatorKind::Import => 2,
            IndicatorKind::ConfigFile => 1,
        }
    }
}

#[derive(Debug)]
pub struct Indicator {
    pub kind: IndicatorKind,
    pub patterns: &'static [&'static str],
}

/// Detection and convention data for one framework
#[derive(Debug)]
pub struct FrameworkRule {
    pub framework: Framework,
    pub indicators: &'static [Indicator],
    /// Canonical entry point paths, most conventional first
    pub entry_files: &'static [&'static str],
    /// Calls that only appear in the file that boots the app
    pub bootstrap_calls: &'static [&'static str],
}

impl FrameworkRule {
    pub fn patterns(&self, kind: IndicatorKind) -> impl Iterator<Item = &'static str> {
        self.indicators
            .iter()
            .filter(move |i| i.kind == kind)
            .flat_map(|i| i.patterns.iter().copied())
    }
}

/// Registry of known frameworks. Declaration order is the tie-break order.
pub static FRAMEWORK_REGISTRY: &[FrameworkRule] = &[
    FrameworkRule {
        framework: Framework::Flask,
        indicators: &[
            Indicator { kind: IndicatorKind::Manifest, patterns: &["flask"] },
            Indicator { kind: IndicatorKind::Import, patterns: &["from flask import", "import flask"] },
        ],
        entry_files: &["app.py", "main.py", "wsgi.py", "application.py", "run.py", "server.py"],
        bootstrap_calls: &["Flask(__name__)", "Flask("],
    },
    FrameworkRule {
        framework: Framework::Django,
        indicators: &[
            Indicator { kind: IndicatorKind::Manifest, patterns: &["django"] },
            Indicator { kind: IndicatorKind::Import, patterns: &["from django", "import django"] },
            Indicator { kind: IndicatorKind::ConfigFile, patterns: &["manage.py"] },
        ],
        entry_files: &["manage.py"],
        bootstrap_calls: &["execute_from_command_line", "get_wsgi_application"],
    },
    FrameworkRule {
        framework: Framework::FastApi,
        indicators: &[
            Indicator { kind: IndicatorKind::Manifest, patterns: &["fastapi"] },
            Indicator { kind: IndicatorKind::Import, patterns: &["from fastapi import", "import fastapi"] },
        ],
        entry_files: &["main.py", "app/main.py", "src/main.py", "app.py", "api/main.py"],
        bootstrap_calls: &["FastAPI("],
    },
    FrameworkRule {
        framework: Framework::Express,
        indicators: &[
            Indicator { kind: IndicatorKind::Manifest, patterns: &["express"] },
            Indicator {
                kind: IndicatorKind::Import,
                patterns: &["require('express')", "require(\"express\")", "from 'express'", "from \"express\""],
            },
        ],
        entry_files: &[
            "server.js", "app.js", "index.js", "src/server.js", "src/app.js", "src/index.js",
            "server.ts", "app.ts", "index.ts", "src/server.ts", "src/app.ts", "src/index.ts",
        ],
        bootstrap_calls: &["express()", ".listen("],
    },
    FrameworkRule {
        framework: Framework::NextJs,
        indicators: &[
            Indicator { kind: IndicatorKind::Manifest, patterns: &["next"] },
            Indicator {
                kind: IndicatorKind::Import,
                patterns: &["from 'next/", "from \"next/", "from 'next'", "from \"next\"", "require('next')"],
            },
            Indicator {
                kind: IndicatorKind::ConfigFile,
                patterns: &["next.config.js", "next.config.mjs", "next.config.ts"],
            },
        ],
        entry_files: &[
            "pages/_app.js", "pages/_app.tsx", "pages/index.js", "pages/index.tsx",
            "app/layout.tsx", "app/layout.js", "src/app/layout.tsx", "src/pages/_app.tsx",
        ],
        bootstrap_calls: &["export default function RootLayout"],
    },
    FrameworkRule {
        framework: Framework::React,
        indicators: &[
            Indicator { kind: IndicatorKind::Manifest, patterns: &["react", "react-dom", "react-scripts"] },
            Indicator {
                kind: IndicatorKind::Import,
                patterns: &["from 'react'", "from \"react\"", "require('react')", "from 'react-dom"],
            },
        ],
        entry_files: &["src/index.js", "src/index.jsx", "src/index.tsx", "src/main.jsx", "src/main.tsx"],
        bootstrap_calls: &["createRoot(", "ReactDOM.render("],
    },
    FrameworkRule {
        framework: Framework::Vue,
        indicators: &[
            Indicator { kind: IndicatorKind::Manifest, patterns: &["vue"] },
            Indicator { kind: IndicatorKind::Import, patterns: &["from 'vue'", "from \"vue\""] },
            Indicator { kind: IndicatorKind::ConfigFile, patterns: &["vue.config.js"] },
        ],
        entry_files: &["src/main.js", "src/main.ts"],
        bootstrap_calls: &["createApp(", "new Vue("],
    },
    FrameworkRule {
        framework: Framework::Angular,
        indicators: &[
            Indicator { kind: IndicatorKind::Manifest, patterns: &["@angular/core"] },
            Indicator { kind: IndicatorKind::Import, patterns: &["from '@angular/core'", "from \"@angular/core\""] },
            Indicator { kind: IndicatorKind::ConfigFile, patterns: &["angular.json"] },
        ],
        entry_files: &["src/main.ts"],
        bootstrap_calls: &["bootstrapModule(", "bootstrapApplication("],
    },
    FrameworkRule {
        framework: Framework::Rails,
        indicators: &[
            Indicator { kind: IndicatorKind::Manifest, patterns: &["rails"] },
            Indicator {
                kind: IndicatorKind::Import,
                patterns: &["require 'rails", "require \"rails", "Rails.application", "< ApplicationController"],
            },
            Indicator { kind: IndicatorKind::ConfigFile, patterns: &["bin/rails", "config/application.rb"] },
        ],
        entry_files: &["config.ru", "config/application.rb"],
        bootstrap_calls: &["Rails.application"],
    },
    FrameworkRule {
        framework: Framework::Laravel,
        indicators: &[
            Indicator { kind: IndicatorKind::Manifest, patterns: &["laravel/framework"] },
            Indicator { kind: IndicatorKind::Import, patterns: &["use Illuminate\\"] },
            Indicator { kind: IndicatorKind::ConfigFile, patterns: &["artisan"] },
        ],
        entry_files: &["artisan", "public/index.php"],
        bootstrap_calls: &["Illuminate\\Foundation\\Application"],
    },
    FrameworkRule {
        framework: Framework::Spring,
        indicators: &[
            Indicator { kind: IndicatorKind::Manifest, patterns: &["org.springframework.boot:"] },
            Indicator { kind: IndicatorKind::Import, patterns: &["import org.springframework"] },
            Indicator {
                kind: IndicatorKind::ConfigFile,
                patterns: &[
                    "src/main/resources/application.properties",
                    "src/main/resources/application.yml",
                    "src/main/resources/application.yaml",
                ],
            },
        ],
        entry_files: &[],
        bootstrap_calls: &["SpringApplication.run"],
    },
];

/// Score of one framework against a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkScore {
    pub framework: Framework,
    pub score: u32,
    pub matched: Vec<IndicatorKind>,
}

impl FrameworkScore {
    /// Certainty in [0, 1]; a score of 3 or more is certain
    pub fn certainty(&self) -> f64 {
        (f64::from(self.score) / 3.0).min(1.0)
    }
}

/// Score every registered framework.
///
/// Returns frameworks with a score above zero, ranked by score then by
/// registry order.
pub fn score_frameworks(signals: &FileSignals, dependencies: &DependencyMap) -> Vec<FrameworkScore> {
    let names: Vec<&str> = dependencies
        .values()
        .flat_map(|deps| deps.iter().map(|d| d.name.as_str()))
        .collect();

    let mut scores: Vec<FrameworkScore> = FRAMEWORK_REGISTRY
        .iter()
        .filter_map(|rule| {
            let mut score = 0;
            let mut matched = Vec::new();
            for indicator in rule.indicators {
                if indicator_matches(rule, indicator, signals, &names) {
                    score += indicator.kind.weight();
                    matched.push(indicator.kind);
                }
            }
            (score > 0).then_some(FrameworkScore {
                framework: rule.framework,
                score,
                matched,
            })
        })
        .collect();

    // stable: equal scores keep registry order
    scores.sort_by(|a, b| b.score.cmp(&a.score));

    for s in &scores {
        log::debug!("Framework {} scored {} ({:?})", s.framework, s.score, s.matched);
    }
    scores
}

fn indicator_matches(
    rule: &FrameworkRule,
    indicator: &Indicator,
    signals: &FileSignals,
    dependency_names: &[&str],
) -> bool {
    match indicator.kind {
        IndicatorKind::Manifest => indicator.patterns.iter().any(|pattern| {
            dependency_names
                .iter()
                .any(|name| name_matches(pattern, name))
        }),
        IndicatorKind::ConfigFile => indicator.patterns.iter().any(|p| signals.contains(p)),
        IndicatorKind::Import => {
            let extensions: Vec<&str> = rule
                .framework
                .languages()
                .iter()
                .flat_map(|lang| lang.extensions().iter().copied())
                .collect();
            signals.with_extensions(&extensions).any(|file| {
                file.content
                    .as_deref()
                    .is_some_and(|text| indicator.patterns.iter().any(|p| text.contains(p)))
            })
        }
    }
}

/// Pick the framework for the detected language.
///
/// `ranked` must come from [`score_frameworks`]. When the top framework cannot
/// be written in `language`, the best compatible one is used instead.
pub fn select_framework(ranked: &[FrameworkScore], language: Option<Language>) -> Option<&FrameworkScore> {
    let best = ranked.first()?;
    let Some(language) = language else {
        return Some(best);
    };
    if best.framework.supports(language) {
        return Some(best);
    }

    let compatible = ranked.iter().find(|s| s.framework.supports(language));
    log::debug!(
        "Top framework {} does not match language {}, using {:?}",
        best.framework,
        language,
        compatible.map(|s| s.framework)
    );
    compatible
}
