use std::fs;
use std::path::Path;

use autodeploy_cli::analyzer::{
    AnalysisConfig, DatabaseType, Framework, Language, PortSource, analyze_repository,
    analyze_repository_with_config,
};
use autodeploy_cli::error::{AnalysisError, AutodeployError};

const FIXTURES: &str = "tests/fixtures/apps";

struct Case<'a> {
    name: &'a str,
    app_type: &'a str,
    language: Language,
    port: u16,
    database: Option<DatabaseType>,
}

#[test]
fn detects_profile_across_fixtures() {
    let cases = [
        Case { name: "flask", app_type: "flask", language: Language::Python, port: 5000, database: None },
        Case {
            name: "flask-postgres",
            app_type: "flask",
            language: Language::Python,
            port: 5000,
            database: Some(DatabaseType::Postgresql),
        },
        Case { name: "express-redis", app_type: "express", language: Language::JavaScript, port: 4000, database: None },
        Case {
            name: "django-compose",
            app_type: "django",
            language: Language::Python,
            port: 8000,
            database: Some(DatabaseType::Postgresql),
        },
        Case { name: "go-plain", app_type: "generic-go", language: Language::Go, port: 8000, database: None },
    ];

    for case in cases {
        let path = Path::new(FIXTURES).join(case.name);
        let analysis = analyze_repository(&path)
            .unwrap_or_else(|e| panic!("{}: analysis failed: {}", case.name, e));

        assert_eq!(analysis.app_type, case.app_type, "{}: app type", case.name);
        assert_eq!(analysis.language, case.language, "{}: language", case.name);
        assert_eq!(analysis.port, case.port, "{}: port", case.name);
        assert_eq!(analysis.database_type, case.database, "{}: database", case.name);
        assert_eq!(analysis.requires_database, case.database.is_some(), "{}: requires_database", case.name);
        assert!(
            (0.0..=1.0).contains(&analysis.confidence_score),
            "{}: confidence out of range",
            case.name
        );
    }
}

#[test]
fn flask_app_is_recognized_with_high_confidence() {
    let analysis = analyze_repository(&Path::new(FIXTURES).join("flask")).unwrap();

    assert_eq!(analysis.framework, Some(Framework::Flask));
    assert_eq!(analysis.language, Language::Python);
    assert_eq!(analysis.port, 5000);
    assert_eq!(analysis.port_source, PortSource::FrameworkDefault);
    assert_eq!(analysis.entry_point.as_deref(), Some("app.py"));
    assert!(analysis.confidence_score >= 0.8);
    assert_eq!(analysis.dependencies["python"].len(), 1);
    assert!(analysis.warnings.is_empty());
}

#[test]
fn postgres_driver_marks_database() {
    let analysis = analyze_repository(&Path::new(FIXTURES).join("flask-postgres")).unwrap();

    assert!(analysis.requires_database);
    assert_eq!(analysis.database_type, Some(DatabaseType::Postgresql));
    assert_eq!(analysis.runtime_dependency_count(), 2);
}

#[test]
fn express_app_reads_port_and_redis() {
    let analysis = analyze_repository(&Path::new(FIXTURES).join("express-redis")).unwrap();

    assert_eq!(analysis.framework, Some(Framework::Express));
    assert_eq!(analysis.entry_point.as_deref(), Some("server.js"));
    assert_eq!(analysis.port_source, PortSource::SourceCode);
    assert!(analysis.requires_redis);
    assert!(!analysis.requires_database);
    assert!(analysis.environment_vars.contains("REDIS_URL"));
    assert!(analysis.environment_vars.contains("PORT"));
    assert!(analysis.dependencies.contains_key("node_dev"));
    assert_eq!(analysis.runtime_dependency_count(), 2);
}

#[test]
fn compose_project_reports_services() {
    let analysis = analyze_repository(&Path::new(FIXTURES).join("django-compose")).unwrap();

    assert_eq!(analysis.framework, Some(Framework::Django));
    assert_eq!(analysis.port_source, PortSource::EnvFile);
    assert!(analysis.docker_compose_present);
    assert!(!analysis.dockerfile_present);
    assert!(analysis.requires_docker);
    assert!(analysis.compose_services.iter().any(|s| s == "web"));
    assert!(analysis.compose_services.iter().any(|s| s == "db"));
    assert!(analysis.environment_vars.contains("DATABASE_URL"));
}

#[test]
fn plain_source_without_framework_has_low_confidence() {
    let analysis = analyze_repository(&Path::new(FIXTURES).join("go-plain")).unwrap();

    assert_eq!(analysis.framework, None);
    assert_eq!(analysis.port_source, PortSource::Fallback);
    assert!(analysis.confidence_score < 0.5);
}

#[test]
fn function_handler_is_detected() {
    let analysis = analyze_repository(&Path::new(FIXTURES).join("lambda-handler")).unwrap();

    assert!(analysis.serverless_handler);
    assert_eq!(analysis.framework, None);
}

#[test]
fn analysis_is_deterministic() {
    let path = Path::new(FIXTURES).join("express-redis");
    let first = serde_json::to_string(&analyze_repository(&path).unwrap()).unwrap();
    let second = serde_json::to_string(&analyze_repository(&path).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn repository_without_source_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("README.md"), "# nothing here\n").unwrap();
    fs::write(dir.path().join("LICENSE"), "MIT\n").unwrap();

    let err = analyze_repository(dir.path()).unwrap_err();
    assert!(matches!(err, AutodeployError::Analysis(AnalysisError::EmptyRepository { .. })));
}

#[test]
fn missing_path_is_an_access_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = analyze_repository(&dir.path().join("does-not-exist")).unwrap_err();
    assert!(matches!(err, AutodeployError::Analysis(AnalysisError::Access { .. })));
}

#[test]
fn file_path_is_an_access_error() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("app.py");
    fs::write(&file, "print('hi')\n").unwrap();

    let err = analyze_repository(&file).unwrap_err();
    assert!(matches!(err, AutodeployError::Analysis(AnalysisError::Access { .. })));
}

#[test]
fn allowed_root_confines_analysis() {
    let allowed = tempfile::tempdir().unwrap();
    let outside = tempfile::tempdir().unwrap();
    fs::write(outside.path().join("main.py"), "print('hi')\n").unwrap();

    let config = AnalysisConfig {
        allowed_root: Some(allowed.path().to_path_buf()),
        ..Default::default()
    };
    let err = analyze_repository_with_config(outside.path(), &config).unwrap_err();
    assert!(matches!(err, AutodeployError::Analysis(AnalysisError::Access { .. })));

    let inside = allowed.path().join("svc");
    fs::create_dir(&inside).unwrap();
    fs::write(inside.join("main.py"), "print('hi')\n").unwrap();
    assert!(analyze_repository_with_config(&inside, &config).is_ok());
}

#[test]
fn malformed_manifest_becomes_a_warning() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("app.py"), "from flask import Flask\napp = Flask(__name__)\n").unwrap();
    fs::write(dir.path().join("requirements.txt"), "flask==3.0.0\n").unwrap();
    fs::write(dir.path().join("package.json"), "{ \"dependencies\": ").unwrap();

    let analysis = analyze_repository(dir.path()).unwrap();
    assert_eq!(analysis.framework, Some(Framework::Flask));
    assert!(analysis.warnings.iter().any(|w| w.contains("package.json")));
    assert!(analysis.confidence_score < 0.95);
}

#[test]
fn ignored_directories_are_not_analyzed() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("main.py"), "print('hi')\n").unwrap();
    let vendored = dir.path().join("node_modules").join("express");
    fs::create_dir_all(&vendored).unwrap();
    fs::write(vendored.join("index.js"), "module.exports = require('express');\n").unwrap();

    let analysis = analyze_repository(dir.path()).unwrap();
    assert_eq!(analysis.language, Language::Python);
    assert_eq!(analysis.files_analyzed, 1);
}
