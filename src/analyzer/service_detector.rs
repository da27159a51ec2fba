//! Database and backing-service detection.
//!
//! Detection runs in two phases. Phase one looks up runtime dependency names in
//! the driver tables below. Phase two, which only runs when phase one finds
//! nothing, scans a bounded number of source, environment example, compose and
//! configuration files for connection URL schemes and generic configuration
//! keys. Documentation is never scanned. Redis goes through the same two phases
//! independently of the database.

use crate::analyzer::context::port::{CONFIG_SOURCES, ENV_FILES};
use crate::analyzer::dependency_parser::{DependencyMap, name_matches, runtime_names};
use crate::analyzer::docker_analyzer::COMPOSE_FILES;
use crate::analyzer::file_signals::{FileSignal, FileSignals};
use crate::analyzer::language_detector::Language;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    Postgresql,
    Mysql,
    Mongodb,
    Sqlite,
}

impl DatabaseType {
    /// Engine priority order used when several drivers are present
    pub const PRIORITY: [DatabaseType; 4] = [
        DatabaseType::Postgresql,
        DatabaseType::Mysql,
        DatabaseType::Mongodb,
        DatabaseType::Sqlite,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseType::Postgresql => "postgresql",
            DatabaseType::Mysql => "mysql",
            DatabaseType::Mongodb => "mongodb",
            DatabaseType::Sqlite => "sqlite",
        }
    }

    fn drivers(&self) -> &'static [&'static str] {
        match self {
            DatabaseType::Postgresql => &[
                "psycopg2",
                "psycopg2-binary",
                "psycopg",
                "asyncpg",
                "pg",
                "pg-promise",
                "postgres",
                "github.com/lib/pq",
                "github.com/jackc/pgx/",
                "org.postgresql:",
            ],
            DatabaseType::Mysql => &[
                "mysqlclient",
                "pymysql",
                "mysql-connector-python",
                "mysql",
                "mysql2",
                "github.com/go-sql-driver/mysql",
                "mysql:",
                "com.mysql:",
            ],
            DatabaseType::Mongodb => &[
                "pymongo",
                "motor",
                "mongoengine",
                "mongodb",
                "mongoose",
                "mongoid",
                "go.mongodb.org/",
                "org.mongodb:",
            ],
            DatabaseType::Sqlite => &[
                "sqlite3",
                "better-sqlite3",
                "aiosqlite",
                "github.com/mattn/go-sqlite3",
                "org.xerial:",
            ],
        }
    }

    fn url_schemes(&self) -> &'static [&'static str] {
        match self {
            DatabaseType::Postgresql => &["postgres://", "postgresql://", "postgresql+"],
            DatabaseType::Mysql => &["mysql://", "mysql+"],
            DatabaseType::Mongodb => &["mongodb://", "mongodb+srv://"],
            DatabaseType::Sqlite => &["sqlite://", "sqlite:///"],
        }
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generic keys that imply a relational database without naming the engine
const GENERIC_DATABASE_KEYS: &[&str] = &["DATABASE_URL", "DB_HOST"];

const REDIS_DRIVERS: &[&str] = &[
    "redis",
    "ioredis",
    "django-redis",
    "aioredis",
    "predis/predis",
    "github.com/go-redis/",
    "github.com/redis/go-redis/",
    "org.springframework.boot:spring-boot-starter-data-redis",
    "bull",
    "bullmq",
    "sidekiq",
];

const REDIS_TEXT: &[&str] = &["redis://", "rediss://", "REDIS_URL", "REDIS_HOST"];

const SERVERLESS_DRIVERS: &[&str] = &[
    "mangum",
    "serverless-http",
    "@vendia/serverless-express",
    "aws-serverless-express",
    "functions-framework",
    "@google-cloud/functions-framework",
    "@azure/functions",
    "azure-functions",
    "github.com/aws/aws-lambda-go",
    "chalice",
    "zappa",
];

const SERVERLESS_TEXT: &[&str] = &[
    "def lambda_handler(",
    "def handler(event",
    "exports.handler",
    "module.exports.handler",
    "lambda.Start(",
    "@functions_framework.http",
];

const SERVERLESS_CONFIG_FILES: &[&str] = &["serverless.yml", "serverless.yaml", "template.yaml", "host.json"];

/// Framework configuration that names backing services
const SERVICE_CONFIG_FILES: &[&str] = &["config/database.yml", "config/cable.yml", "config/database.php"];

/// Whether phase two may read this file
fn is_scannable(file: &FileSignal) -> bool {
    let path = file.path.as_str();
    file.extension().and_then(Language::from_extension).is_some()
        || ENV_FILES.contains(&path)
        || COMPOSE_FILES.contains(&path)
        || CONFIG_SOURCES.contains(&path)
        || SERVICE_CONFIG_FILES.contains(&path)
}

/// How a service was detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionPhase {
    Dependency,
    TextScan,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDetection {
    pub database: Option<(DatabaseType, DetectionPhase)>,
    pub redis: Option<DetectionPhase>,
    pub serverless_handler: bool,
}

impl ServiceDetection {
    pub fn database_type(&self) -> Option<DatabaseType> {
        self.database.map(|(db, _)| db)
    }

    pub fn requires_redis(&self) -> bool {
        self.redis.is_some()
    }
}

/// Run database, Redis and serverless handler detection.
///
/// `text_scan_file_limit` bounds how many text files phase two reads.
pub fn detect_services(
    signals: &FileSignals,
    dependencies: &DependencyMap,
    text_scan_file_limit: usize,
) -> ServiceDetection {
    let names = runtime_names(dependencies);
    let scan: Vec<&str> = signals
        .iter()
        .filter(|f| is_scannable(f))
        .filter_map(|f| f.content.as_deref())
        .take(text_scan_file_limit)
        .collect();

    let database = database_from_dependencies(&names)
        .map(|db| (db, DetectionPhase::Dependency))
        .or_else(|| database_from_text(&scan).map(|db| (db, DetectionPhase::TextScan)));

    let redis = if any_name_matches(REDIS_DRIVERS, &names) {
        Some(DetectionPhase::Dependency)
    } else if scan.iter().any(|text| REDIS_TEXT.iter().any(|p| text.contains(p))) {
        Some(DetectionPhase::TextScan)
    } else {
        None
    };

    let serverless_handler = any_name_matches(SERVERLESS_DRIVERS, &names)
        || SERVERLESS_CONFIG_FILES.iter().any(|f| signals.contains(f))
        || scan
            .iter()
            .any(|text| SERVERLESS_TEXT.iter().any(|p| text.contains(p)));

    log::debug!(
        "Service detection: database={:?} redis={:?} serverless_handler={}",
        database,
        redis,
        serverless_handler
    );

    ServiceDetection {
        database,
        redis,
        serverless_handler,
    }
}

fn any_name_matches(patterns: &[&str], names: &[String]) -> bool {
    patterns
        .iter()
        .any(|pattern| names.iter().any(|name| name_matches(pattern, name)))
}

fn database_from_dependencies(names: &[String]) -> Option<DatabaseType> {
    DatabaseType::PRIORITY
        .into_iter()
        .find(|db| any_name_matches(db.drivers(), names))
}

fn database_from_text(scan: &[&str]) -> Option<DatabaseType> {
    DatabaseType::PRIORITY
        .into_iter()
        .find(|db| {
            scan.iter()
                .any(|text| db.url_schemes().iter().any(|s| text.contains(s)))
        })
        .or_else(|| {
            scan.iter()
                .any(|text| GENERIC_DATABASE_KEYS.iter().any(|k| text.contains(k)))
                .then_some(DatabaseType::Postgresql)
        })
}
