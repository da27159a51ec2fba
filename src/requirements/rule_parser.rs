//! Keyword and pattern based requirement parsing.
//!
//! Deterministic stand-in for a language-model backed parser: every field is
//! filled from word-boundary keyword tables and a few regular expressions.
//! Anything the description does not mention keeps its default, so the
//! decision engine's precedence rules stay in charge.

use super::types::{CloudProvider, DeploymentRequirements, DeploymentStrategy, ScalingConfig};
use super::RequirementParser;
use crate::analyzer::AnalysisResult;
use crate::common::pattern_utils::{create_regex, keyword_regex};
use crate::error::{RequirementsError, Result};
use regex::Regex;
use std::collections::BTreeSet;

/// Shortest description accepted
pub const MIN_DESCRIPTION_LEN: usize = 10;

/// Upper bound used when scaling is requested without a count
pub const DEFAULT_SCALING_MAX: u32 = 3;

struct KeywordRule<T: 'static> {
    value: T,
    words: &'static [&'static str],
}

static PROVIDER_RULES: &[KeywordRule<CloudProvider>] = &[
    KeywordRule { value: CloudProvider::Aws, words: &["aws", "amazon", "ec2", "lambda", "fargate", "ecs", "eks"] },
    KeywordRule {
        value: CloudProvider::Gcp,
        words: &["gcp", "google cloud", "cloud run", "gke", "compute engine", "cloud functions"],
    },
    KeywordRule { value: CloudProvider::Azure, words: &["azure", "aks", "container apps", "azure functions"] },
];

/// Strategy keywords in precedence order: the most specific runtime wins
static STRATEGY_RULES: &[KeywordRule<DeploymentStrategy>] = &[
    KeywordRule {
        value: DeploymentStrategy::Kubernetes,
        words: &["kubernetes", "k8s", "eks", "gke", "aks", "helm"],
    },
    KeywordRule {
        value: DeploymentStrategy::Serverless,
        words: &["serverless", "lambda", "cloud functions", "azure functions", "faas"],
    },
    KeywordRule {
        value: DeploymentStrategy::Container,
        words: &[
            "container", "containers", "containerized", "docker", "fargate", "cloud run", "ecs", "container apps",
        ],
    },
    KeywordRule {
        value: DeploymentStrategy::Vm,
        words: &["vm", "virtual machine", "ec2", "compute engine", "bare server", "droplet"],
    },
];

static SIZE_RULES: &[KeywordRule<&str>] = &[
    KeywordRule { value: "micro", words: &["tiny", "micro", "hobby", "minimal", "cheapest"] },
    KeywordRule { value: "small", words: &["small", "low traffic", "prototype", "mvp"] },
    KeywordRule { value: "medium", words: &["medium", "moderate traffic", "production"] },
    KeywordRule { value: "large", words: &["large", "high traffic", "heavy", "high performance"] },
];

static SERVICE_RULES: &[KeywordRule<&str>] = &[
    KeywordRule { value: "redis", words: &["redis", "cache", "caching", "memcached", "session store"] },
    KeywordRule { value: "database", words: &["database", "postgres", "postgresql", "mysql", "mongodb", "rds"] },
    KeywordRule {
        value: "queue",
        words: &["queue", "queues", "sqs", "rabbitmq", "pub/sub", "pubsub", "message broker", "background jobs"],
    },
    KeywordRule { value: "storage", words: &["s3", "bucket", "object storage", "file uploads", "blob storage"] },
    KeywordRule { value: "cdn", words: &["cdn", "cloudfront", "edge caching"] },
    KeywordRule { value: "load_balancer", words: &["load balancer", "load balancing", "alb"] },
    KeywordRule {
        value: "high_availability",
        words: &["high availability", "highly available", "ha", "multi-az", "failover", "redundant", "redundancy"],
    },
    KeywordRule { value: "monitoring", words: &["monitoring", "observability", "metrics", "alerting", "dashboards"] },
];

const SCALING_WORDS: &[&str] = &[
    "scale", "scaling", "scalable", "autoscale", "autoscaling", "auto-scale", "auto-scaling", "elastic",
];
const SSL_WORDS: &[&str] = &["ssl", "https", "tls", "certificate", "secure"];
const EUROPE_WORDS: &[&str] = &["europe", "eu", "european", "gdpr"];
const ASIA_WORDS: &[&str] = &["asia", "apac", "singapore"];

const INSTANCE_RANGE: &str =
    r"\b(\d{1,3})\s*(?:-|to)\s*(\d{1,3})\s+(?:instances|replicas|servers|nodes|containers)\b";
const INSTANCE_COUNT: &str = r"\b(\d{1,3})\s+(?:instances|replicas|servers|nodes|containers)\b";
const INSTANCE_TYPE: &str = r"\b([a-z]\d[a-z]?\.(?:nano|micro|small|medium|large|xlarge|\dxlarge)|e2-(?:micro|small|medium|standard-\d+)|standard_[a-z]\d+[a-z_0-9]*)\b";
const REGION: &str = concat!(
    r"\b((?:us|eu|ap|sa|ca|me|af)-(?:east|west|north|south|central|northeast|southeast|northwest|southwest)-\d",
    r"|(?:us|europe|asia|australia|northamerica|southamerica)-(?:east|west|central|north|south|northeast|southeast)\d",
    r"|eastus2?|westus[23]?|centralus|northeurope|westeurope|uksouth|southeastasia|eastasia|japaneast|australiaeast)\b"
);
const DOMAIN: &str = r"\b(?:https?://)?((?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+(?:com|net|org|io|dev|app|co|ai|cloud|tech|site|xyz))\b";

/// Deterministic keyword-driven [`RequirementParser`]
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedParser;

impl RuleBasedParser {
    pub fn new() -> Self {
        Self
    }
}

/// Value of the rule whose keyword appears earliest in `text`
fn earliest<T: Copy>(rules: &[KeywordRule<T>], text: &str) -> Result<Option<T>> {
    let mut best: Option<(usize, T)> = None;
    for rule in rules {
        if let Some(m) = keyword_regex(rule.words)?.find(text) {
            if best.is_none_or(|(start, _)| m.start() < start) {
                best = Some((m.start(), rule.value));
            }
        }
    }
    Ok(best.map(|(_, value)| value))
}

/// Value of the first rule, in table order, with a keyword in `text`
fn first_matching<T: Copy>(rules: &[KeywordRule<T>], text: &str) -> Result<Option<T>> {
    for rule in rules {
        if keyword_regex(rule.words)?.is_match(text) {
            return Ok(Some(rule.value));
        }
    }
    Ok(None)
}

/// Values of every rule with a keyword in `text`
fn all_matching<T: Copy>(rules: &[KeywordRule<T>], text: &str) -> Result<Vec<T>> {
    let mut values = Vec::new();
    for rule in rules {
        if keyword_regex(rule.words)?.is_match(text) {
            values.push(rule.value);
        }
    }
    Ok(values)
}

fn parse_count(value: &str) -> Result<u32> {
    value.parse::<u32>().map_err(|_| {
        RequirementsError::InvalidValue {
            field: "scaling",
            value: value.to_string(),
        }
        .into()
    })
}

fn parse_scaling(text: &str) -> Result<ScalingConfig> {
    let mut scaling = ScalingConfig {
        enabled: keyword_regex(SCALING_WORDS)?.is_match(text),
        ..ScalingConfig::default()
    };

    if let Some(caps) = create_regex(INSTANCE_RANGE)?.captures(text) {
        scaling.enabled = true;
        scaling.min = parse_count(&caps[1])?;
        scaling.max = parse_count(&caps[2])?;
    } else if let Some(caps) = create_regex(INSTANCE_COUNT)?.captures(text) {
        let count = parse_count(&caps[1])?;
        if scaling.enabled {
            scaling.max = count;
        } else {
            scaling.min = count;
            scaling.max = count;
        }
    } else if scaling.enabled {
        scaling.max = DEFAULT_SCALING_MAX;
    }

    scaling.validate()?;
    Ok(scaling)
}

/// Region named explicitly, else a provider default for a named geography
fn parse_region(text: &str, provider: CloudProvider) -> Result<Option<String>> {
    if let Some(m) = create_regex(REGION)?.find(text) {
        return Ok(Some(m.as_str().to_string()));
    }
    let region = if keyword_regex(EUROPE_WORDS)?.is_match(text) {
        match provider {
            CloudProvider::Aws => "eu-west-1",
            CloudProvider::Gcp => "europe-west1",
            CloudProvider::Azure => "westeurope",
        }
    } else if keyword_regex(ASIA_WORDS)?.is_match(text) {
        match provider {
            CloudProvider::Aws => "ap-southeast-1",
            CloudProvider::Gcp => "asia-southeast1",
            CloudProvider::Azure => "southeastasia",
        }
    } else {
        return Ok(None);
    };
    Ok(Some(region.to_string()))
}

impl RequirementParser for RuleBasedParser {
    fn parse(&self, description: &str, analysis: &AnalysisResult) -> Result<DeploymentRequirements> {
        let trimmed = description.trim();
        if trimmed.chars().count() < MIN_DESCRIPTION_LEN {
            return Err(RequirementsError::DescriptionTooShort {
                min: MIN_DESCRIPTION_LEN,
            }
            .into());
        }

        let text = trimmed.to_lowercase();
        let instance_type_regex: Regex = create_regex(INSTANCE_TYPE)?;

        let cloud_provider = earliest(PROVIDER_RULES, &text)?.unwrap_or_default();
        let deployment_type = first_matching(STRATEGY_RULES, &text)?;
        let instance_type = match instance_type_regex.find(&text) {
            Some(m) => Some(m.as_str().to_string()),
            None => first_matching(SIZE_RULES, &text)?.map(String::from),
        };
        let custom_domain = create_regex(DOMAIN)?
            .captures(&text)
            .map(|caps| caps[1].to_string())
            .filter(|domain| !instance_type_regex.is_match(domain));
        let ssl_required = custom_domain.is_some() || keyword_regex(SSL_WORDS)?.is_match(&text);

        let additional_services: BTreeSet<String> = all_matching(SERVICE_RULES, &text)?
            .into_iter()
            .map(String::from)
            .collect();

        if additional_services.contains("database") && !analysis.requires_database {
            log::warn!("Description asks for a database but no database driver was detected");
        }

        let requirements = DeploymentRequirements {
            cloud_provider,
            deployment_type,
            region: parse_region(&text, cloud_provider)?,
            instance_type,
            scaling: parse_scaling(&text)?,
            custom_domain,
            ssl_required,
            additional_services,
            raw_description: description.to_string(),
        };

        log::debug!("Parsed requirements: {:?}", requirements);
        Ok(requirements)
    }
}
