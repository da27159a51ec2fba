use crate::error::RequirementsError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Target cloud provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudProvider {
    #[default]
    Aws,
    Gcp,
    Azure,
}

impl CloudProvider {
    pub const ALL: [CloudProvider; 3] = [CloudProvider::Aws, CloudProvider::Gcp, CloudProvider::Azure];

    pub fn as_str(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "aws",
            CloudProvider::Gcp => "gcp",
            CloudProvider::Azure => "azure",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "AWS",
            CloudProvider::Gcp => "GCP",
            CloudProvider::Azure => "Azure",
        }
    }
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CloudProvider {
    type Err = RequirementsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aws" | "amazon" => Ok(CloudProvider::Aws),
            "gcp" | "google" => Ok(CloudProvider::Gcp),
            "azure" | "microsoft" => Ok(CloudProvider::Azure),
            _ => Err(RequirementsError::InvalidValue {
                field: "cloud_provider",
                value: s.to_string(),
            }),
        }
    }
}

/// How the application is run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStrategy {
    Vm,
    Container,
    Kubernetes,
    Serverless,
}

impl DeploymentStrategy {
    pub const ALL: [DeploymentStrategy; 4] = [
        DeploymentStrategy::Vm,
        DeploymentStrategy::Container,
        DeploymentStrategy::Kubernetes,
        DeploymentStrategy::Serverless,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentStrategy::Vm => "vm",
            DeploymentStrategy::Container => "container",
            DeploymentStrategy::Kubernetes => "kubernetes",
            DeploymentStrategy::Serverless => "serverless",
        }
    }
}

impl fmt::Display for DeploymentStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeploymentStrategy {
    type Err = RequirementsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vm" | "virtual-machine" => Ok(DeploymentStrategy::Vm),
            "container" | "containers" => Ok(DeploymentStrategy::Container),
            "kubernetes" | "k8s" => Ok(DeploymentStrategy::Kubernetes),
            "serverless" | "function" => Ok(DeploymentStrategy::Serverless),
            _ => Err(RequirementsError::InvalidValue {
                field: "deployment_type",
                value: s.to_string(),
            }),
        }
    }
}

/// Horizontal scaling request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalingConfig {
    pub enabled: bool,
    pub min: u32,
    pub max: u32,
}

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            min: 1,
            max: 1,
        }
    }
}

impl ScalingConfig {
    /// Upper bound accepted for a requested instance count
    pub const MAX_INSTANCES: u32 = 100;

    pub fn validate(&self) -> Result<(), RequirementsError> {
        if self.min == 0 || self.max < self.min || self.max > Self::MAX_INSTANCES {
            return Err(RequirementsError::InvalidValue {
                field: "scaling",
                value: format!("{}..{}", self.min, self.max),
            });
        }
        Ok(())
    }
}

/// Deployment requirements extracted from a free-text description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRequirements {
    pub cloud_provider: CloudProvider,
    /// Only set when the description asks for a strategy explicitly
    pub deployment_type: Option<DeploymentStrategy>,
    pub region: Option<String>,
    /// Instance type or size word (`micro`, `small`, `medium`, `large`)
    pub instance_type: Option<String>,
    pub scaling: ScalingConfig,
    pub custom_domain: Option<String>,
    pub ssl_required: bool,
    pub additional_services: BTreeSet<String>,
    pub raw_description: String,
}

impl DeploymentRequirements {
    pub fn with_provider(mut self, provider: CloudProvider) -> Self {
        self.cloud_provider = provider;
        self
    }

    pub fn with_deployment_type(mut self, strategy: DeploymentStrategy) -> Self {
        self.deployment_type = Some(strategy);
        self
    }

    pub fn wants(&self, service: &str) -> bool {
        self.additional_services.contains(service)
    }
}
