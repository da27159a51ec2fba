//! Static per-provider catalog: compute ladders, database classes, regions and
//! the SKUs used for supporting services.
//!
//! Ladders are ordered smallest first; sizing moves up a ladder by index.

use crate::analyzer::DatabaseType;
use crate::requirements::{CloudProvider, DeploymentStrategy};

/// One rung of a sizing ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tier {
    /// SKU id, also the price table key (e.g. "t3.small", "e2-medium")
    pub id: &'static str,
    /// Size word the rung answers to (micro, small, medium, large)
    pub size: &'static str,
    pub cpu: &'static str,
    pub memory: &'static str,
}

/// A cloud region option
#[derive(Debug, Clone, Copy)]
pub struct CloudRegion {
    pub id: &'static str,
    pub name: &'static str,
}

/// SKUs of the supporting services a decision can add
#[derive(Debug, Clone, Copy)]
pub struct ServiceCatalog {
    pub cache: &'static str,
    pub object_storage: &'static str,
    pub dns_zone: &'static str,
    pub certificate: &'static str,
    pub queue: &'static str,
    pub cdn: &'static str,
    pub monitoring: &'static str,
    pub load_balancer: &'static str,
    pub kubernetes_control_plane: &'static str,
    pub egress: &'static str,
    pub persistent_volume: &'static str,
    /// Price key of one GB-month of managed database storage
    pub database_storage: &'static str,
}

// =============================================================================
// AWS
// =============================================================================

pub static AWS_VM_TIERS: &[Tier] = &[
    Tier { id: "t3.micro", size: "micro", cpu: "2", memory: "1 GB" },
    Tier { id: "t3.small", size: "small", cpu: "2", memory: "2 GB" },
    Tier { id: "t3.medium", size: "medium", cpu: "2", memory: "4 GB" },
    Tier { id: "t3.large", size: "large", cpu: "2", memory: "8 GB" },
];

pub static AWS_CONTAINER_TIERS: &[Tier] = &[
    Tier { id: "fargate-0.25vcpu-0.5gb", size: "micro", cpu: "0.25", memory: "0.5 GB" },
    Tier { id: "fargate-0.5vcpu-1gb", size: "small", cpu: "0.5", memory: "1 GB" },
    Tier { id: "fargate-1vcpu-2gb", size: "medium", cpu: "1", memory: "2 GB" },
    Tier { id: "fargate-2vcpu-4gb", size: "large", cpu: "2", memory: "4 GB" },
];

pub static AWS_SERVERLESS_TIERS: &[Tier] = &[
    Tier { id: "lambda-256mb", size: "micro", cpu: "shared", memory: "256 MB" },
    Tier { id: "lambda-512mb", size: "small", cpu: "shared", memory: "512 MB" },
    Tier { id: "lambda-1024mb", size: "medium", cpu: "shared", memory: "1 GB" },
    Tier { id: "lambda-2048mb", size: "large", cpu: "shared", memory: "2 GB" },
];

pub static AWS_DATABASE_TIERS: &[Tier] = &[
    Tier { id: "db.t3.micro", size: "micro", cpu: "2", memory: "1 GB" },
    Tier { id: "db.t3.small", size: "small", cpu: "2", memory: "2 GB" },
    Tier { id: "db.t3.medium", size: "medium", cpu: "2", memory: "4 GB" },
];

pub static AWS_REGIONS: &[CloudRegion] = &[
    CloudRegion { id: "us-east-1", name: "N. Virginia" },
    CloudRegion { id: "us-east-2", name: "Ohio" },
    CloudRegion { id: "us-west-2", name: "Oregon" },
    CloudRegion { id: "eu-west-1", name: "Ireland" },
    CloudRegion { id: "eu-central-1", name: "Frankfurt" },
    CloudRegion { id: "ap-southeast-1", name: "Singapore" },
    CloudRegion { id: "ap-northeast-1", name: "Tokyo" },
];

static AWS_SERVICES: ServiceCatalog = ServiceCatalog {
    cache: "elasticache-redis-t3.micro",
    object_storage: "s3-standard-100gb",
    dns_zone: "route53-hosted-zone",
    certificate: "acm-certificate",
    queue: "sqs-standard",
    cdn: "cloudfront",
    monitoring: "cloudwatch",
    load_balancer: "alb",
    kubernetes_control_plane: "eks-control-plane",
    egress: "egress-100gb",
    persistent_volume: "ebs-gp3-20gb",
    database_storage: "rds-storage-gb",
};

// =============================================================================
// GCP
// =============================================================================

pub static GCP_VM_TIERS: &[Tier] = &[
    Tier { id: "e2-micro", size: "micro", cpu: "0.25", memory: "1 GB" },
    Tier { id: "e2-small", size: "small", cpu: "0.5", memory: "2 GB" },
    Tier { id: "e2-medium", size: "medium", cpu: "1", memory: "4 GB" },
    Tier { id: "e2-standard-2", size: "large", cpu: "2", memory: "8 GB" },
];

pub static GCP_CONTAINER_TIERS: &[Tier] = &[
    Tier { id: "cloudrun-1cpu-512mi", size: "micro", cpu: "1", memory: "512 MB" },
    Tier { id: "cloudrun-1cpu-1gi", size: "small", cpu: "1", memory: "1 GB" },
    Tier { id: "cloudrun-2cpu-2gi", size: "medium", cpu: "2", memory: "2 GB" },
    Tier { id: "cloudrun-2cpu-4gi", size: "large", cpu: "2", memory: "4 GB" },
];

pub static GCP_SERVERLESS_TIERS: &[Tier] = &[
    Tier { id: "cloudfunctions-256mb", size: "micro", cpu: "0.167", memory: "256 MB" },
    Tier { id: "cloudfunctions-512mb", size: "small", cpu: "0.333", memory: "512 MB" },
    Tier { id: "cloudfunctions-1gb", size: "medium", cpu: "0.583", memory: "1 GB" },
    Tier { id: "cloudfunctions-2gb", size: "large", cpu: "1", memory: "2 GB" },
];

pub static GCP_DATABASE_TIERS: &[Tier] = &[
    Tier { id: "db-f1-micro", size: "micro", cpu: "shared", memory: "0.6 GB" },
    Tier { id: "db-g1-small", size: "small", cpu: "shared", memory: "1.7 GB" },
    Tier { id: "db-custom-1-3840", size: "medium", cpu: "1", memory: "3.75 GB" },
];

pub static GCP_REGIONS: &[CloudRegion] = &[
    CloudRegion { id: "us-central1", name: "Iowa" },
    CloudRegion { id: "us-east1", name: "South Carolina" },
    CloudRegion { id: "us-west1", name: "Oregon" },
    CloudRegion { id: "europe-west1", name: "Belgium" },
    CloudRegion { id: "europe-west3", name: "Frankfurt" },
    CloudRegion { id: "asia-southeast1", name: "Singapore" },
    CloudRegion { id: "asia-northeast1", name: "Tokyo" },
];

static GCP_SERVICES: ServiceCatalog = ServiceCatalog {
    cache: "memorystore-redis-basic-1gb",
    object_storage: "cloud-storage-standard-100gb",
    dns_zone: "cloud-dns-zone",
    certificate: "managed-ssl-certificate",
    queue: "pubsub",
    cdn: "cloud-cdn",
    monitoring: "cloud-monitoring",
    load_balancer: "https-load-balancer",
    kubernetes_control_plane: "gke-control-plane",
    egress: "egress-100gb",
    persistent_volume: "pd-balanced-20gb",
    database_storage: "cloudsql-storage-gb",
};

// =============================================================================
// Azure
// =============================================================================

pub static AZURE_VM_TIERS: &[Tier] = &[
    Tier { id: "Standard_B1s", size: "micro", cpu: "1", memory: "1 GB" },
    Tier { id: "Standard_B1ms", size: "small", cpu: "1", memory: "2 GB" },
    Tier { id: "Standard_B2s", size: "medium", cpu: "2", memory: "4 GB" },
    Tier { id: "Standard_B2ms", size: "large", cpu: "2", memory: "8 GB" },
];

pub static AZURE_CONTAINER_TIERS: &[Tier] = &[
    Tier { id: "aca-0.25cpu-0.5gi", size: "micro", cpu: "0.25", memory: "0.5 GB" },
    Tier { id: "aca-0.5cpu-1gi", size: "small", cpu: "0.5", memory: "1 GB" },
    Tier { id: "aca-1cpu-2gi", size: "medium", cpu: "1", memory: "2 GB" },
    Tier { id: "aca-2cpu-4gi", size: "large", cpu: "2", memory: "4 GB" },
];

pub static AZURE_SERVERLESS_TIERS: &[Tier] = &[
    Tier { id: "functions-256mb", size: "micro", cpu: "shared", memory: "256 MB" },
    Tier { id: "functions-512mb", size: "small", cpu: "shared", memory: "512 MB" },
    Tier { id: "functions-1gb", size: "medium", cpu: "shared", memory: "1 GB" },
    Tier { id: "functions-ep1", size: "large", cpu: "1", memory: "3.5 GB" },
];

pub static AZURE_DATABASE_TIERS: &[Tier] = &[
    Tier { id: "B_Standard_B1ms", size: "micro", cpu: "1", memory: "2 GB" },
    Tier { id: "B_Standard_B2s", size: "small", cpu: "2", memory: "4 GB" },
    Tier { id: "GP_Standard_D2s_v3", size: "medium", cpu: "2", memory: "8 GB" },
];

pub static AZURE_REGIONS: &[CloudRegion] = &[
    CloudRegion { id: "eastus", name: "East US" },
    CloudRegion { id: "eastus2", name: "East US 2" },
    CloudRegion { id: "westus2", name: "West US 2" },
    CloudRegion { id: "westeurope", name: "West Europe" },
    CloudRegion { id: "northeurope", name: "North Europe" },
    CloudRegion { id: "southeastasia", name: "Southeast Asia" },
    CloudRegion { id: "japaneast", name: "Japan East" },
];

static AZURE_SERVICES: ServiceCatalog = ServiceCatalog {
    cache: "azure-cache-redis-c0",
    object_storage: "blob-storage-hot-100gb",
    dns_zone: "azure-dns-zone",
    certificate: "app-service-managed-certificate",
    queue: "service-bus-basic",
    cdn: "azure-cdn",
    monitoring: "azure-monitor",
    load_balancer: "application-gateway",
    kubernetes_control_plane: "aks-control-plane",
    egress: "egress-100gb",
    persistent_volume: "managed-disk-standard-ssd-20gb",
    database_storage: "flexible-server-storage-gb",
};

// =============================================================================
// Lookup helpers
// =============================================================================

/// Compute ladder for a strategy. Kubernetes nodes use the VM ladder.
pub fn compute_tiers(provider: CloudProvider, strategy: DeploymentStrategy) -> &'static [Tier] {
    match (provider, strategy) {
        (CloudProvider::Aws, DeploymentStrategy::Vm | DeploymentStrategy::Kubernetes) => AWS_VM_TIERS,
        (CloudProvider::Aws, DeploymentStrategy::Container) => AWS_CONTAINER_TIERS,
        (CloudProvider::Aws, DeploymentStrategy::Serverless) => AWS_SERVERLESS_TIERS,
        (CloudProvider::Gcp, DeploymentStrategy::Vm | DeploymentStrategy::Kubernetes) => GCP_VM_TIERS,
        (CloudProvider::Gcp, DeploymentStrategy::Container) => GCP_CONTAINER_TIERS,
        (CloudProvider::Gcp, DeploymentStrategy::Serverless) => GCP_SERVERLESS_TIERS,
        (CloudProvider::Azure, DeploymentStrategy::Vm | DeploymentStrategy::Kubernetes) => AZURE_VM_TIERS,
        (CloudProvider::Azure, DeploymentStrategy::Container) => AZURE_CONTAINER_TIERS,
        (CloudProvider::Azure, DeploymentStrategy::Serverless) => AZURE_SERVERLESS_TIERS,
    }
}

/// Managed database instance classes
pub fn database_tiers(provider: CloudProvider) -> &'static [Tier] {
    match provider {
        CloudProvider::Aws => AWS_DATABASE_TIERS,
        CloudProvider::Gcp => GCP_DATABASE_TIERS,
        CloudProvider::Azure => AZURE_DATABASE_TIERS,
    }
}

pub fn regions(provider: CloudProvider) -> &'static [CloudRegion] {
    match provider {
        CloudProvider::Aws => AWS_REGIONS,
        CloudProvider::Gcp => GCP_REGIONS,
        CloudProvider::Azure => AZURE_REGIONS,
    }
}

pub fn default_region(provider: CloudProvider) -> &'static str {
    match provider {
        CloudProvider::Aws => "us-east-1",
        CloudProvider::Gcp => "us-central1",
        CloudProvider::Azure => "eastus",
    }
}

pub fn services(provider: CloudProvider) -> &'static ServiceCatalog {
    match provider {
        CloudProvider::Aws => &AWS_SERVICES,
        CloudProvider::Gcp => &GCP_SERVICES,
        CloudProvider::Azure => &AZURE_SERVICES,
    }
}

/// Engine version provisioned for a managed database, `None` for embedded engines
pub fn engine_version(engine: DatabaseType) -> Option<&'static str> {
    match engine {
        DatabaseType::Postgresql => Some("16"),
        DatabaseType::Mysql => Some("8.0"),
        DatabaseType::Mongodb => Some("6.0"),
        DatabaseType::Sqlite => None,
    }
}

/// Ladder position of a tier by SKU id or size word, ignoring case
pub fn find_tier(tiers: &[Tier], hint: &str) -> Option<usize> {
    let hint = hint.trim();
    tiers
        .iter()
        .position(|t| t.id.eq_ignore_ascii_case(hint))
        .or_else(|| tiers.iter().position(|t| t.size.eq_ignore_ascii_case(hint)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_ladder_is_sized_in_order() {
        let sizes = ["micro", "small", "medium", "large"];
        for provider in CloudProvider::ALL {
            for strategy in DeploymentStrategy::ALL {
                let tiers = compute_tiers(provider, strategy);
                assert_eq!(tiers.len(), 4);
                for (tier, size) in tiers.iter().zip(sizes) {
                    assert_eq!(tier.size, size);
                }
            }
            assert_eq!(database_tiers(provider).len(), 3);
        }
    }

    #[test]
    fn test_default_region_is_listed() {
        for provider in CloudProvider::ALL {
            assert!(regions(provider).iter().any(|r| r.id == default_region(provider)));
        }
    }

    #[test]
    fn test_find_tier() {
        assert_eq!(find_tier(AWS_VM_TIERS, "T3.Medium"), Some(2));
        assert_eq!(find_tier(GCP_VM_TIERS, "large"), Some(3));
        assert_eq!(find_tier(AZURE_VM_TIERS, "t3.micro"), None);
    }
}
