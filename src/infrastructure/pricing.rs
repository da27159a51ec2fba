//! Static monthly price table.
//!
//! Prices are on-demand list prices in USD per month (730 hours) for the SKUs
//! in `provider_data`. They are estimates, never fetched live. Any entry can be
//! overridden from the `[pricing.<provider>]` section of the config file.

use crate::infrastructure::provider_data::{compute_tiers, database_tiers};
use crate::requirements::{CloudProvider, DeploymentStrategy};
use std::collections::BTreeMap;

static AWS_PRICES: &[(&str, f64)] = &[
    ("t3.micro", 7.59),
    ("t3.small", 15.18),
    ("t3.medium", 30.37),
    ("t3.large", 60.74),
    ("fargate-0.25vcpu-0.5gb", 9.01),
    ("fargate-0.5vcpu-1gb", 18.02),
    ("fargate-1vcpu-2gb", 36.04),
    ("fargate-2vcpu-4gb", 72.08),
    ("lambda-256mb", 3.50),
    ("lambda-512mb", 7.00),
    ("lambda-1024mb", 14.00),
    ("lambda-2048mb", 28.00),
    ("db.t3.micro", 12.41),
    ("db.t3.small", 24.82),
    ("db.t3.medium", 49.64),
    ("rds-storage-gb", 0.115),
    ("elasticache-redis-t3.micro", 12.41),
    ("s3-standard-100gb", 2.30),
    ("route53-hosted-zone", 0.50),
    ("acm-certificate", 0.0),
    ("sqs-standard", 0.40),
    ("cloudfront", 8.50),
    ("cloudwatch", 3.00),
    ("alb", 16.43),
    ("eks-control-plane", 73.00),
    ("egress-100gb", 9.00),
    ("ebs-gp3-20gb", 1.60),
];

static GCP_PRICES: &[(&str, f64)] = &[
    ("e2-micro", 6.11),
    ("e2-small", 12.23),
    ("e2-medium", 24.46),
    ("e2-standard-2", 48.91),
    ("cloudrun-1cpu-512mi", 9.50),
    ("cloudrun-1cpu-1gi", 18.00),
    ("cloudrun-2cpu-2gi", 35.00),
    ("cloudrun-2cpu-4gi", 70.00),
    ("cloudfunctions-256mb", 4.00),
    ("cloudfunctions-512mb", 8.00),
    ("cloudfunctions-1gb", 16.00),
    ("cloudfunctions-2gb", 32.00),
    ("db-f1-micro", 7.67),
    ("db-g1-small", 25.55),
    ("db-custom-1-3840", 49.35),
    ("cloudsql-storage-gb", 0.17),
    ("memorystore-redis-basic-1gb", 35.77),
    ("cloud-storage-standard-100gb", 2.00),
    ("cloud-dns-zone", 0.20),
    ("managed-ssl-certificate", 0.0),
    ("pubsub", 0.40),
    ("cloud-cdn", 8.00),
    ("cloud-monitoring", 2.50),
    ("https-load-balancer", 18.26),
    ("gke-control-plane", 73.00),
    ("egress-100gb", 12.00),
    ("pd-balanced-20gb", 2.00),
];

static AZURE_PRICES: &[(&str, f64)] = &[
    ("Standard_B1s", 7.59),
    ("Standard_B1ms", 15.18),
    ("Standard_B2s", 30.37),
    ("Standard_B2ms", 60.74),
    ("aca-0.25cpu-0.5gi", 8.80),
    ("aca-0.5cpu-1gi", 17.50),
    ("aca-1cpu-2gi", 35.00),
    ("aca-2cpu-4gi", 70.00),
    ("functions-256mb", 3.20),
    ("functions-512mb", 6.40),
    ("functions-1gb", 12.80),
    ("functions-ep1", 146.00),
    ("B_Standard_B1ms", 12.41),
    ("B_Standard_B2s", 49.64),
    ("GP_Standard_D2s_v3", 124.83),
    ("flexible-server-storage-gb", 0.115),
    ("azure-cache-redis-c0", 16.06),
    ("blob-storage-hot-100gb", 2.08),
    ("azure-dns-zone", 0.50),
    ("app-service-managed-certificate", 0.0),
    ("service-bus-basic", 0.05),
    ("azure-cdn", 8.10),
    ("azure-monitor", 2.30),
    ("application-gateway", 18.25),
    ("aks-control-plane", 0.0),
    ("egress-100gb", 8.70),
    ("managed-disk-standard-ssd-20gb", 1.54),
];

fn base_prices(provider: CloudProvider) -> &'static [(&'static str, f64)] {
    match provider {
        CloudProvider::Aws => AWS_PRICES,
        CloudProvider::Gcp => GCP_PRICES,
        CloudProvider::Azure => AZURE_PRICES,
    }
}

/// Convert a USD amount to whole cents
pub fn usd_to_cents(usd: f64) -> u64 {
    if usd.is_finite() && usd > 0.0 {
        (usd * 100.0).round() as u64
    } else {
        0
    }
}

/// Render cents as `$X.YZ`
pub fn format_cents(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

/// Price lookups for one provider with optional overrides
#[derive(Debug, Clone)]
pub struct PriceTable {
    provider: CloudProvider,
    overrides: BTreeMap<String, f64>,
}

impl PriceTable {
    pub fn new(provider: CloudProvider) -> Self {
        Self {
            provider,
            overrides: BTreeMap::new(),
        }
    }

    /// Apply the overrides configured for this provider, if any
    pub fn with_overrides(mut self, pricing: &BTreeMap<String, BTreeMap<String, f64>>) -> Self {
        if let Some(overrides) = pricing.get(self.provider.as_str()) {
            self.overrides = overrides.clone();
        }
        self
    }

    /// Monthly price of one unit of `sku`, in cents. Unknown SKUs cost nothing.
    pub fn monthly_cents(&self, sku: &str) -> u64 {
        if let Some(price) = self.overrides.get(sku) {
            return usd_to_cents(*price);
        }
        match base_prices(self.provider).iter().find(|(id, _)| *id == sku) {
            Some((_, price)) => usd_to_cents(*price),
            None => {
                log::warn!("No {} price for {}, counting it as free", self.provider, sku);
                0
            }
        }
    }

    /// First pair of adjacent tiers, smaller first, where the larger tier is cheaper.
    ///
    /// Sizing only ever moves up a ladder, so cost estimates stay monotone only
    /// while every compute and database ladder is non-decreasing in price.
    pub fn ladder_inversion(&self) -> Option<(&'static str, &'static str)> {
        DeploymentStrategy::ALL
            .iter()
            .map(|strategy| compute_tiers(self.provider, *strategy))
            .chain(std::iter::once(database_tiers(self.provider)))
            .flat_map(|tiers| tiers.windows(2))
            .find(|pair| self.monthly_cents(pair[1].id) < self.monthly_cents(pair[0].id))
            .map(|pair| (pair[0].id, pair[1].id))
    }

    /// Price of `gb` gigabytes of a per-GB SKU, in cents
    pub fn per_gb_cents(&self, sku: &str, gb: u32) -> u64 {
        let per_gb = self
            .overrides
            .get(sku)
            .copied()
            .or_else(|| {
                base_prices(self.provider)
                    .iter()
                    .find(|(id, _)| *id == sku)
                    .map(|(_, price)| *price)
            })
            .unwrap_or(0.0);
        usd_to_cents(per_gb * f64::from(gb))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::provider_data::services;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(0), "$0.00");
        assert_eq!(format_cents(1205), "$12.05");
        assert_eq!(format_cents(123456), "$1234.56");
    }

    #[test]
    fn test_every_catalog_sku_has_a_price() {
        for provider in CloudProvider::ALL {
            let ids: Vec<&str> = base_prices(provider).iter().map(|(id, _)| *id).collect();
            for strategy in DeploymentStrategy::ALL {
                for tier in compute_tiers(provider, strategy) {
                    assert!(ids.contains(&tier.id), "{} {}", provider, tier.id);
                }
            }
            for tier in database_tiers(provider) {
                assert!(ids.contains(&tier.id), "{} {}", provider, tier.id);
            }
            let catalog = services(provider);
            for sku in [
                catalog.cache,
                catalog.object_storage,
                catalog.dns_zone,
                catalog.certificate,
                catalog.queue,
                catalog.cdn,
                catalog.monitoring,
                catalog.load_balancer,
                catalog.kubernetes_control_plane,
                catalog.egress,
                catalog.persistent_volume,
                catalog.database_storage,
            ] {
                assert!(ids.contains(&sku), "{} {}", provider, sku);
            }
        }
    }

    #[test]
    fn test_ladders_are_monotone_in_price() {
        for provider in CloudProvider::ALL {
            assert_eq!(PriceTable::new(provider).ladder_inversion(), None, "{}", provider);
        }
    }

    #[test]
    fn test_override_can_invert_a_ladder() {
        let pricing = BTreeMap::from([(
            "gcp".to_string(),
            BTreeMap::from([("e2-medium".to_string(), 1.0)]),
        )]);
        let table = PriceTable::new(CloudProvider::Gcp).with_overrides(&pricing);
        assert_eq!(table.ladder_inversion(), Some(("e2-small", "e2-medium")));

        let flat = BTreeMap::from([(
            "gcp".to_string(),
            BTreeMap::from([("e2-micro".to_string(), 20.0), ("e2-small".to_string(), 20.0)]),
        )]);
        let table = PriceTable::new(CloudProvider::Gcp).with_overrides(&flat);
        assert_eq!(table.ladder_inversion(), None);
    }

    #[test]
    fn test_overrides() {
        let mut pricing = BTreeMap::new();
        pricing.insert(
            "aws".to_string(),
            BTreeMap::from([("t3.micro".to_string(), 5.0)]),
        );
        let table = PriceTable::new(CloudProvider::Aws).with_overrides(&pricing);
        assert_eq!(table.monthly_cents("t3.micro"), 500);
        assert_eq!(table.monthly_cents("t3.small"), 1518);
        assert_eq!(table.per_gb_cents("rds-storage-gb", 20), 230);
        assert_eq!(table.monthly_cents("unknown-sku"), 0);
    }
}
