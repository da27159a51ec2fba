//! Tier selection on the provider ladders.

use crate::analyzer::AnalysisResult;
use crate::infrastructure::provider_data::{Tier, find_tier};
use crate::requirements::{DeploymentRequirements, DeploymentStrategy};

/// Confidence below which dependency counts are not trusted for sizing
pub const NON_TRIVIAL_MIN_CONFIDENCE: f64 = 0.5;

/// Minimum node count of a Kubernetes node pool
pub const MIN_KUBERNETES_NODES: u32 = 2;

/// Signals that push sizing up the ladder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizingSignal {
    pub scaling: bool,
    pub non_trivial: bool,
    pub jvm: bool,
}

impl SizingSignal {
    pub fn from_inputs(
        analysis: &AnalysisResult,
        requirements: &DeploymentRequirements,
        dependency_threshold: usize,
    ) -> Self {
        Self {
            scaling: requirements.scaling.enabled,
            non_trivial: analysis.confidence_score >= NON_TRIVIAL_MIN_CONFIDENCE
                && analysis.runtime_dependency_count() > dependency_threshold,
            jvm: analysis.is_jvm(),
        }
    }

    /// Whether the app needs the one-step upgrade shared by compute and database
    pub fn upgrade(&self) -> bool {
        self.scaling || self.non_trivial
    }
}

/// Ladder index the strategy starts from before any upgrade
pub fn base_tier(strategy: DeploymentStrategy) -> usize {
    match strategy {
        DeploymentStrategy::Kubernetes => 1,
        _ => 0,
    }
}

/// Chosen tier plus a human-readable account of how it was reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierChoice {
    pub tier: Tier,
    pub notes: Vec<String>,
}

/// Pick a compute tier.
///
/// A hint naming a rung of `tiers` (by SKU or size word) replaces the base
/// tier; upgrades still apply on top and the result is clamped to the ladder.
pub fn choose_compute_tier(
    tiers: &'static [Tier],
    strategy: DeploymentStrategy,
    hint: Option<&str>,
    signal: SizingSignal,
) -> TierChoice {
    let mut notes = Vec::new();
    let mut index = base_tier(strategy);

    match hint {
        Some(hint) => match find_tier(tiers, hint) {
            Some(hinted) => {
                notes.push(format!("instance hint '{}' sets the base to {}", hint, tiers[hinted].id));
                index = hinted;
            }
            None => notes.push(format!(
                "instance hint '{}' is not offered for {} and was ignored",
                hint, strategy
            )),
        },
        None => notes.push(format!("base tier {}", tiers[index.min(tiers.len() - 1)].id)),
    }

    if signal.upgrade() {
        index += 1;
        notes.push(if signal.scaling {
            "+1 tier for requested scaling".to_string()
        } else {
            "+1 tier for a non-trivial application".to_string()
        });
    }
    if signal.jvm {
        index += 1;
        notes.push("+1 tier for the JVM memory baseline".to_string());
    }

    let clamped = index.min(tiers.len() - 1);
    if clamped != index {
        notes.push(format!("clamped to the largest tier {}", tiers[clamped].id));
    }

    TierChoice {
        tier: tiers[clamped],
        notes,
    }
}

/// Pick a managed database class: micro, one step up on the shared upgrade signal
pub fn choose_database_tier(tiers: &'static [Tier], signal: SizingSignal) -> Tier {
    let index = usize::from(signal.upgrade()).min(tiers.len() - 1);
    tiers[index]
}
