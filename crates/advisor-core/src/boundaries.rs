//! # Policy Boundary Table
//!
//! Frozen thresholds used to annotate predictions with human-readable rule
//! signals and to document, in every Metadata Record, which policy was in
//! force when the model was trained.
//!
//! ## Separation Invariant
//!
//! Nothing in this table is ever fed to the classifier or fitted to data.
//! The trainer does not depend on it. The table reaches the explainer, the
//! training pipeline (as a snapshot) and the advisory service only by being
//! passed in explicitly, so tests can inject an alternate table.
//!
//! | Boundary | Value |
//! |---|---|
//! | Damage tier: low | `< 5 000` |
//! | Damage tier: medium | `< 15 000` |
//! | Damage tier: high | `< 50 000` |
//! | Damage tier: very high | `>= 50 000` |
//! | Risk weight low / medium / high | `1.0 / 1.5 / 2.0` |
//! | Injury multiplier | `1.8` |
//! | Severity cut points low / medium | `5 / 15` |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::claim::RiskFactor;
use crate::digest::{sha256_digest, ContentDigest};

/// Upper (exclusive) cut points for the damage tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageThresholds {
    pub low: u64,
    pub medium: u64,
    pub high: u64,
}

/// Multiplicative weight per risk factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskWeights {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

/// Cut points on the composite severity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityThresholds {
    pub low: u64,
    pub medium: u64,
}

/// The frozen policy boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyBoundaryTable {
    pub damage_thresholds: DamageThresholds,
    pub risk_weights: RiskWeights,
    pub injury_multiplier: f64,
    pub severity_thresholds: SeverityThresholds,
}

impl PolicyBoundaryTable {
    /// The boundaries in force for this pipeline. Do not modify.
    pub fn frozen() -> Self {
        Self {
            damage_thresholds: DamageThresholds {
                low: 5_000,
                medium: 15_000,
                high: 50_000,
            },
            risk_weights: RiskWeights {
                low: 1.0,
                medium: 1.5,
                high: 2.0,
            },
            injury_multiplier: 1.8,
            severity_thresholds: SeverityThresholds { low: 5, medium: 15 },
        }
    }

    /// Classify a damage amount into its tier.
    pub fn damage_tier(&self, damage_amount: f64) -> DamageTier {
        let t = &self.damage_thresholds;
        if damage_amount < t.low as f64 {
            DamageTier::Low
        } else if damage_amount < t.medium as f64 {
            DamageTier::Medium
        } else if damage_amount < t.high as f64 {
            DamageTier::High
        } else {
            DamageTier::VeryHigh
        }
    }

    /// Weight attached to a risk factor.
    pub fn risk_weight(&self, risk: RiskFactor) -> f64 {
        match risk {
            RiskFactor::Low => self.risk_weights.low,
            RiskFactor::Medium => self.risk_weights.medium,
            RiskFactor::High => self.risk_weights.high,
        }
    }

    /// Content digest of the table, for comparing snapshots.
    pub fn digest(&self) -> Result<ContentDigest, serde_json::Error> {
        sha256_digest(self)
    }
}

impl Default for PolicyBoundaryTable {
    fn default() -> Self {
        Self::frozen()
    }
}

/// Damage tier of a claim under the boundary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageTier {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl DamageTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::VeryHigh => "very_high",
        }
    }
}

impl fmt::Display for DamageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
