//! # Feature-Importance Attribution
//!
//! The model's *global* importance vector, normalized to percentages and
//! paired with this claim's raw field values. This is a proxy: it says which
//! features drive the model overall, not why this particular claim received
//! its suggestion. Every ranking carries that scope explicitly.

use serde::{Deserialize, Serialize};

use advisor_core::{Claim, FEATURE_NAMES};

/// What an attribution ranking describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributionScope {
    /// Model-wide importance, identical for every prediction.
    Global,
}

/// Raw (unencoded) value of a claim field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Text(String),
    Amount(f64),
    Flag(bool),
}

/// One feature's share of global importance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureAttribution {
    pub feature: String,
    pub importance_score: f64,
    /// 0–100; 0 for every feature when the model has no importance mass.
    pub relative_percentage: f64,
    pub value: FeatureValue,
}

/// Importance ranking, highest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub attribution_scope: AttributionScope,
    pub note: String,
    pub ranking: Vec<FeatureAttribution>,
}

const GLOBAL_NOTE: &str =
    "Global model importance used as a proxy; not an instance-specific causal explanation";

/// Rank `importances` (schema order) against `claim`'s raw values.
///
/// Ties keep schema order.
pub fn attribute(importances: &[f64], claim: &Claim) -> FeatureImportance {
    let total: f64 = importances.iter().sum();
    let values = raw_values(claim);
    let mut ranking: Vec<FeatureAttribution> = FEATURE_NAMES
        .iter()
        .zip(importances)
        .zip(values)
        .map(|((name, &score), value)| FeatureAttribution {
            feature: name.to_string(),
            importance_score: score,
            relative_percentage: if total > 0.0 { score / total * 100.0 } else { 0.0 },
            value,
        })
        .collect();
    ranking.sort_by(|a, b| b.importance_score.total_cmp(&a.importance_score));
    FeatureImportance {
        attribution_scope: AttributionScope::Global,
        note: GLOBAL_NOTE.to_string(),
        ranking,
    }
}

fn raw_values(claim: &Claim) -> [FeatureValue; 4] {
    [
        FeatureValue::Text(claim.claim_type().as_str().to_string()),
        FeatureValue::Amount(claim.damage_amount()),
        FeatureValue::Flag(claim.injury_involved()),
        FeatureValue::Text(claim.risk_factor().as_str().to_string()),
    ]
}
