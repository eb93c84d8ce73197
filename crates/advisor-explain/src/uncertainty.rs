//! Per-prediction uncertainty assessment. Same entropy formula and level
//! thresholds as the Evaluation Engine.

use serde::{Deserialize, Serialize};

use advisor_core::{normalized_entropy, shannon_entropy, UncertaintyLevel};

/// Probability assigned to one severity class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassProbability {
    pub class: String,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyAssessment {
    pub level: UncertaintyLevel,
    pub entropy: f64,
    pub normalized_entropy: f64,
    pub interpretation: String,
    /// One entry per class, in the target codec's class order.
    pub confidence_distribution: Vec<ClassProbability>,
}

/// Assess `probabilities`, labelled with `class_labels` (same length).
pub fn assess(probabilities: &[f64], class_labels: &[String]) -> UncertaintyAssessment {
    let h_norm = normalized_entropy(probabilities);
    let level = UncertaintyLevel::from_normalized_entropy(h_norm);
    UncertaintyAssessment {
        level,
        entropy: shannon_entropy(probabilities),
        normalized_entropy: h_norm,
        interpretation: level.interpretation().to_string(),
        confidence_distribution: class_labels
            .iter()
            .zip(probabilities)
            .map(|(class, &probability)| ClassProbability {
                class: class.clone(),
                probability,
            })
            .collect(),
    }
}
