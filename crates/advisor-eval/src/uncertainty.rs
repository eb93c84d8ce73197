//! Entropy-based uncertainty over a held-out set, using the shared formula in
//! [`advisor_core::uncertainty`].

use serde::{Deserialize, Serialize};

use advisor_core::{normalized_entropy, shannon_entropy, UncertaintyLevel};

use crate::error::EvalError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyMetrics {
    pub mean_entropy: f64,
    /// 0.0 = certain, 1.0 = maximum uncertainty.
    pub mean_normalized_entropy: f64,
    pub low_uncertainty_count: usize,
    pub medium_uncertainty_count: usize,
    pub high_uncertainty_count: usize,
}

impl UncertaintyMetrics {
    pub fn count(&self, level: UncertaintyLevel) -> usize {
        match level {
            UncertaintyLevel::Low => self.low_uncertainty_count,
            UncertaintyLevel::Medium => self.medium_uncertainty_count,
            UncertaintyLevel::High => self.high_uncertainty_count,
        }
    }
}

pub fn uncertainty_metrics(probabilities: &[Vec<f64>]) -> Result<UncertaintyMetrics, EvalError> {
    if probabilities.is_empty() {
        return Err(EvalError::EmptyTestSet);
    }
    let n = probabilities.len() as f64;
    let mut metrics = UncertaintyMetrics {
        mean_entropy: 0.0,
        mean_normalized_entropy: 0.0,
        low_uncertainty_count: 0,
        medium_uncertainty_count: 0,
        high_uncertainty_count: 0,
    };
    for p in probabilities {
        let h_norm = normalized_entropy(p);
        metrics.mean_entropy += shannon_entropy(p) / n;
        metrics.mean_normalized_entropy += h_norm / n;
        match UncertaintyLevel::from_normalized_entropy(h_norm) {
            UncertaintyLevel::Low => metrics.low_uncertainty_count += 1,
            UncertaintyLevel::Medium => metrics.medium_uncertainty_count += 1,
            UncertaintyLevel::High => metrics.high_uncertainty_count += 1,
        }
    }
    if metrics.high_uncertainty_count > 0 {
        tracing::info!(
            high = metrics.high_uncertainty_count,
            "held-out predictions with high uncertainty need extra human scrutiny"
        );
    }
    Ok(metrics)
}
