//! # Entropy-Based Uncertainty
//!
//! The one formula both the Evaluation Engine and the Explainability Engine
//! use to turn a probability vector into an uncertainty signal:
//!
//! ```text
//! H(p)      = -Σ p_i · ln(p_i + ε)         ε = 1e-10
//! H_norm(p) = H(p) / ln(k)                 k = number of classes
//! ```
//!
//! `H_norm` is clamped to `[0, 1]`: the epsilon makes a one-hot vector come
//! out at roughly `-1e-10` before clamping.
//!
//! Levels: `Low` below 0.3, `Medium` in `[0.3, 0.6)`, `High` from 0.6 up.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Additive epsilon guarding `ln(0)`.
pub const ENTROPY_EPSILON: f64 = 1e-10;

/// Normalized entropy below this is `Low` uncertainty.
pub const LOW_UNCERTAINTY_CEILING: f64 = 0.3;

/// Normalized entropy below this (and at least the low ceiling) is `Medium`.
pub const MEDIUM_UNCERTAINTY_CEILING: f64 = 0.6;

/// Shannon entropy (nats) of a probability vector.
pub fn shannon_entropy(probs: &[f64]) -> f64 {
    let h: f64 = probs.iter().map(|&p| -p * (p + ENTROPY_EPSILON).ln()).sum();
    h.max(0.0)
}

/// Shannon entropy divided by `ln(k)`, in `[0, 1]`.
///
/// Returns 0 for vectors with fewer than two classes, where no uncertainty
/// is expressible.
pub fn normalized_entropy(probs: &[f64]) -> f64 {
    if probs.len() < 2 {
        return 0.0;
    }
    let max_entropy = (probs.len() as f64).ln();
    (shannon_entropy(probs) / max_entropy).clamp(0.0, 1.0)
}

/// Bucketed uncertainty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UncertaintyLevel {
    Low,
    Medium,
    High,
}

impl UncertaintyLevel {
    pub fn all() -> &'static [UncertaintyLevel] {
        &[Self::Low, Self::Medium, Self::High]
    }

    /// Bucket a normalized entropy value.
    pub fn from_normalized_entropy(value: f64) -> Self {
        if value < LOW_UNCERTAINTY_CEILING {
            Self::Low
        } else if value < MEDIUM_UNCERTAINTY_CEILING {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Guidance for the human reviewer.
    pub fn interpretation(&self) -> &'static str {
        match self {
            Self::Low => "Model is confident in this prediction",
            Self::Medium => "Model has moderate uncertainty - extra human scrutiny recommended",
            Self::High => "Model is uncertain - REQUIRES careful human review",
        }
    }
}

impl fmt::Display for UncertaintyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
