//! # advisor-explain — Explainability Engine
//!
//! Produces the three explanation artifacts attached to every advisory
//! suggestion:
//!
//! 1. **Rule signals** ([`rules`]): text derived from the raw claim and the
//!    injected [`PolicyBoundaryTable`].
//! 2. **Feature importance** ([`importance`]): the model's global importance
//!    as percentages, ranked, explicitly scoped as a global proxy.
//! 3. **Uncertainty** ([`uncertainty`]): entropy, normalized entropy, level,
//!    interpretation, and the per-class distribution.
//!
//! None of these alter the classifier's prediction.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use advisor_core::{Claim, PolicyBoundaryTable, FEATURE_COUNT};
use advisor_model::Classifier;

pub mod format;
pub mod importance;
pub mod rules;
pub mod uncertainty;

pub use format::{format_currency, format_multiplier, format_whole_currency};
pub use importance::{AttributionScope, FeatureAttribution, FeatureImportance, FeatureValue};
pub use rules::rule_signals;
pub use uncertainty::{ClassProbability, UncertaintyAssessment};

/// Inputs that cannot be explained consistently.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExplainError {
    #[error("probability vector has {found} entries but there are {expected} classes")]
    ClassCountMismatch { expected: usize, found: usize },

    #[error("model reports {found} feature importances, schema has {expected} features")]
    ImportanceWidth { expected: usize, found: usize },
}

/// All explanation artifacts for one prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainabilityBundle {
    pub rule_signals: Vec<String>,
    pub feature_importance: FeatureImportance,
    pub uncertainty: UncertaintyAssessment,
}

/// Explainability Engine bound to one Policy Boundary Table.
#[derive(Debug, Clone)]
pub struct Explainer {
    boundaries: Arc<PolicyBoundaryTable>,
}

impl Explainer {
    pub fn new(boundaries: Arc<PolicyBoundaryTable>) -> Self {
        Self { boundaries }
    }

    pub fn boundaries(&self) -> &PolicyBoundaryTable {
        &self.boundaries
    }

    /// Explain one prediction. `class_labels` is the target codec's class
    /// list, aligned with `probabilities`.
    pub fn explain(
        &self,
        claim: &Claim,
        probabilities: &[f64],
        model: &dyn Classifier,
        class_labels: &[String],
    ) -> Result<ExplainabilityBundle, ExplainError> {
        if probabilities.len() != class_labels.len() {
            return Err(ExplainError::ClassCountMismatch {
                expected: class_labels.len(),
                found: probabilities.len(),
            });
        }
        let importances = model.feature_importances();
        if importances.len() != FEATURE_COUNT {
            return Err(ExplainError::ImportanceWidth {
                expected: FEATURE_COUNT,
                found: importances.len(),
            });
        }
        let bundle = ExplainabilityBundle {
            rule_signals: rules::rule_signals(claim, &self.boundaries),
            feature_importance: importance::attribute(&importances, claim),
            uncertainty: uncertainty::assess(probabilities, class_labels),
        };
        tracing::debug!(
            uncertainty = %bundle.uncertainty.level,
            normalized_entropy = bundle.uncertainty.normalized_entropy,
            signals = bundle.rule_signals.len(),
            "prediction explained"
        );
        Ok(bundle)
    }
}
