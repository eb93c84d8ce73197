//! # Feature Schema — Single Source of Truth for Feature Order
//!
//! The classifier consumes a fixed 4-length vector
//! `[claim_type_idx, damage_amount, injury_flag, risk_factor_idx]`. That order
//! is a frozen contract between training and inference, so it is written down
//! once, versioned, and embedded in every persisted artifact. Loading an
//! artifact whose schema differs fails fast instead of silently feeding
//! columns to the wrong splits.
//!
//! The same allow-list backs the training-time governance gate: a dataset
//! with any column beyond these four (plus the target) must not be trained on.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{ArtifactKind, ArtifactLoadError, GovernanceViolationError};

/// Version tag embedded in codec bundles, model artifacts and metadata.
pub const SCHEMA_VERSION: &str = "claims-features/v1";

/// Allowed features, in the order the classifier consumes them.
pub const FEATURE_NAMES: [&str; 4] = [
    "claim_type",
    "damage_amount",
    "injury_involved",
    "risk_factor",
];

/// Width of an encoded feature vector.
pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

/// Name of the target column.
pub const TARGET_NAME: &str = "severity";

/// Versioned, ordered feature list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureSchema {
    /// Schema version tag.
    pub version: String,
    /// Feature names in classifier order.
    pub features: Vec<String>,
}

impl FeatureSchema {
    /// The schema this build of the pipeline trains and serves with.
    pub fn current() -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            features: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Check that a schema read from an artifact matches [`FeatureSchema::current`].
    pub fn ensure_compatible(
        &self,
        artifact: ArtifactKind,
        path: &str,
    ) -> Result<(), ArtifactLoadError> {
        let current = Self::current();
        if self.version != current.version {
            return Err(ArtifactLoadError::new(
                artifact,
                path,
                format!(
                    "feature schema version {} does not match {}",
                    self.version, current.version
                ),
            ));
        }
        if self.features != current.features {
            return Err(ArtifactLoadError::new(
                artifact,
                path,
                format!(
                    "feature order [{}] does not match [{}]",
                    self.features.join(", "),
                    current.features.join(", ")
                ),
            ));
        }
        Ok(())
    }

    /// Index of a feature in classifier order.
    pub fn position(&self, feature: &str) -> Option<usize> {
        self.features.iter().position(|f| f == feature)
    }
}

/// Reject any feature set that is not exactly the allow-list.
///
/// Unauthorized columns are reported before missing ones, in the order
/// presented, so the first offending column a human sees is the one that
/// appears first in the data.
pub fn enforce_allow_list<S: AsRef<str>>(columns: &[S]) -> Result<(), GovernanceViolationError> {
    let allowed: BTreeSet<&str> = FEATURE_NAMES.iter().copied().collect();
    for column in columns {
        let column = column.as_ref();
        if !allowed.contains(column) {
            return Err(GovernanceViolationError::UnauthorizedFeature {
                feature: column.to_string(),
                allowed: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            });
        }
    }
    let present: BTreeSet<&str> = columns.iter().map(|c| c.as_ref()).collect();
    for feature in FEATURE_NAMES {
        if !present.contains(feature) {
            return Err(GovernanceViolationError::MissingFeature {
                feature: feature.to_string(),
            });
        }
    }
    Ok(())
}

/// Allow-list check plus exact schema order. Used where column order is
/// load-bearing, i.e. on an already-encoded matrix.
pub fn enforce_schema_order<S: AsRef<str>>(columns: &[S]) -> Result<(), GovernanceViolationError> {
    enforce_allow_list(columns)?;
    let found: Vec<String> = columns.iter().map(|c| c.as_ref().to_string()).collect();
    if found.len() != FEATURE_COUNT || found.iter().zip(FEATURE_NAMES).any(|(a, b)| a != b) {
        return Err(GovernanceViolationError::FeatureOrderMismatch {
            expected: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            found,
        });
    }
    Ok(())
}

/// Order-independent set equality against the allow-list.
pub fn is_allowed_feature_set<S: AsRef<str>>(columns: &[S]) -> bool {
    let allowed: BTreeSet<&str> = FEATURE_NAMES.iter().copied().collect();
    let present: BTreeSet<&str> = columns.iter().map(|c| c.as_ref()).collect();
    present == allowed
}
