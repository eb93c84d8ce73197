//! # Feature Codec
//!
//! The codec bundle: category codecs for `claim_type`, `risk_factor` and the
//! `severity` target, plus the feature schema they were fitted against.
//!
//! Encoded vector layout (frozen, see [`FeatureSchema`]):
//!
//! ```text
//! [ claim_type_idx, damage_amount, injury_flag (0/1), risk_factor_idx ]
//! ```

use serde::{Deserialize, Serialize};

use advisor_core::{
    ArtifactKind, ArtifactLoadError, Claim, FeatureSchema, LabeledClaim, UnknownCategoryError,
    FEATURE_COUNT, TARGET_NAME,
};

use crate::category::CategoryCodec;

/// Category codecs for every categorical field, fitted together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureCodec {
    pub schema: FeatureSchema,
    pub claim_type: CategoryCodec,
    pub risk_factor: CategoryCodec,
    pub target: CategoryCodec,
}

impl FeatureCodec {
    /// Fit all three codecs over the training rows.
    pub fn fit(rows: &[LabeledClaim]) -> Self {
        let codec = Self {
            schema: FeatureSchema::current(),
            claim_type: CategoryCodec::fit(
                "claim_type",
                rows.iter().map(|r| r.claim.claim_type().as_str()),
            ),
            risk_factor: CategoryCodec::fit(
                "risk_factor",
                rows.iter().map(|r| r.claim.risk_factor().as_str()),
            ),
            target: CategoryCodec::fit(TARGET_NAME, rows.iter().map(|r| r.severity.as_str())),
        };
        tracing::debug!(
            claim_type = ?codec.claim_type.mapping(),
            risk_factor = ?codec.risk_factor.mapping(),
            target = ?codec.target.mapping(),
            "feature codec fitted"
        );
        codec
    }

    /// Encode one claim into classifier order.
    pub fn encode(&self, claim: &Claim) -> Result<[f64; FEATURE_COUNT], UnknownCategoryError> {
        let claim_type = self.claim_type.encode(claim.claim_type().as_str())?;
        let risk_factor = self.risk_factor.encode(claim.risk_factor().as_str())?;
        Ok([
            claim_type as f64,
            claim.damage_amount(),
            if claim.injury_involved() { 1.0 } else { 0.0 },
            risk_factor as f64,
        ])
    }

    /// Encode a severity label.
    pub fn encode_target(&self, severity: &str) -> Result<usize, UnknownCategoryError> {
        self.target.encode(severity)
    }

    /// Severity label for a predicted class index.
    pub fn decode(&self, label_index: usize) -> Result<&str, UnknownCategoryError> {
        self.target.decode(label_index)
    }

    /// Severity labels in class-index order.
    pub fn class_labels(&self) -> &[String] {
        self.target.classes()
    }

    /// Encode a labelled dataset into a feature matrix and target vector.
    pub fn encode_rows(
        &self,
        rows: &[LabeledClaim],
    ) -> Result<(FeatureMatrix, Vec<usize>), UnknownCategoryError> {
        let mut matrix = FeatureMatrix::new(self.schema.features.clone());
        let mut targets = Vec::with_capacity(rows.len());
        for row in rows {
            matrix.rows.push(self.encode(&row.claim)?.to_vec());
            targets.push(self.encode_target(&row.severity)?);
        }
        Ok((matrix, targets))
    }

    /// Check a bundle read back from disk.
    pub fn validate_loaded(&self, path: &str) -> Result<(), ArtifactLoadError> {
        self.schema.ensure_compatible(ArtifactKind::CodecBundle, path)?;
        for codec in [&self.claim_type, &self.risk_factor, &self.target] {
            if !codec.is_well_formed() {
                return Err(ArtifactLoadError::new(
                    ArtifactKind::CodecBundle,
                    path,
                    format!("{} codec classes are not sorted and unique", codec.field()),
                ));
            }
        }
        if self.target.len() < 2 {
            return Err(ArtifactLoadError::new(
                ArtifactKind::CodecBundle,
                path,
                "target codec needs at least two classes",
            ));
        }
        Ok(())
    }
}

/// Encoded feature matrix with its column names.
///
/// Column names travel with the data so the trainer's governance gate checks
/// the columns it is actually about to fit on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    pub feature_names: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    pub fn new(feature_names: Vec<String>) -> Self {
        Self {
            feature_names,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            feature_names: self.feature_names.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    /// Index of the first row whose width differs from the column count.
    pub fn ragged_row(&self) -> Option<usize> {
        let width = self.feature_names.len();
        self.rows.iter().position(|r| r.len() != width)
    }
}
