//! # Error Hierarchy
//!
//! Structured error types for the advisory pipeline, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! The taxonomy has four families, each carrying enough context for a human
//! operator to act without reading logs:
//!
//! - [`ValidationError`]: bad caller input (field, value, reason).
//! - [`UnknownCategoryError`]: a category the codec never saw during fit.
//! - [`GovernanceViolationError`]: a disallowed feature set or a failed
//!   compliance checklist. Fatal at training time.
//! - [`ArtifactLoadError`]: a missing, corrupt or mismatched artifact,
//!   naming which artifact and where it was expected.
//!
//! None of these are retried automatically. They are deterministic given the
//! same input.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type for the advisory pipeline.
#[derive(Error, Debug)]
pub enum AdvisorError {
    /// Caller input failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A categorical value was absent from the fitted codec.
    #[error("unknown category: {0}")]
    UnknownCategory(#[from] UnknownCategoryError),

    /// A governance constraint was violated.
    #[error("governance violation: {0}")]
    Governance(#[from] GovernanceViolationError),

    /// A required artifact could not be loaded.
    #[error("artifact load error: {0}")]
    ArtifactLoad(#[from] ArtifactLoadError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Caller input that does not satisfy the claim data model.
///
/// Carries the offending field and the raw value exactly as received. Values
/// are never coerced or clamped before being reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {field} \"{value}\": {reason}")]
pub struct ValidationError {
    /// Field name as it appears in the claim record.
    pub field: String,
    /// The rejected value, rendered as text.
    pub value: String,
    /// What was expected instead.
    pub reason: String,
}

impl ValidationError {
    /// Build a validation error for `field`.
    pub fn new(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// A value outside an enumerated set.
    pub fn not_one_of(field: &str, value: &str, allowed: &[&str]) -> Self {
        Self::new(field, value, format!("must be one of: {}", allowed.join(", ")))
    }
}

/// The codec was asked to encode a category it never saw during fit.
///
/// Never mapped to a default index.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field} category \"{category}\" was not seen during codec fit (known: {})", .known.join(", "))]
pub struct UnknownCategoryError {
    /// The categorical field (`claim_type`, `risk_factor`, `severity`).
    pub field: String,
    /// The unseen category label or index.
    pub category: String,
    /// Categories the codec does know, in index order.
    pub known: Vec<String>,
}

/// Governance constraint violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GovernanceViolationError {
    /// A feature outside the allow-list was presented for training.
    #[error("unauthorized feature \"{feature}\" present (allowed: {})", .allowed.join(", "))]
    UnauthorizedFeature {
        /// The disallowed column.
        feature: String,
        /// The allow-list.
        allowed: Vec<String>,
    },

    /// An allow-listed feature was absent.
    #[error("required feature \"{feature}\" is missing")]
    MissingFeature {
        /// The absent column.
        feature: String,
    },

    /// The allowed features were present but not in schema order.
    #[error("feature order [{}] does not match schema order [{}]", .found.join(", "), .expected.join(", "))]
    FeatureOrderMismatch {
        /// Schema order.
        expected: Vec<String>,
        /// Order presented.
        found: Vec<String>,
    },

    /// The compliance checklist did not pass.
    #[error("governance compliance failed: {}", .failed_checks.join("; "))]
    ComplianceFailed {
        /// Names of the checks that failed, in checklist order.
        failed_checks: Vec<String>,
    },
}

/// The persisted artifacts the pipeline reads back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Serialized classifier state.
    Model,
    /// Category codec bundle.
    CodecBundle,
    /// Model metadata record.
    Metadata,
    /// Evaluation report.
    EvaluationReport,
    /// Tabular training data.
    Dataset,
}

impl ArtifactKind {
    /// Return the string identifier for this artifact.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::CodecBundle => "codec_bundle",
            Self::Metadata => "metadata",
            Self::EvaluationReport => "evaluation_report",
            Self::Dataset => "dataset",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An artifact was missing, unreadable, corrupt, or mismatched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to load {artifact} from {path}: {reason}")]
pub struct ArtifactLoadError {
    /// Which artifact failed.
    pub artifact: ArtifactKind,
    /// Where it was expected.
    pub path: String,
    /// Why it was rejected.
    pub reason: String,
}

impl ArtifactLoadError {
    /// Build an artifact load error.
    pub fn new(artifact: ArtifactKind, path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            artifact,
            path: path.into(),
            reason: reason.into(),
        }
    }
}
