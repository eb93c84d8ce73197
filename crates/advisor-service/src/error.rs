//! # Service Errors
//!
//! One enum for everything the training pipeline, artifact store and
//! advisory service can surface. The four taxonomy errors from
//! `advisor-core` pass through unchanged so callers can match on them.

use std::path::PathBuf;

use thiserror::Error;

use advisor_core::{
    ArtifactLoadError, GovernanceViolationError, UnknownCategoryError, ValidationError,
};
use advisor_eval::EvalError;
use advisor_explain::ExplainError;
use advisor_model::{ModelError, SplitError, TrainError};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategoryError),

    #[error(transparent)]
    Governance(#[from] GovernanceViolationError),

    #[error(transparent)]
    ArtifactLoad(#[from] ArtifactLoadError),

    /// A dataset record whose values do not form a valid claim.
    #[error("dataset record {row}: {source}")]
    InvalidRecord {
        row: usize,
        #[source]
        source: ValidationError,
    },

    /// A dataset record with a missing or mistyped field.
    #[error("dataset record {row}: {reason}")]
    MalformedRecord { row: usize, reason: String },

    #[error("split failed: {0}")]
    Split(#[from] SplitError),

    #[error("training failed: {0}")]
    Train(TrainError),

    #[error("evaluation failed: {0}")]
    Eval(#[from] EvalError),

    #[error("inference failed: {0}")]
    Model(#[from] ModelError),

    #[error("explanation failed: {0}")]
    Explain(#[from] ExplainError),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<TrainError> for ServiceError {
    fn from(err: TrainError) -> Self {
        match err {
            TrainError::Governance(g) => Self::Governance(g),
            other => Self::Train(other),
        }
    }
}

impl ServiceError {
    /// True for governance violations, which halt training and map to a
    /// distinct exit status at the CLI.
    pub fn is_governance(&self) -> bool {
        matches!(self, Self::Governance(_))
    }
}
