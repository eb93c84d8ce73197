//! Error types for training, splitting and inference.

use thiserror::Error;

use advisor_core::GovernanceViolationError;

/// Inference-time failures of a fitted classifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The feature vector does not have the width the model was trained on.
    #[error("feature vector has {found} values, model expects {expected}")]
    FeatureWidth { expected: usize, found: usize },
}

/// Failures of the stratified split.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SplitError {
    #[error("cannot split an empty label set")]
    Empty,

    #[error("test fraction {0} must lie strictly between 0 and 1")]
    InvalidFraction(f64),

    /// Every class had a single row, so nothing could be held out.
    #[error("no class has enough rows to hold out a test sample")]
    EmptyTestSet,
}

/// Failures of the Classifier Trainer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrainError {
    /// The feature set is not exactly the allow-list. Raised before fitting.
    #[error(transparent)]
    Governance(#[from] GovernanceViolationError),

    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("feature matrix has {rows} rows but {labels} labels were given")]
    LengthMismatch { rows: usize, labels: usize },

    #[error("row {row} has {found} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row} feature {feature} is not finite")]
    NonFiniteFeature { row: usize, feature: String },

    /// At least two severity classes are needed for a multi-class objective.
    #[error("training labels contain {0} distinct class(es); at least 2 are required")]
    TooFewClasses(usize),
}
