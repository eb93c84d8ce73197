//! Evaluation errors.

use thiserror::Error;

use advisor_model::ModelError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("held-out set is empty")]
    EmptyTestSet,

    #[error("feature matrix has {rows} rows but {labels} labels were given")]
    LengthMismatch { rows: usize, labels: usize },

    /// A label or prediction index outside the class list.
    #[error("class index {index} at row {row} is outside the {n_classes} known classes")]
    ClassOutOfRange {
        row: usize,
        index: usize,
        n_classes: usize,
    },

    #[error("model inference failed at row {row}: {source}")]
    Model {
        row: usize,
        #[source]
        source: ModelError,
    },
}
