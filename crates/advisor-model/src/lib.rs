//! # advisor-model — Classifier Trainer
//!
//! Fits the severity classifier over an encoded feature matrix and exposes it
//! to the rest of the pipeline only through the [`Classifier`] trait.
//!
//! ## Components
//!
//! - [`Classifier`]: the black-box seam (`predict_proba`, `predict`,
//!   `feature_importances`, `descriptor`). Evaluation, explanation and the
//!   advisory service depend on this trait, never on the backend type.
//! - [`GradientBoostedTrees`]: a multi-class softmax tree ensemble fitted by
//!   exact greedy second-order boosting. Serializable as the Trained Model
//!   Artifact.
//! - [`Hyperparameters`]: the fixed training constants.
//! - [`stratified_split`]: seeded, per-class 80/20 partition.
//! - [`train`]: the trainer. Runs the feature allow-list gate before any
//!   fitting work.
//!
//! ## Separation
//!
//! This crate does not depend on the Policy Boundary Table. Nothing derived
//! from it can reach the classifier's parameters.

pub mod boosting;
pub mod classifier;
pub mod error;
pub mod hyperparams;
pub mod split;
pub mod trainer;
pub mod tree;

pub use boosting::{softmax, GradientBoostedTrees};
pub use classifier::{argmax, Classifier, ModelDescriptor};
pub use error::{ModelError, SplitError, TrainError};
pub use hyperparams::{Hyperparameters, SPLIT_SEED, TEST_FRACTION};
pub use split::{stratified_split, SplitIndices};
pub use trainer::train;
pub use tree::TreeNode;
