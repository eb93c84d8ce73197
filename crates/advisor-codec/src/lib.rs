//! # advisor-codec — Feature Codec
//!
//! Maps raw claim attributes to the fixed-order numeric vector the classifier
//! consumes, and maps predicted class indices back to severity labels.
//!
//! - **Category codec** (`category.rs`): one bidirectional label↔index mapping
//!   per categorical field. Categories are indexed in lexicographic order of
//!   their labels, so the same training data produces the same mapping no
//!   matter how its rows are ordered.
//!
//! - **Feature codec** (`feature.rs`): the bundle of the three category codecs
//!   plus the [`FeatureSchema`](advisor_core::FeatureSchema) it was fitted
//!   against. Persisted as one file per deployment.
//!
//! Codecs are immutable after fit. Encoding a category that was not seen
//! during fit is an [`UnknownCategoryError`](advisor_core::UnknownCategoryError),
//! never a silent default.

pub mod category;
pub mod feature;

pub use category::CategoryCodec;
pub use feature::{FeatureCodec, FeatureMatrix};
