//! # advisor-core — Foundational Types for the Claims Severity Advisor
//!
//! Every other crate in the workspace depends on `advisor-core`; it depends
//! on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Validated claims.** [`Claim`] can only be built from checked input.
//!    Unknown enum labels and negative or non-finite amounts are rejected
//!    with a [`ValidationError`] naming the field and the offending value.
//!
//! 2. **One feature schema.** [`FeatureSchema`] is the single, versioned
//!    description of the 4-field feature order. The codec, the trainer, the
//!    artifact store and the advisory service all check against it.
//!
//! 3. **Injected policy boundaries.** [`PolicyBoundaryTable`] is a plain value
//!    built once and passed to whatever needs it. It annotates predictions and
//!    is snapshotted into metadata; it is never an input to the classifier.
//!
//! 4. **One entropy formula.** [`uncertainty::normalized_entropy`] is shared by
//!    evaluation and explanation so the two can never drift apart.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `advisor-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod boundaries;
pub mod claim;
pub mod digest;
pub mod error;
pub mod schema;
pub mod temporal;
pub mod uncertainty;

pub use boundaries::{DamageTier, PolicyBoundaryTable};
pub use claim::{Claim, ClaimInput, ClaimType, LabeledClaim, RiskFactor};
pub use digest::{sha256_digest, ContentDigest};
pub use error::{
    AdvisorError, ArtifactKind, ArtifactLoadError, GovernanceViolationError, UnknownCategoryError,
    ValidationError,
};
pub use schema::{FeatureSchema, FEATURE_COUNT, FEATURE_NAMES, SCHEMA_VERSION, TARGET_NAME};
pub use temporal::Timestamp;
pub use uncertainty::{normalized_entropy, shannon_entropy, UncertaintyLevel};
