//! # advisor-governance — Governance Layer
//!
//! Two gates stand between a dataset and a deployable model:
//!
//! 1. [`check_dataset_columns`] runs before training. Any column outside the
//!    four allowed features (plus the target) halts the pipeline with a
//!    [`GovernanceViolationError`](advisor_core::GovernanceViolationError).
//! 2. [`verify`] runs on the produced [`MetadataRecord`] before anything is
//!    saved. A failed checklist also halts the pipeline.
//!
//! ## Checklist
//!
//! | # | Check | Passes when |
//! |---|---|---|
//! | 1 | Classical ML model (no neural networks) | `is_classical == true` |
//! | 2 | Advisory-only system (no autonomous decisions) | `governance_status` contains `ADVISORY` |
//! | 3 | Human review required | `human_review_required == true` |
//! | 4 | Only allowed features used (4 features) | `features` equals the allow-list as a set |
//! | 5 | Decision boundaries documented | `decision_boundaries` present |

pub mod allow_list;
pub mod metadata;
pub mod verifier;

pub use allow_list::check_dataset_columns;
pub use metadata::{
    MetadataRecord, SplitSizes, TrainingMetrics, ADVISORY_MARKER, GOVERNANCE_STATUS,
    TARGET_DESCRIPTION,
};
pub use verifier::{verify, CheckResult, ComplianceReport, GovernanceCheck};
