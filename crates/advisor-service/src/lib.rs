//! # advisor-service — Training Orchestration and Advisory Prediction
//!
//! The top of the library stack. Everything here composes the lower crates;
//! no statistics or policy logic is defined in this crate.
//!
//! - [`dataset`]: JSON / JSON Lines record loading with column capture.
//! - [`synth`]: seeded synthetic claims for demonstrations.
//! - [`pipeline`]: the governed training run ([`TrainingPipeline`]).
//! - [`store`]: versioned, digest-checked artifact persistence.
//! - [`report`]: the evaluation report and the re-evaluation of saved
//!   artifacts.
//! - [`advisory`]: the Advisory Prediction Service.
//! - [`audit`]: the in-memory advisory audit trail.
//!
//! ## Publish-once, read-many
//!
//! An [`AdvisoryService`] is built once from fully loaded artifacts and is
//! `Clone + Send + Sync`. Concurrent `predict` calls share the model, codec
//! and boundary table without locking.

pub mod advisory;
pub mod audit;
pub mod dataset;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod store;
pub mod synth;

pub use advisory::{
    AdvisoryOutput, AdvisoryService, GovernanceFlags, InputSummary, PredictionMetadata,
    ADVISORY_STATUS, DECISION_AUTHORITY, GOVERNANCE_REMINDERS,
};
pub use audit::{AuditEntry, AuditEntryType, AuditTrail};
pub use dataset::{target_distribution, write_jsonl, Dataset, DatasetRecord};
pub use error::ServiceError;
pub use pipeline::{CertifiedModel, TrainedModel, TrainingPipeline, DEFAULT_DATASET_TYPE};
pub use report::{evaluate_saved, EvaluationReport, ImportanceEntry};
pub use store::{ArtifactStore, EncodedArtifacts, LoadedArtifacts};
pub use synth::SyntheticClaims;


#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync + Clone>() {}

    #[test]
    fn service_is_shareable() {
        assert_send_sync::<AdvisoryService>();
    }
}
