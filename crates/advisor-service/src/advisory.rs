//! # Advisory Prediction Service
//!
//! `predict(claim) -> AdvisoryOutput`: validate, encode, infer, explain,
//! assemble. The service never persists anything and never calls out.
//!
//! ## Governance invariants
//!
//! `binding = false` and `requires_human_review = true` live in a private
//! [`GovernanceFlags`] value that only this module can construct. There is
//! no setter, no constructor argument, and no path from model output to
//! either flag.
//!
//! Model, codec and boundary table are shared read-only behind `Arc`s, so a
//! single service can answer any number of concurrent requests.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use advisor_codec::FeatureCodec;
use advisor_core::{Claim, ClaimInput, PolicyBoundaryTable, Timestamp};
use advisor_explain::{format_currency, Explainer, FeatureImportance, UncertaintyAssessment};
use advisor_governance::verify;
use advisor_model::{argmax, Classifier};

use crate::error::ServiceError;
use crate::store::{ArtifactStore, LoadedArtifacts};

pub const ADVISORY_STATUS: &str = "ADVISORY ONLY - HUMAN CONFIRMATION REQUIRED";
pub const DECISION_AUTHORITY: &str = "HUMAN (not machine)";

/// The fixed reminders attached to every advisory output.
pub const GOVERNANCE_REMINDERS: [&str; 5] = [
    "⚠ This is an ADVISORY suggestion only",
    "⚠ Human decision-maker has FULL AUTHORITY to accept or override",
    "⚠ Human must independently evaluate the claim",
    "⚠ Human must document rationale for final decision",
    "⚠ All decisions must be logged in audit trail",
];

/// Authority flags. Constructible only inside this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GovernanceFlags {
    governance_status: &'static str,
    decision_authority: &'static str,
    binding: bool,
    requires_human_review: bool,
}

impl GovernanceFlags {
    fn advisory() -> Self {
        Self {
            governance_status: ADVISORY_STATUS,
            decision_authority: DECISION_AUTHORITY,
            binding: false,
            requires_human_review: true,
        }
    }

    pub fn governance_status(&self) -> &str {
        self.governance_status
    }

    pub fn decision_authority(&self) -> &str {
        self.decision_authority
    }

    pub fn binding(&self) -> bool {
        self.binding
    }

    pub fn requires_human_review(&self) -> bool {
        self.requires_human_review
    }
}

/// Echo of the caller's claim, formatted for a reviewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputSummary {
    pub claim_type: String,
    /// e.g. `$2,500.00`
    pub damage_amount: String,
    /// `Yes` or `No`.
    pub injury_involved: String,
    pub risk_factor: String,
}

impl InputSummary {
    fn of(claim: &Claim) -> Self {
        Self {
            claim_type: claim.claim_type().to_string(),
            damage_amount: format_currency(claim.damage_amount()),
            injury_involved: if claim.injury_involved() { "Yes" } else { "No" }.to_string(),
            risk_factor: claim.risk_factor().to_string(),
        }
    }
}

/// Provenance of the model behind a suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionMetadata {
    pub model_type: String,
    pub model_architecture: String,
    pub dataset_source: String,
    pub schema_version: String,
}

/// One advisory suggestion. Never a decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvisoryOutput {
    pub prediction_id: Uuid,
    pub prediction_timestamp: Timestamp,
    #[serde(flatten)]
    governance: GovernanceFlags,
    /// e.g. `Low Severity (Advisory)`.
    pub model_suggestion: String,
    pub severity_level: String,
    /// Probability of the suggested class.
    pub confidence_score: f64,
    pub input_summary: InputSummary,
    pub rule_signals: Vec<String>,
    pub feature_importance: FeatureImportance,
    pub uncertainty_assessment: UncertaintyAssessment,
    pub prediction_metadata: PredictionMetadata,
    pub governance_reminders: Vec<String>,
    pub decision_boundaries_reference: PolicyBoundaryTable,
}

impl AdvisoryOutput {
    pub fn governance(&self) -> &GovernanceFlags {
        &self.governance
    }

    pub fn binding(&self) -> bool {
        self.governance.binding
    }

    pub fn requires_human_review(&self) -> bool {
        self.governance.requires_human_review
    }
}

/// Single-instance inference with mandatory explanation.
#[derive(Clone)]
pub struct AdvisoryService {
    model: Arc<dyn Classifier>,
    codec: Arc<FeatureCodec>,
    explainer: Explainer,
    metadata: PredictionMetadata,
}

impl AdvisoryService {
    pub fn new(
        model: Arc<dyn Classifier>,
        codec: Arc<FeatureCodec>,
        boundaries: Arc<PolicyBoundaryTable>,
        dataset_source: impl Into<String>,
    ) -> Self {
        let descriptor = model.descriptor();
        Self {
            metadata: PredictionMetadata {
                model_type: descriptor.model_type,
                model_architecture: descriptor.model_architecture,
                dataset_source: dataset_source.into(),
                schema_version: codec.schema.version.clone(),
            },
            model,
            codec,
            explainer: Explainer::new(boundaries),
        }
    }

    /// Serve already-loaded artifacts. Metadata that fails the governance
    /// checklist is a [`ServiceError::Governance`].
    pub fn from_artifacts(
        loaded: LoadedArtifacts,
        boundaries: Arc<PolicyBoundaryTable>,
    ) -> Result<Self, ServiceError> {
        verify(&loaded.metadata).ensure_passed()?;
        let dataset = loaded
            .metadata
            .dataset
            .clone()
            .unwrap_or_else(|| "unknown".to_string());
        Ok(Self::new(
            Arc::new(loaded.model),
            Arc::new(loaded.codec),
            boundaries,
            dataset,
        ))
    }

    /// Load from a store and serve.
    pub fn load(
        store: &ArtifactStore,
        boundaries: Arc<PolicyBoundaryTable>,
    ) -> Result<Self, ServiceError> {
        let loaded = store.load(&boundaries)?;
        Self::from_artifacts(loaded, boundaries)
    }

    pub fn boundaries(&self) -> &PolicyBoundaryTable {
        self.explainer.boundaries()
    }

    pub fn class_labels(&self) -> &[String] {
        self.codec.class_labels()
    }

    /// Validate raw input and produce an advisory suggestion.
    pub fn predict(&self, input: &ClaimInput) -> Result<AdvisoryOutput, ServiceError> {
        let claim = input.validate()?;
        self.predict_claim(&claim)
    }

    /// Produce an advisory suggestion for an already-validated claim.
    pub fn predict_claim(&self, claim: &Claim) -> Result<AdvisoryOutput, ServiceError> {
        let features = self.codec.encode(claim)?;
        let probabilities = self.model.predict_proba(&features)?;
        let predicted = argmax(&probabilities);
        let severity = self.codec.decode(predicted)?.to_string();
        let confidence = probabilities.get(predicted).copied().unwrap_or(0.0);

        let bundle = self.explainer.explain(
            claim,
            &probabilities,
            self.model.as_ref(),
            self.codec.class_labels(),
        )?;

        let output = AdvisoryOutput {
            prediction_id: Uuid::new_v4(),
            prediction_timestamp: Timestamp::now(),
            governance: GovernanceFlags::advisory(),
            model_suggestion: format!("{severity} Severity (Advisory)"),
            severity_level: severity,
            confidence_score: confidence,
            input_summary: InputSummary::of(claim),
            rule_signals: bundle.rule_signals,
            feature_importance: bundle.feature_importance,
            uncertainty_assessment: bundle.uncertainty,
            prediction_metadata: self.metadata.clone(),
            governance_reminders: GOVERNANCE_REMINDERS.iter().map(|s| s.to_string()).collect(),
            decision_boundaries_reference: self.explainer.boundaries().clone(),
        };
        tracing::debug!(
            prediction_id = %output.prediction_id,
            severity = %output.severity_level,
            confidence = output.confidence_score,
            uncertainty = %output.uncertainty_assessment.level,
            "advisory issued"
        );
        Ok(output)
    }
}

impl std::fmt::Debug for AdvisoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvisoryService")
            .field("model", &self.metadata.model_type)
            .field("classes", &self.codec.class_labels())
            .field("schema_version", &self.metadata.schema_version)
            .finish()
    }
}
