//! # Metadata Record
//!
//! The structured document written next to every Trained Model Artifact. It
//! is the only input the Governance Compliance Verifier sees.
//!
//! Every field is optional on the wire. A record read back from disk (or
//! produced by some other tool) may be missing any of them, and the verifier
//! must still report each check independently rather than fail to parse.
//! A field whose shape this version does not understand (a foreign
//! `metrics` layout, a timestamp without an offset) reads as absent.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use advisor_core::{
    ContentDigest, FeatureSchema, PolicyBoundaryTable, Timestamp, FEATURE_NAMES, SCHEMA_VERSION,
};
use advisor_eval::ClassificationMetrics;
use advisor_model::{Hyperparameters, ModelDescriptor};

/// Governance status tag recorded on every model this pipeline trains.
pub const GOVERNANCE_STATUS: &str = "ADVISORY ONLY - NO AUTONOMOUS DECISIONS";

/// Marker the governance status must contain.
pub const ADVISORY_MARKER: &str = "ADVISORY";

/// Human-readable description of the target column.
pub const TARGET_DESCRIPTION: &str = "severity (advisory levels: Low/Medium/High)";

/// Train/test partition sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitSizes {
    pub train: usize,
    pub test: usize,
}

/// Aggregate results of the training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    /// Held-out accuracy.
    pub accuracy: f64,
    pub classification_report: ClassificationMetrics,
    /// Row count per severity label over the whole dataset.
    pub target_distribution: BTreeMap<String, usize>,
    /// `field -> (label -> index)` for every category codec.
    pub encoding: BTreeMap<String, BTreeMap<String, usize>>,
    pub split: SplitSizes,
    /// Global importance per feature name.
    pub feature_importance: BTreeMap<String, f64>,
}

/// Metadata for one trained model.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataRecord {
    #[serde(deserialize_with = "lenient")]
    pub model_type: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub model_architecture: Option<String>,
    /// Capability flag set by the backend that produced the model.
    #[serde(deserialize_with = "lenient")]
    pub is_classical: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub governance_status: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub human_review_required: Option<bool>,
    /// Feature names in classifier order.
    #[serde(deserialize_with = "lenient")]
    pub features: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient")]
    pub target: Option<String>,
    /// Severity label -> class index.
    #[serde(deserialize_with = "lenient")]
    pub target_mapping: Option<BTreeMap<String, usize>>,
    #[serde(deserialize_with = "lenient")]
    pub schema_version: Option<String>,
    /// Policy Boundary Table in force at training time.
    #[serde(deserialize_with = "lenient")]
    pub decision_boundaries: Option<PolicyBoundaryTable>,
    #[serde(deserialize_with = "lenient")]
    pub hyperparameters: Option<Hyperparameters>,
    #[serde(deserialize_with = "lenient")]
    pub metrics: Option<TrainingMetrics>,
    #[serde(deserialize_with = "lenient")]
    pub training_date: Option<Timestamp>,
    #[serde(deserialize_with = "lenient")]
    pub dataset: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub dataset_type: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub model_digest: Option<ContentDigest>,
    #[serde(deserialize_with = "lenient")]
    pub codec_digest: Option<ContentDigest>,
}

impl MetadataRecord {
    /// Start a record for a freshly trained model. Identity, governance tags,
    /// the feature schema and the boundary snapshot are filled in; metrics,
    /// dataset and digests are left to the caller.
    pub fn for_model(descriptor: &ModelDescriptor, boundaries: &PolicyBoundaryTable) -> Self {
        Self {
            model_type: Some(descriptor.model_type.clone()),
            model_architecture: Some(descriptor.model_architecture.clone()),
            is_classical: Some(descriptor.is_classical),
            governance_status: Some(GOVERNANCE_STATUS.to_string()),
            human_review_required: Some(true),
            features: Some(FEATURE_NAMES.iter().map(|s| s.to_string()).collect()),
            target: Some(TARGET_DESCRIPTION.to_string()),
            schema_version: Some(SCHEMA_VERSION.to_string()),
            decision_boundaries: Some(boundaries.clone()),
            training_date: Some(Timestamp::now()),
            ..Self::default()
        }
    }

    /// The feature schema this record claims, if both parts are present.
    pub fn feature_schema(&self) -> Option<FeatureSchema> {
        Some(FeatureSchema {
            version: self.schema_version.clone()?,
            features: self.features.clone()?,
        })
    }
}

/// Read a field as `T`, or `None` when the value has some other shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> ModelDescriptor {
        ModelDescriptor {
            model_type: "Gradient Boosted Trees Classifier".into(),
            model_architecture: "Classical ML (tree-based gradient boosting)".into(),
            is_classical: true,
        }
    }

    #[test]
    fn for_model_fills_governance_fields() {
        let record = MetadataRecord::for_model(&descriptor(), &PolicyBoundaryTable::frozen());
        assert_eq!(record.is_classical, Some(true));
        assert_eq!(record.governance_status.as_deref(), Some(GOVERNANCE_STATUS));
        assert_eq!(record.human_review_required, Some(true));
        assert_eq!(record.feature_schema(), Some(FeatureSchema::current()));
        assert!(record.decision_boundaries.is_some());
        assert!(record.metrics.is_none());
    }

    #[test]
    fn missing_fields_parse_as_none() {
        let record: MetadataRecord =
            serde_json::from_str(r#"{"model_type": "x", "features": ["claim_type"]}"#).unwrap();
        assert_eq!(record.model_type.as_deref(), Some("x"));
        assert!(record.human_review_required.is_none());
        assert!(record.decision_boundaries.is_none());
        assert!(record.feature_schema().is_none());
    }

    #[test]
    fn foreign_report_fields_do_not_hide_the_checklist() {
        let json = serde_json::json!({
            "model_type": "Gradient Boosted Trees Classifier",
            "is_classical": true,
            "governance_status": GOVERNANCE_STATUS,
            "human_review_required": true,
            "features": FEATURE_NAMES,
            "decision_boundaries": PolicyBoundaryTable::frozen(),
            "metrics": {"accuracy": 0.91},
            "training_date": "2024-05-01T10:00:00.123456",
            "hyperparameters": "defaults",
            "model_digest": 17
        });
        let record: MetadataRecord = serde_json::from_value(json).unwrap();
        assert!(record.metrics.is_none());
        assert!(record.training_date.is_none());
        assert!(record.hyperparameters.is_none());
        assert!(record.model_digest.is_none());
        assert_eq!(record.is_classical, Some(true));
        assert!(record.decision_boundaries.is_some());
        assert!(crate::verify(&record).passed);
    }

    #[test]
    fn mistyped_checklist_field_fails_only_its_check() {
        let mut json = serde_json::to_value(MetadataRecord::for_model(
            &descriptor(),
            &PolicyBoundaryTable::frozen(),
        ))
        .unwrap();
        json["human_review_required"] = serde_json::json!("yes");
        let record: MetadataRecord = serde_json::from_value(json).unwrap();
        assert!(record.human_review_required.is_none());
        let report = crate::verify(&record);
        assert_eq!(report.failed_checks(), ["Human review required"]);
    }

    #[test]
    fn boundary_snapshot_serializes_in_full() {
        let record = MetadataRecord::for_model(&descriptor(), &PolicyBoundaryTable::frozen());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["decision_boundaries"]["injury_multiplier"], 1.8);
        assert_eq!(json["features"][1], "damage_amount");
    }
}
