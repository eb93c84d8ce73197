//! # Evaluation Report
//!
//! The document written once per evaluation run. It mirrors the Evaluation
//! Engine's outputs and adds the model's global feature importance and the
//! governance checklist for the metadata the model was saved with.
//!
//! The held-out set is re-derived by applying the training split (same seed,
//! same fraction) to the same dataset, encoded with the saved codec.

use serde::{Deserialize, Serialize};

use advisor_core::{PolicyBoundaryTable, Timestamp, FEATURE_NAMES};
use advisor_eval::{
    evaluate, ClassificationMetrics, ConfidenceMetrics, Metrics, UncertaintyMetrics,
};
use advisor_governance::{check_dataset_columns, verify, ComplianceReport};
use advisor_model::Classifier;

use crate::dataset::Dataset;
use crate::error::ServiceError;
use crate::pipeline::{held_out_split, select};
use crate::store::ArtifactStore;

/// One feature's global importance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportanceEntry {
    pub feature: String,
    pub importance: f64,
    /// 0–100.
    pub relative_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub evaluation_date: Timestamp,
    pub model_file: String,
    pub test_samples: usize,
    pub classification_metrics: ClassificationMetrics,
    pub confidence_metrics: ConfidenceMetrics,
    /// Highest first.
    pub feature_importance: Vec<ImportanceEntry>,
    pub uncertainty_metrics: UncertaintyMetrics,
    pub governance_compliance: ComplianceReport,
}

impl EvaluationReport {
    pub fn build(
        metrics: Metrics,
        importances: &[f64],
        model_file: impl Into<String>,
        governance_compliance: ComplianceReport,
    ) -> Self {
        Self {
            evaluation_date: Timestamp::now(),
            model_file: model_file.into(),
            test_samples: metrics.test_samples,
            classification_metrics: metrics.classification,
            confidence_metrics: metrics.confidence,
            feature_importance: ranked_importance(importances),
            uncertainty_metrics: metrics.uncertainty,
            governance_compliance,
        }
    }
}

/// Schema-order importances ranked descending, ties in schema order.
pub fn ranked_importance(importances: &[f64]) -> Vec<ImportanceEntry> {
    let total: f64 = importances.iter().sum();
    let mut entries: Vec<ImportanceEntry> = FEATURE_NAMES
        .iter()
        .zip(importances)
        .map(|(name, &importance)| ImportanceEntry {
            feature: name.to_string(),
            importance,
            relative_percentage: if total > 0.0 {
                importance / total * 100.0
            } else {
                0.0
            },
        })
        .collect();
    entries.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    entries
}

/// Load the saved artifacts and evaluate them on the held-out part of
/// `dataset`.
pub fn evaluate_saved(
    store: &ArtifactStore,
    dataset: &Dataset,
    boundaries: &PolicyBoundaryTable,
) -> Result<EvaluationReport, ServiceError> {
    let loaded = store.load(boundaries)?;
    check_dataset_columns(dataset.columns())?;
    let rows = dataset.labeled_claims()?;
    let (x, y) = loaded.codec.encode_rows(&rows)?;
    let split = held_out_split(&y)?;
    let (x_test, y_test) = select(&x, &y, &split.test);

    let metrics = evaluate(&loaded.model, &x_test, &y_test, loaded.codec.class_labels())?;
    let compliance = verify(&loaded.metadata);
    Ok(EvaluationReport::build(
        metrics,
        &loaded.model.feature_importances(),
        store.model_path().display().to_string(),
        compliance,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{certified, synthetic_dataset, TRAINING_ROWS};

    #[test]
    fn ranking_is_descending_with_percentages() {
        let ranked = ranked_importance(&[0.1, 0.5, 0.1, 0.3]);
        let names: Vec<&str> = ranked.iter().map(|e| e.feature.as_str()).collect();
        assert_eq!(names, ["damage_amount", "risk_factor", "claim_type", "injury_involved"]);
        assert!((ranked[0].relative_percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn zero_importance_ranks_in_schema_order() {
        let ranked = ranked_importance(&[0.0; 4]);
        assert_eq!(ranked[0].feature, "claim_type");
        assert!(ranked.iter().all(|e| e.relative_percentage == 0.0));
    }

    #[test]
    fn evaluating_saved_artifacts_matches_training_metrics() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let model = certified();
        store.save(&model).unwrap();

        let report = evaluate_saved(
            &store,
            &synthetic_dataset(TRAINING_ROWS),
            &PolicyBoundaryTable::frozen(),
        )
        .unwrap();
        let trained = model.trained();
        assert_eq!(report.test_samples, trained.metrics.test_samples);
        assert_eq!(
            report.classification_metrics.confusion_matrix,
            trained.metrics.classification.confusion_matrix
        );
        assert!(report.governance_compliance.passed);
        assert_eq!(report.governance_compliance.checklist.len(), 5);

        let path = store.save_report(&report).unwrap();
        assert!(path.ends_with("evaluation_report.json"));
        let reloaded = store.load_report().unwrap();
        assert_eq!(reloaded.test_samples, report.test_samples);
        assert_eq!(reloaded.governance_compliance, report.governance_compliance);
    }
}
