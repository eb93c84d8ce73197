//! # Advisory Scenarios
//!
//! The reference claims run through a freshly trained, saved and reloaded
//! advisory service: rule signal markers, governance flags, validation
//! refusals and the shape of the serialized record.

use std::sync::{Arc, OnceLock};

use advisor_core::{ClaimInput, PolicyBoundaryTable, ValidationError};
use advisor_service::{
    AdvisoryService, ArtifactStore, Dataset, ServiceError, SyntheticClaims, TrainingPipeline,
};

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

fn service() -> &'static AdvisoryService {
    static SERVICE: OnceLock<(tempfile::TempDir, AdvisoryService)> = OnceLock::new();
    &SERVICE
        .get_or_init(|| {
            let dir = tempfile::tempdir().unwrap();
            let boundaries = Arc::new(PolicyBoundaryTable::frozen());
            let rows = SyntheticClaims::new(600, 7).generate().unwrap();
            let dataset = Dataset::from_claims("synthetic-claims", &rows).unwrap();
            let store = ArtifactStore::new(dir.path());
            TrainingPipeline::new(boundaries.clone())
                .run(&dataset, &store)
                .unwrap();
            let service = AdvisoryService::load(&store, boundaries).unwrap();
            (dir, service)
        })
        .1
}

fn has_marker(signals: &[String], marker: &str) -> bool {
    signals.iter().any(|s| s.contains(marker))
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn low_auto_claim_is_non_binding_with_benign_signals() {
    let out = service()
        .predict(&ClaimInput::new("Auto", 2_500.0, false, "low"))
        .unwrap();
    assert!(has_marker(&out.rule_signals, "Low damage"));
    assert!(has_marker(&out.rule_signals, "No injury involved"));
    assert!(!out.binding());
    assert!(out.requires_human_review());
    assert_eq!(out.input_summary.damage_amount, "$2,500.00");
    assert_eq!(out.input_summary.injury_involved, "No");
}

#[test]
fn very_high_liability_claim_carries_concern_markers() {
    let out = service()
        .predict(&ClaimInput::new("Liability", 75_000.0, true, "high"))
        .unwrap();
    assert!(has_marker(&out.rule_signals, "Very high damage"));
    assert!(has_marker(&out.rule_signals, "Injury involved"));
    assert!(has_marker(&out.rule_signals, "High risk factor"));
    assert!(!out.binding());
}

#[test]
fn unknown_claim_type_is_a_validation_error() {
    let err = service()
        .predict(&ClaimInput::new("Boat", 2_500.0, false, "low"))
        .unwrap_err();
    match err {
        ServiceError::Validation(ValidationError { field, value, .. }) => {
            assert_eq!(field, "claim_type");
            assert_eq!(value, "Boat");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn invalid_amount_and_risk_are_refused() {
    for (amount, risk, field) in [
        (-10.0, "low", "damage_amount"),
        (f64::NAN, "low", "damage_amount"),
        (100.0, "extreme", "risk_factor"),
    ] {
        let err = service()
            .predict(&ClaimInput::new("Auto", amount, false, risk))
            .unwrap_err();
        assert!(
            matches!(&err, ServiceError::Validation(v) if v.field == field),
            "{field}: {err:?}"
        );
    }
}

#[test]
fn zero_damage_is_accepted() {
    let out = service()
        .predict(&ClaimInput::new("Health", 0.0, false, "medium"))
        .unwrap();
    assert_eq!(out.input_summary.damage_amount, "$0.00");
}

// ---------------------------------------------------------------------------
// Record shape
// ---------------------------------------------------------------------------

#[test]
fn confidence_matches_suggested_class_probability() {
    let out = service()
        .predict(&ClaimInput::new("Property", 12_000.0, false, "medium"))
        .unwrap();
    let dist = &out.uncertainty_assessment.confidence_distribution;
    let total: f64 = dist.iter().map(|c| c.probability).sum();
    assert!((total - 1.0).abs() < 1e-9);
    let suggested = dist
        .iter()
        .find(|c| c.class == out.severity_level)
        .unwrap();
    assert_eq!(suggested.probability, out.confidence_score);
    assert_eq!(
        out.model_suggestion,
        format!("{} Severity (Advisory)", out.severity_level)
    );
}

#[test]
fn serialized_record_carries_governance_fields() {
    let out = service()
        .predict(&ClaimInput::new("Auto", 2_500.0, false, "low"))
        .unwrap();
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["binding"], false);
    assert_eq!(json["requires_human_review"], true);
    assert_eq!(json["decision_authority"], "HUMAN (not machine)");
    assert_eq!(json["governance_reminders"].as_array().unwrap().len(), 5);
    assert_eq!(json["feature_importance"]["attribution_scope"], "global");
    assert_eq!(json["prediction_metadata"]["dataset_source"], "synthetic-claims");
    assert_eq!(
        json["decision_boundaries_reference"],
        serde_json::to_value(PolicyBoundaryTable::frozen()).unwrap()
    );
}

#[test]
fn every_prediction_gets_a_fresh_identity() {
    let claim = ClaimInput::new("Auto", 2_500.0, false, "low");
    let a = service().predict(&claim).unwrap();
    let b = service().predict(&claim).unwrap();
    assert_ne!(a.prediction_id, b.prediction_id);
    assert_eq!(a.severity_level, b.severity_level);
    assert_eq!(a.confidence_score, b.confidence_score);
}

#[test]
fn concurrent_predictions_agree() {
    let claim = ClaimInput::new("Liability", 75_000.0, true, "high");
    let expected = service().predict(&claim).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let svc = service().clone();
            let claim = claim.clone();
            std::thread::spawn(move || svc.predict(&claim).unwrap())
        })
        .collect();
    for handle in handles {
        let out = handle.join().unwrap();
        assert_eq!(out.severity_level, expected.severity_level);
        assert_eq!(out.confidence_score, expected.confidence_score);
    }
}
