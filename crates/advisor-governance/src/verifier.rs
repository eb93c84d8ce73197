//! # Governance Compliance Verifier
//!
//! A fixed, ordered checklist evaluated against a [`MetadataRecord`]. Every
//! check runs regardless of earlier outcomes so the report is always
//! complete. The aggregate passes iff every check passes.
//!
//! The verifier is a pure predicate: no I/O, no clock, no randomness.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use advisor_core::{GovernanceViolationError, FEATURE_COUNT, FEATURE_NAMES};

use crate::metadata::{MetadataRecord, ADVISORY_MARKER};

/// The five governance checks, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GovernanceCheck {
    ClassicalModel,
    AdvisoryOnly,
    HumanReview,
    AllowedFeatures,
    DecisionBoundaries,
}

impl GovernanceCheck {
    pub fn all() -> &'static [GovernanceCheck] {
        &[
            Self::ClassicalModel,
            Self::AdvisoryOnly,
            Self::HumanReview,
            Self::AllowedFeatures,
            Self::DecisionBoundaries,
        ]
    }

    /// Checklist label shown to reviewers.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ClassicalModel => "Classical ML model (no neural networks)",
            Self::AdvisoryOnly => "Advisory-only system (no autonomous decisions)",
            Self::HumanReview => "Human review required",
            Self::AllowedFeatures => "Only allowed features used (4 features)",
            Self::DecisionBoundaries => "Decision boundaries documented",
        }
    }

    /// 1-based position in the checklist.
    pub fn number(&self) -> usize {
        match self {
            Self::ClassicalModel => 1,
            Self::AdvisoryOnly => 2,
            Self::HumanReview => 3,
            Self::AllowedFeatures => 4,
            Self::DecisionBoundaries => 5,
        }
    }

    /// Evaluate this check alone.
    pub fn evaluate(&self, metadata: &MetadataRecord) -> CheckResult {
        let (passed, detail) = match self {
            Self::ClassicalModel => check_classical(metadata),
            Self::AdvisoryOnly => check_advisory(metadata),
            Self::HumanReview => check_human_review(metadata),
            Self::AllowedFeatures => check_features(metadata),
            Self::DecisionBoundaries => check_boundaries(metadata),
        };
        CheckResult {
            check: *self,
            name: self.name().to_string(),
            passed,
            detail,
        }
    }
}

impl fmt::Display for GovernanceCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub check: GovernanceCheck,
    pub name: String,
    pub passed: bool,
    /// What was found, for the reviewer.
    pub detail: String,
}

/// Full verifier output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub passed: bool,
    /// One entry per check, in checklist order.
    pub checklist: Vec<CheckResult>,
}

impl ComplianceReport {
    /// Names of the failed checks, in checklist order.
    pub fn failed_checks(&self) -> Vec<String> {
        self.checklist
            .iter()
            .filter(|c| !c.passed)
            .map(|c| c.name.clone())
            .collect()
    }

    /// `Err(ComplianceFailed)` unless every check passed.
    pub fn ensure_passed(&self) -> Result<(), GovernanceViolationError> {
        if self.passed {
            Ok(())
        } else {
            Err(GovernanceViolationError::ComplianceFailed {
                failed_checks: self.failed_checks(),
            })
        }
    }
}

/// Run the full checklist.
pub fn verify(metadata: &MetadataRecord) -> ComplianceReport {
    let checklist: Vec<CheckResult> = GovernanceCheck::all()
        .iter()
        .map(|check| check.evaluate(metadata))
        .collect();
    let passed = checklist.iter().all(|c| c.passed);
    for failed in checklist.iter().filter(|c| !c.passed) {
        tracing::warn!(
            check = failed.check.number(),
            name = %failed.name,
            detail = %failed.detail,
            "governance check failed"
        );
    }
    tracing::info!(passed, checks = checklist.len(), "governance checklist evaluated");
    ComplianceReport { passed, checklist }
}

fn check_classical(m: &MetadataRecord) -> (bool, String) {
    let family = m.model_architecture.as_deref().unwrap_or("unspecified architecture");
    match m.is_classical {
        Some(true) => (true, format!("is_classical = true ({family})")),
        Some(false) => (false, format!("is_classical = false ({family})")),
        None => (false, "is_classical flag missing from metadata".to_string()),
    }
}

fn check_advisory(m: &MetadataRecord) -> (bool, String) {
    match m.governance_status.as_deref() {
        Some(status) if status.to_uppercase().contains(ADVISORY_MARKER) => {
            (true, format!("governance_status = \"{status}\""))
        }
        Some(status) => (
            false,
            format!("governance_status \"{status}\" lacks the {ADVISORY_MARKER} marker"),
        ),
        None => (false, "governance_status missing from metadata".to_string()),
    }
}

fn check_human_review(m: &MetadataRecord) -> (bool, String) {
    match m.human_review_required {
        Some(true) => (true, "human_review_required = true".to_string()),
        Some(false) => (false, "human_review_required = false".to_string()),
        None => (false, "human_review_required missing from metadata".to_string()),
    }
}

fn check_features(m: &MetadataRecord) -> (bool, String) {
    let Some(features) = m.features.as_deref() else {
        return (false, "features missing from metadata".to_string());
    };
    let allowed: BTreeSet<&str> = FEATURE_NAMES.iter().copied().collect();
    let present: BTreeSet<&str> = features.iter().map(String::as_str).collect();
    if present == allowed {
        return (true, format!("{FEATURE_COUNT} allowed features: {}", features.join(", ")));
    }
    let missing: Vec<&str> = allowed.difference(&present).copied().collect();
    let extra: Vec<&str> = present.difference(&allowed).copied().collect();
    let mut parts = Vec::new();
    if !missing.is_empty() {
        parts.push(format!("missing: {}", missing.join(", ")));
    }
    if !extra.is_empty() {
        parts.push(format!("unauthorized: {}", extra.join(", ")));
    }
    (false, parts.join("; "))
}

fn check_boundaries(m: &MetadataRecord) -> (bool, String) {
    if m.decision_boundaries.is_some() {
        (true, "Policy Boundary Table snapshot present".to_string())
    } else {
        (false, "decision_boundaries missing from metadata".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::PolicyBoundaryTable;
    use advisor_model::ModelDescriptor;

    fn compliant() -> MetadataRecord {
        let descriptor = ModelDescriptor {
            model_type: "Gradient Boosted Trees Classifier".into(),
            model_architecture: "Classical ML (tree-based gradient boosting)".into(),
            is_classical: true,
        };
        MetadataRecord::for_model(&descriptor, &PolicyBoundaryTable::frozen())
    }

    #[test]
    fn compliant_record_passes_every_check() {
        let report = verify(&compliant());
        assert!(report.passed);
        assert_eq!(report.checklist.len(), 5);
        assert!(report.checklist.iter().all(|c| c.passed));
        assert!(report.ensure_passed().is_ok());
    }

    #[test]
    fn checklist_order_and_names_are_fixed() {
        let names: Vec<String> = verify(&compliant())
            .checklist
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(
            names,
            [
                "Classical ML model (no neural networks)",
                "Advisory-only system (no autonomous decisions)",
                "Human review required",
                "Only allowed features used (4 features)",
                "Decision boundaries documented",
            ]
        );
    }

    #[test]
    fn two_features_fails_only_check_four() {
        let mut record = compliant();
        record.features = Some(vec!["claim_type".into(), "damage_amount".into()]);
        let report = verify(&record);
        assert!(!report.passed);
        let outcomes: Vec<bool> = report.checklist.iter().map(|c| c.passed).collect();
        assert_eq!(outcomes, [true, true, true, false, true]);
        assert!(report.checklist[3].detail.contains("injury_involved"));
        assert!(report.checklist[3].detail.contains("risk_factor"));
    }

    #[test]
    fn feature_check_is_order_independent() {
        let mut record = compliant();
        record.features = Some(
            ["risk_factor", "injury_involved", "damage_amount", "claim_type"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        assert!(verify(&record).passed);
    }

    #[test]
    fn extra_feature_is_reported() {
        let mut record = compliant();
        if let Some(f) = record.features.as_mut() {
            f.push("zip_code".into());
        }
        let report = verify(&record);
        assert!(!report.checklist[3].passed);
        assert!(report.checklist[3].detail.contains("unauthorized: zip_code"));
    }

    #[test]
    fn neural_model_fails_check_one() {
        let mut record = compliant();
        record.is_classical = Some(false);
        let report = verify(&record);
        assert!(!report.checklist[0].passed);
        assert_eq!(report.failed_checks(), ["Classical ML model (no neural networks)"]);
    }

    #[test]
    fn advisory_marker_is_case_insensitive() {
        let mut record = compliant();
        record.governance_status = Some("advisory only".into());
        assert!(verify(&record).checklist[1].passed);
        record.governance_status = Some("AUTONOMOUS".into());
        assert!(!verify(&record).checklist[1].passed);
    }

    #[test]
    fn empty_record_fails_everything_without_short_circuit() {
        let report = verify(&MetadataRecord::default());
        assert!(!report.passed);
        assert_eq!(report.checklist.len(), 5);
        assert!(report.checklist.iter().all(|c| !c.passed));
        match report.ensure_passed() {
            Err(GovernanceViolationError::ComplianceFailed { failed_checks }) => {
                assert_eq!(failed_checks.len(), 5)
            }
            other => panic!("expected ComplianceFailed, got {other:?}"),
        }
    }

    #[test]
    fn check_numbers_match_position() {
        for (i, check) in GovernanceCheck::all().iter().enumerate() {
            assert_eq!(check.number(), i + 1);
        }
    }
}
