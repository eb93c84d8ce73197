//! # Console Rendering
//!
//! Plain-text reports for reviewers. Every renderer returns a `String` so
//! the layout can be asserted in tests; the subcommands print the result.
//! `--json` bypasses this module entirely.

use advisor_core::UncertaintyLevel;
use advisor_eval::{ClassificationMetrics, ConfidenceMetrics, UncertaintyMetrics};
use advisor_governance::ComplianceReport;
use advisor_model::Classifier;
use advisor_service::{AdvisoryOutput, CertifiedModel, EvaluationReport, ImportanceEntry};

const RULE_WIDTH: usize = 70;

/// A titled block between two rules of `=`.
pub fn banner(title: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("{rule}\n{title}\n{rule}")
}

/// `0.8123 (81.23%)`
fn probability(p: f64) -> String {
    format!("{p:.4} ({:.2}%)", p * 100.0)
}

fn level_range(level: UncertaintyLevel) -> &'static str {
    match level {
        UncertaintyLevel::Low => "<0.3",
        UncertaintyLevel::Medium => "0.3-0.6",
        UncertaintyLevel::High => "≥0.6",
    }
}

// ---------------------------------------------------------------------------
// Advisory output
// ---------------------------------------------------------------------------

/// Full console view of one advisory suggestion.
pub fn advisory(out: &AdvisoryOutput) -> String {
    let governance = out.governance();
    let mut lines = vec![
        banner("INSURANCE CLAIM ADVISORY PREDICTION"),
        String::new(),
        format!("Status: {}", governance.governance_status()),
        format!("Decision Authority: {}", governance.decision_authority()),
        format!("Binding: {}", governance.binding()),
        format!("Prediction ID: {}", out.prediction_id),
        format!("Timestamp: {}", out.prediction_timestamp),
        String::new(),
        "INPUT SUMMARY".to_string(),
        "-".repeat(RULE_WIDTH),
        format!("  Claim Type: {}", out.input_summary.claim_type),
        format!("  Damage Amount: {}", out.input_summary.damage_amount),
        format!("  Injury Involved: {}", out.input_summary.injury_involved),
        format!("  Risk Factor: {}", out.input_summary.risk_factor),
        String::new(),
        "MODEL ADVISORY SUGGESTION (Non-Binding)".to_string(),
        "-".repeat(RULE_WIDTH),
        format!("  Suggested Severity: {}", out.model_suggestion),
        format!("  Model Confidence: {}", probability(out.confidence_score)),
        String::new(),
        "RULE SIGNALS (Transparent Decision Factors)".to_string(),
        "-".repeat(RULE_WIDTH),
    ];
    lines.extend(out.rule_signals.iter().map(|s| format!("  {s}")));

    lines.push(String::new());
    lines.push("FEATURE IMPORTANCE (What Influenced This Suggestion)".to_string());
    lines.push("-".repeat(RULE_WIDTH));
    lines.extend(out.feature_importance.ranking.iter().map(|a| {
        format!("  {}: {:.1}% importance", a.feature, a.relative_percentage)
    }));
    lines.push(format!("  ({})", out.feature_importance.note));

    let u = &out.uncertainty_assessment;
    lines.push(String::new());
    lines.push("UNCERTAINTY ASSESSMENT".to_string());
    lines.push("-".repeat(RULE_WIDTH));
    lines.push(format!("  Level: {}", u.level));
    lines.push(format!("  Normalized Entropy: {:.4}", u.normalized_entropy));
    lines.push(format!("  Interpretation: {}", u.interpretation));
    lines.push("  Confidence Distribution:".to_string());
    lines.extend(
        u.confidence_distribution
            .iter()
            .map(|c| format!("    {}: {}", c.class, probability(c.probability))),
    );

    lines.push(String::new());
    lines.push("GOVERNANCE REMINDERS".to_string());
    lines.push("-".repeat(RULE_WIDTH));
    lines.extend(out.governance_reminders.iter().map(|r| format!("  {r}")));
    lines.push("=".repeat(RULE_WIDTH));
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Governance
// ---------------------------------------------------------------------------

/// The five-item checklist with a verdict line.
pub fn compliance(report: &ComplianceReport) -> String {
    let mut lines = vec![banner("GOVERNANCE COMPLIANCE VERIFICATION")];
    for result in &report.checklist {
        let mark = if result.passed { "✓ PASS" } else { "✗ FAIL" };
        lines.push(format!("  {mark}  {}", result.name));
        if !result.passed {
            lines.push(format!("          {}", result.detail));
        }
    }
    lines.push(String::new());
    lines.push(if report.passed {
        "✓ ALL GOVERNANCE CHECKS PASSED".to_string()
    } else {
        "✗ GOVERNANCE VIOLATIONS DETECTED - REVIEW REQUIRED".to_string()
    });
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

fn classification(m: &ClassificationMetrics) -> Vec<String> {
    let mut lines = vec![
        banner("CLASSIFICATION PERFORMANCE EVALUATION"),
        format!("Overall Accuracy: {}", probability(m.accuracy)),
        String::new(),
        "PER-CLASS METRICS".to_string(),
        "-".repeat(RULE_WIDTH),
        format!(
            "{:<12}{:>12}{:>12}{:>12}{:>12}",
            "Class", "Precision", "Recall", "F1-Score", "Support"
        ),
    ];
    for c in &m.per_class {
        lines.push(format!(
            "{:<12}{:>12.4}{:>12.4}{:>12.4}{:>12}",
            c.label, c.precision, c.recall, c.f1_score, c.support
        ));
    }
    for (name, avg) in [("macro avg", &m.macro_avg), ("weighted avg", &m.weighted_avg)] {
        lines.push(format!(
            "{:<12}{:>12.4}{:>12.4}{:>12.4}{:>12}",
            name, avg.precision, avg.recall, avg.f1_score, avg.support
        ));
    }

    lines.push(String::new());
    lines.push("CONFUSION MATRIX".to_string());
    lines.push("-".repeat(RULE_WIDTH));
    let labels: Vec<&str> = m.per_class.iter().map(|c| c.label.as_str()).collect();
    let mut header = format!("{:<20}", "Actual \\ Predicted");
    for label in &labels {
        header.push_str(&format!("{label:>10}"));
    }
    lines.push(header);
    for (label, row) in labels.iter().zip(&m.confusion_matrix) {
        let mut line = format!("{label:<20}");
        for count in row {
            line.push_str(&format!("{count:>10}"));
        }
        lines.push(line);
    }

    lines.push(String::new());
    lines.push("CONFIDENCE CALIBRATION".to_string());
    lines.push("-".repeat(RULE_WIDTH));
    lines.push(format!("  Log Loss: {:.4} (lower is better)", m.log_loss));
    lines
}

fn confidence(c: &ConfidenceMetrics) -> Vec<String> {
    let mut lines = vec![
        banner("CONFIDENCE SCORE DISTRIBUTION ANALYSIS"),
        format!("  Mean Confidence:   {:.4}", c.mean_confidence),
        format!("  Median Confidence: {:.4}", c.median_confidence),
        format!("  Min Confidence:    {:.4}", c.min_confidence),
        format!("  Max Confidence:    {:.4}", c.max_confidence),
        format!("  Std Deviation:     {:.4}", c.std_confidence),
        String::new(),
        "CONFIDENCE DISTRIBUTION BY BINS".to_string(),
        "-".repeat(RULE_WIDTH),
    ];
    lines.extend(
        c.bins
            .iter()
            .map(|b| format!("  {:<10}{:>6} samples ({:.1}%)", b.range, b.count, b.percentage)),
    );
    lines.push(String::new());
    lines.push("ACCURACY BY CONFIDENCE LEVEL".to_string());
    lines.push("-".repeat(RULE_WIDTH));
    lines.extend(c.bins.iter().filter_map(|b| {
        b.accuracy
            .map(|acc| format!("  {:<10} accuracy {:.4} (n={})", b.range, acc, b.count))
    }));
    lines
}

fn importance(entries: &[ImportanceEntry]) -> Vec<String> {
    let mut lines = vec![banner("FEATURE IMPORTANCE ANALYSIS (Explainability)")];
    lines.extend(entries.iter().map(|e| {
        format!(
            "  {:<18}{:.4} ({:.1}%)",
            e.feature, e.importance, e.relative_percentage
        )
    }));
    lines
}

fn uncertainty(u: &UncertaintyMetrics, samples: usize) -> Vec<String> {
    let mut lines = vec![
        banner("UNCERTAINTY QUANTIFICATION ASSESSMENT"),
        format!("  Mean Entropy: {:.4}", u.mean_entropy),
        format!("  Mean Normalized Entropy: {:.4}", u.mean_normalized_entropy),
        String::new(),
        "UNCERTAINTY LEVEL DISTRIBUTION".to_string(),
        "-".repeat(RULE_WIDTH),
    ];
    for &level in UncertaintyLevel::all() {
        let count = u.count(level);
        let pct = if samples == 0 {
            0.0
        } else {
            count as f64 / samples as f64 * 100.0
        };
        lines.push(format!(
            "  {:<8}({:<7}): {:>6} ({pct:.1}%)",
            level.as_str(),
            level_range(level),
            count
        ));
    }
    lines
}

/// Full evaluation report.
pub fn evaluation(report: &EvaluationReport) -> String {
    let mut lines = vec![
        format!("Model: {}", report.model_file),
        format!("Test samples: {}", report.test_samples),
        format!("Evaluated: {}", report.evaluation_date),
        String::new(),
    ];
    lines.extend(classification(&report.classification_metrics));
    lines.push(String::new());
    lines.extend(confidence(&report.confidence_metrics));
    lines.push(String::new());
    lines.extend(importance(&report.feature_importance));
    lines.push(String::new());
    lines.extend(uncertainty(&report.uncertainty_metrics, report.test_samples));
    lines.push(String::new());
    lines.push(compliance(&report.governance_compliance));
    lines.push(String::new());
    lines.push(banner("EVALUATION COMPLETE"));
    lines.push(String::new());
    lines.push("GOVERNANCE REMINDER:".to_string());
    lines.push("  ⚠ This model produces ADVISORY outputs only".to_string());
    lines.push("  ⚠ Human confirmation is MANDATORY for all decisions".to_string());
    lines.push("  ⚠ High uncertainty cases require EXTRA human scrutiny".to_string());
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Training
// ---------------------------------------------------------------------------

/// Summary of a certified training run.
pub fn training(certified: &CertifiedModel, artifact_dir: &str) -> String {
    let trained = certified.trained();
    let metadata = &trained.metadata;
    let mut lines = Vec::new();

    if let Some(metrics) = &metadata.metrics {
        let total: usize = metrics.target_distribution.values().sum();
        lines.push(banner("TARGET DISTRIBUTION"));
        for (label, count) in &metrics.target_distribution {
            let pct = if total == 0 { 0.0 } else { *count as f64 / total as f64 * 100.0 };
            lines.push(format!("  {label:<8}{count:>6} ({pct:.1}%)"));
        }
        lines.push(String::new());
        lines.push(banner("ENCODING SUMMARY"));
        for (field, mapping) in &metrics.encoding {
            let pairs: Vec<String> = mapping.iter().map(|(k, v)| format!("{k}={v}")).collect();
            lines.push(format!("  {field}: {}", pairs.join(", ")));
        }
        lines.push(String::new());
        lines.push(banner("TRAIN/TEST SPLIT"));
        lines.push(format!("  Training samples: {}", metrics.split.train));
        lines.push(format!("  Test samples:     {}", metrics.split.test));
        lines.push(String::new());
    }

    let architecture = metadata.model_architecture.as_deref().unwrap_or("unknown");
    lines.push(banner(&format!("TRAINING {architecture} (Classical ML)")));
    if let Some(h) = &metadata.hyperparameters {
        lines.push(format!("  Hyperparameters: {}", serde_json::to_string(h).unwrap_or_default()));
    }
    lines.push(String::new());
    lines.push(banner("MODEL EVALUATION"));
    lines.extend(classification(&trained.metrics.classification).into_iter().skip(1));
    lines.push(String::new());

    let ranked = advisor_service::report::ranked_importance(&trained.model.feature_importances());
    lines.push(banner("FEATURE IMPORTANCE (Explainability)"));
    lines.extend(ranked.iter().map(|e| {
        format!("  {:<18}{:.4} ({:.1}%)", e.feature, e.importance, e.relative_percentage)
    }));
    lines.push(String::new());

    lines.push(compliance(certified.compliance()));
    lines.push(String::new());
    lines.push(banner("SAVING MODEL ARTIFACTS"));
    lines.push(format!("  Directory: {artifact_dir}"));
    lines.push(format!("  Model digest: {}", trained.artifacts.model_digest()));
    lines.push(format!("  Codec digest: {}", trained.artifacts.codec_digest()));
    lines.push(String::new());
    lines.push(banner("TRAINING COMPLETE"));
    lines.push(String::new());
    lines.push("GOVERNANCE REMINDER:".to_string());
    lines.push("  ⚠ This model produces ADVISORY outputs only".to_string());
    lines.push("  ⚠ All outputs are NON-BINDING suggestions".to_string());
    lines.push("  ⚠ Human confirmation is MANDATORY for all decisions".to_string());
    lines.push("  ⚠ Audit trail must be maintained for all uses".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use advisor_core::{ClaimInput, PolicyBoundaryTable};
    use advisor_governance::{verify, MetadataRecord};
    use advisor_service::{AdvisoryService, Dataset, SyntheticClaims, TrainingPipeline};

    fn certified() -> CertifiedModel {
        let rows = SyntheticClaims::new(300, 7).generate().unwrap();
        let dataset = Dataset::from_claims("synthetic-claims", &rows).unwrap();
        TrainingPipeline::new(Arc::new(PolicyBoundaryTable::frozen()))
            .fit(&dataset)
            .unwrap()
            .certify()
            .unwrap()
    }

    #[test]
    fn banner_is_framed_by_rules() {
        let b = banner("TITLE");
        let lines: Vec<&str> = b.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "=".repeat(70));
        assert_eq!(lines[1], "TITLE");
    }

    #[test]
    fn probability_shows_fraction_and_percent() {
        assert_eq!(probability(0.81234), "0.8123 (81.23%)");
    }

    #[test]
    fn failed_checklist_lists_every_check() {
        let text = compliance(&verify(&MetadataRecord::default()));
        assert_eq!(text.matches("✗ FAIL").count(), 5);
        assert!(text.ends_with("✗ GOVERNANCE VIOLATIONS DETECTED - REVIEW REQUIRED"));
    }

    #[test]
    fn training_summary_has_every_section() {
        let model = certified();
        let text = training(&model, "artifacts");
        for section in [
            "TARGET DISTRIBUTION",
            "ENCODING SUMMARY",
            "TRAIN/TEST SPLIT",
            "(Classical ML)",
            "MODEL EVALUATION",
            "FEATURE IMPORTANCE (Explainability)",
            "✓ ALL GOVERNANCE CHECKS PASSED",
            "SAVING MODEL ARTIFACTS",
            "TRAINING COMPLETE",
        ] {
            assert!(text.contains(section), "missing {section}");
        }
    }

    #[test]
    fn advisory_view_states_non_binding_status() {
        let trained = certified().into_trained();
        let service = AdvisoryService::new(
            Arc::new(trained.model),
            Arc::new(trained.codec),
            Arc::new(PolicyBoundaryTable::frozen()),
            "synthetic-claims",
        );
        let out = service
            .predict(&ClaimInput::new("Auto", 2_500.0, false, "low"))
            .unwrap();
        let text = advisory(&out);
        assert!(text.contains("Binding: false"));
        assert!(text.contains("Decision Authority: HUMAN (not machine)"));
        assert!(text.contains("  Damage Amount: $2,500.00"));
        assert!(text.contains("✓ Low damage (<$5,000): $2,500.00"));
        assert!(text.contains("UNCERTAINTY ASSESSMENT"));
        assert!(text.contains("GOVERNANCE REMINDERS"));
    }
}
