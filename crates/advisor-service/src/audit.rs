//! # Advisory Audit Trail
//!
//! Record of every advisory issued and every request rejected.
//! Each issued entry carries the SHA-256 digest of the serialized advisory
//! record, so a stored advisory can later be matched to its audit entry.
//!
//! The trail lives in memory and is bounded: once full it trims the oldest
//! 10%, counts them, and logs a warning. Writing it anywhere durable is the
//! caller's job; with an audit log configured, the CLI appends every entry to
//! JSON Lines as it is recorded.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use advisor_core::{sha256_digest, ContentDigest, Timestamp, UncertaintyLevel};

use crate::advisory::AdvisoryOutput;

/// What an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEntryType {
    /// An advisory suggestion was returned to a human reviewer.
    AdvisoryIssued,
    /// A request was refused (invalid input or unknown category).
    AdvisoryRejected,
}

impl AuditEntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AdvisoryIssued => "advisory_issued",
            Self::AdvisoryRejected => "advisory_rejected",
        }
    }
}

impl std::fmt::Display for AuditEntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub entry_type: AuditEntryType,
    pub timestamp: Timestamp,
    pub prediction_id: Option<Uuid>,
    pub suggested_severity: Option<String>,
    pub confidence_score: Option<f64>,
    pub uncertainty_level: Option<UncertaintyLevel>,
    /// Digest of the serialized advisory record.
    pub record_digest: Option<ContentDigest>,
    /// Why a request was rejected.
    pub reason: Option<String>,
}

impl AuditEntry {
    /// Entry for an issued advisory.
    pub fn issued(output: &AdvisoryOutput) -> Self {
        let record_digest = match sha256_digest(output) {
            Ok(d) => Some(d),
            Err(e) => {
                tracing::warn!(
                    prediction_id = %output.prediction_id,
                    error = %e,
                    "advisory serialization failed; digest unavailable"
                );
                None
            }
        };
        Self {
            entry_type: AuditEntryType::AdvisoryIssued,
            timestamp: output.prediction_timestamp,
            prediction_id: Some(output.prediction_id),
            suggested_severity: Some(output.severity_level.clone()),
            confidence_score: Some(output.confidence_score),
            uncertainty_level: Some(output.uncertainty_assessment.level),
            record_digest,
            reason: None,
        }
    }

    /// Entry for a refused request.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            entry_type: AuditEntryType::AdvisoryRejected,
            timestamp: Timestamp::now(),
            prediction_id: None,
            suggested_severity: None,
            confidence_score: None,
            uncertainty_level: None,
            record_digest: None,
            reason: Some(reason.into()),
        }
    }

    /// Digest of this entry itself.
    pub fn digest(&self) -> Option<ContentDigest> {
        match sha256_digest(self) {
            Ok(d) => Some(d),
            Err(e) => {
                tracing::warn!(entry_type = %self.entry_type, error = %e, "audit entry digest unavailable");
                None
            }
        }
    }
}

/// Bounded in-memory audit trail.
///
/// Not `Sync`-shared by itself; wrap in `Arc<Mutex<_>>` to share.
pub struct AuditTrail {
    entries: Vec<AuditEntry>,
    max_entries: usize,
    trimmed: usize,
}

impl AuditTrail {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries,
            trimmed: 0,
        }
    }

    /// Append, trimming the oldest 10% (at least one) when over capacity.
    pub fn append(&mut self, entry: AuditEntry) {
        self.entries.push(entry);
        if self.entries.len() > self.max_entries {
            let trim_count = (self.max_entries / 10).max(1);
            self.entries.drain(..trim_count);
            self.trimmed += trim_count;
            tracing::warn!(
                trim_count,
                trimmed_total = self.trimmed,
                max_entries = self.max_entries,
                "audit trail full; oldest entries trimmed from memory"
            );
        }
    }

    /// Entries dropped from memory since the trail was created.
    pub fn trimmed(&self) -> usize {
        self.trimmed
    }

    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries_by_type(&self, entry_type: AuditEntryType) -> Vec<&AuditEntry> {
        self.entries
            .iter()
            .filter(|e| e.entry_type == entry_type)
            .collect()
    }

    /// Issued advisories at the given uncertainty level, e.g. to queue the
    /// high-uncertainty ones for closer review.
    pub fn entries_with_uncertainty(&self, level: UncertaintyLevel) -> Vec<&AuditEntry> {
        self.entries
            .iter()
            .filter(|e| e.uncertainty_level == Some(level))
            .collect()
    }

    pub fn find_prediction(&self, prediction_id: Uuid) -> Option<&AuditEntry> {
        self.entries
            .iter()
            .find(|e| e.prediction_id == Some(prediction_id))
    }

    /// The last `n` entries, or all of them.
    pub fn last_n(&self, n: usize) -> &[AuditEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// `(index, digest)` for every entry that could be digested.
    pub fn compute_digests(&self) -> Vec<(usize, ContentDigest)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| entry.digest().map(|d| (i, d)))
            .collect()
    }
}

impl Default for AuditTrail {
    fn default() -> Self {
        Self::new(10_000)
    }
}

impl std::fmt::Debug for AuditTrail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditTrail")
            .field("entries", &self.entries.len())
            .field("max_entries", &self.max_entries)
            .field("trimmed", &self.trimmed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisory::AdvisoryService;
    use crate::test_fixtures::certified;
    use advisor_core::{ClaimInput, PolicyBoundaryTable};
    use std::sync::Arc;

    fn advisory() -> AdvisoryOutput {
        let trained = certified().into_trained();
        AdvisoryService::new(
            Arc::new(trained.model),
            Arc::new(trained.codec),
            Arc::new(PolicyBoundaryTable::frozen()),
            "synthetic-claims",
        )
        .predict(&ClaimInput::new("Auto", 2_500.0, false, "low"))
        .unwrap()
    }

    #[test]
    fn issued_entry_mirrors_the_advisory() {
        let out = advisory();
        let entry = AuditEntry::issued(&out);
        assert_eq!(entry.entry_type, AuditEntryType::AdvisoryIssued);
        assert_eq!(entry.prediction_id, Some(out.prediction_id));
        assert_eq!(entry.suggested_severity.as_deref(), Some(out.severity_level.as_str()));
        assert_eq!(entry.record_digest, Some(sha256_digest(&out).unwrap()));
        assert_eq!(entry.uncertainty_level, Some(out.uncertainty_assessment.level));
    }

    #[test]
    fn rejected_entry_keeps_reason() {
        let entry = AuditEntry::rejected("invalid claim_type \"Boat\"");
        assert_eq!(entry.entry_type, AuditEntryType::AdvisoryRejected);
        assert!(entry.prediction_id.is_none());
        assert!(entry.reason.unwrap().contains("Boat"));
    }

    #[test]
    fn trail_queries() {
        let out = advisory();
        let mut trail = AuditTrail::new(100);
        trail.append(AuditEntry::issued(&out));
        trail.append(AuditEntry::rejected("bad input"));
        assert_eq!(trail.len(), 2);
        assert_eq!(trail.entries_by_type(AuditEntryType::AdvisoryRejected).len(), 1);
        assert!(trail.find_prediction(out.prediction_id).is_some());
        assert!(trail.find_prediction(Uuid::new_v4()).is_none());
        assert_eq!(
            trail
                .entries_with_uncertainty(out.uncertainty_assessment.level)
                .len(),
            1
        );
        assert_eq!(trail.compute_digests().len(), 2);
    }

    #[test]
    fn trail_trims_oldest_when_full() {
        let mut trail = AuditTrail::new(10);
        for i in 0..15 {
            trail.append(AuditEntry::rejected(format!("r{i}")));
        }
        assert_eq!(trail.len(), 10);
        assert_eq!(trail.trimmed(), 5);
        assert_eq!(trail.entries()[0].reason.as_deref(), Some("r5"));
        assert_eq!(trail.last_n(2)[1].reason.as_deref(), Some("r14"));
        assert_eq!(trail.last_n(100).len(), 10);
    }

    #[test]
    fn trail_under_capacity_trims_nothing() {
        let mut trail = AuditTrail::new(10);
        for i in 0..10 {
            trail.append(AuditEntry::rejected(format!("r{i}")));
        }
        assert_eq!(trail.trimmed(), 0);
        assert_eq!(trail.entries()[0].reason.as_deref(), Some("r0"));
    }

    #[test]
    fn entry_type_display() {
        assert_eq!(AuditEntryType::AdvisoryIssued.to_string(), "advisory_issued");
        assert_eq!(AuditEntryType::AdvisoryRejected.to_string(), "advisory_rejected");
    }

    #[test]
    fn entry_serde_roundtrip() {
        let entry = AuditEntry::issued(&advisory());
        let json = serde_json::to_string(&entry).unwrap();
        let parsed: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.prediction_id, entry.prediction_id);
        assert_eq!(parsed.record_digest, entry.record_digest);
    }
}
