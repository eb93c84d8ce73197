//! # Audit Log — durable sink for the advisory audit trail.
//!
//! Entries are kept in an in-memory [`AuditTrail`] and, when an audit log
//! path is configured, appended to it as JSON Lines.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};

use advisor_service::{AuditEntry, AuditTrail};

#[derive(Debug, Default)]
pub struct AuditLog {
    path: Option<PathBuf>,
    trail: AuditTrail,
}

impl AuditLog {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            trail: AuditTrail::default(),
        }
    }

    pub fn trail(&self) -> &AuditTrail {
        &self.trail
    }

    /// Record `entry` in memory and append it to the log file, if any.
    pub fn record(&mut self, entry: AuditEntry) -> Result<()> {
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            let mut line = serde_json::to_vec(&entry)?;
            line.push(b'\n');
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open audit log: {}", path.display()))?;
            file.write_all(&line)
                .with_context(|| format!("failed to append to audit log: {}", path.display()))?;
        }
        tracing::info!(
            entry_type = %entry.entry_type,
            prediction_id = ?entry.prediction_id,
            "audit entry recorded"
        );
        self.trail.append(entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_service::AuditEntryType;

    #[test]
    fn appends_one_line_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("audit.jsonl");
        let mut log = AuditLog::new(Some(path.clone()));
        log.record(AuditEntry::rejected("unknown claim_type")).unwrap();
        log.record(AuditEntry::rejected("negative damage_amount")).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let entries: Vec<AuditEntry> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].reason.as_deref(), Some("negative damage_amount"));
        assert_eq!(log.trail().entries_by_type(AuditEntryType::AdvisoryRejected).len(), 2);
    }

    #[test]
    fn memory_only_without_path() {
        let mut log = AuditLog::new(None);
        log.record(AuditEntry::rejected("bad input")).unwrap();
        assert_eq!(log.trail().len(), 1);
    }
}
