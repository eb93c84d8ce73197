//! # Dataset Source
//!
//! Tabular claim records read from a JSON array of objects or a JSON Lines
//! file. The loader keeps the records untyped until after the governance
//! gate has seen the true column set, so an unauthorized column is reported
//! as such rather than as a parse failure.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use advisor_core::{ArtifactKind, ArtifactLoadError, ClaimInput, LabeledClaim};

use crate::error::ServiceError;

/// One training record as it appears on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub claim_type: String,
    pub damage_amount: f64,
    pub injury_involved: bool,
    pub risk_factor: String,
    pub severity: String,
}

impl From<&LabeledClaim> for DatasetRecord {
    fn from(row: &LabeledClaim) -> Self {
        let input = row.claim.to_input();
        Self {
            claim_type: input.claim_type,
            damage_amount: input.damage_amount,
            injury_involved: input.injury_involved,
            risk_factor: input.risk_factor,
            severity: row.severity.clone(),
        }
    }
}

/// A loaded dataset: its name, the columns actually present, and the raw
/// records.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    name: String,
    columns: Vec<String>,
    records: Vec<Map<String, Value>>,
}

impl Dataset {
    /// Load `path`. A file whose first non-blank character is `[` is read as
    /// a JSON array; anything else as JSON Lines.
    pub fn load(path: &Path) -> Result<Self, ArtifactLoadError> {
        let shown = path.display().to_string();
        let fail = |reason: String| ArtifactLoadError::new(ArtifactKind::Dataset, &shown, reason);
        let text = fs::read_to_string(path).map_err(|e| fail(e.to_string()))?;

        let values: Vec<Value> = if text.trim_start().starts_with('[') {
            serde_json::from_str(&text).map_err(|e| fail(format!("invalid JSON array: {e}")))?
        } else {
            text.lines()
                .enumerate()
                .filter(|(_, line)| !line.trim().is_empty())
                .map(|(i, line)| {
                    serde_json::from_str(line)
                        .map_err(|e| fail(format!("invalid JSON on line {}: {e}", i + 1)))
                })
                .collect::<Result<_, _>>()?
        };

        let mut records = Vec::with_capacity(values.len());
        for (i, value) in values.into_iter().enumerate() {
            match value {
                Value::Object(map) => records.push(map),
                other => return Err(fail(format!("record {i} is not an object: {other}"))),
            }
        }
        if records.is_empty() {
            return Err(fail("dataset contains no records".to_string()));
        }

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| shown.clone());
        let dataset = Self::from_records(name, records);
        tracing::info!(
            path = %shown,
            records = dataset.len(),
            columns = ?dataset.columns,
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Wrap in-memory labelled claims, e.g. from the synthetic generator.
    pub fn from_claims(name: impl Into<String>, rows: &[LabeledClaim]) -> Result<Self, ServiceError> {
        let records = rows
            .iter()
            .map(|row| match serde_json::to_value(DatasetRecord::from(row))? {
                Value::Object(map) => Ok(map),
                _ => Ok(Map::new()),
            })
            .collect::<Result<Vec<_>, serde_json::Error>>()?;
        Ok(Self::from_records(name.into(), records))
    }

    fn from_records(name: String, records: Vec<Map<String, Value>>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in &records {
            for key in record.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        Self {
            name,
            columns,
            records,
        }
    }

    /// Replace the recorded source name (defaults to the file stem).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every column present in at least one record, first-seen order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Parse and validate every record. Only call after the column set has
    /// passed the allow-list gate.
    pub fn labeled_claims(&self) -> Result<Vec<LabeledClaim>, ServiceError> {
        self.records
            .iter()
            .enumerate()
            .map(|(row, map)| {
                let record: DatasetRecord = serde_json::from_value(Value::Object(map.clone()))
                    .map_err(|e| ServiceError::MalformedRecord {
                        row,
                        reason: e.to_string(),
                    })?;
                let claim = ClaimInput::new(
                    record.claim_type,
                    record.damage_amount,
                    record.injury_involved,
                    record.risk_factor,
                )
                .validate()
                .map_err(|source| ServiceError::InvalidRecord { row, source })?;
                Ok(LabeledClaim {
                    claim,
                    severity: record.severity,
                })
            })
            .collect()
    }
}

/// Row count per severity label.
pub fn target_distribution(rows: &[LabeledClaim]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for row in rows {
        *counts.entry(row.severity.clone()).or_insert(0) += 1;
    }
    counts
}

/// Write labelled claims as JSON Lines.
pub fn write_jsonl(path: &Path, rows: &[LabeledClaim]) -> Result<(), ServiceError> {
    let write_err = |source| ServiceError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut out = Vec::new();
    for row in rows {
        serde_json::to_writer(&mut out, &DatasetRecord::from(row))?;
        out.push(b'\n');
    }
    let mut file = fs::File::create(path).map_err(write_err)?;
    file.write_all(&out).map_err(write_err)?;
    Ok(())
}
