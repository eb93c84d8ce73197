//! # Artifact Store
//!
//! Persists and reloads the artifacts of one training run inside a single
//! directory:
//!
//! | File | Contents |
//! |---|---|
//! | `model.json` | Trained Model Artifact |
//! | `encoders.json` | Codec bundle |
//! | `model_metadata.json` | Metadata Record |
//! | `evaluation_report.json` | Evaluation report (written by `evaluate`) |
//!
//! ## Load-time checks
//!
//! A model is only handed to a caller once every check passes; the first
//! failure is an [`ArtifactLoadError`] naming the artifact:
//!
//! 1. All three files exist and parse.
//! 2. Each embedded feature schema equals the current one.
//! 3. The model and codec bytes hash to the digests in the metadata, so a
//!    model is never paired with another run's codec.
//! 4. The codec's class count matches the model's.
//! 5. The metadata's boundary snapshot equals the table in force.
//!
//! The governance checklist is not part of loading. Evaluation reports it;
//! the advisory service refuses to serve a model that fails it.

use std::fs;
use std::path::{Path, PathBuf};

use advisor_codec::FeatureCodec;
use advisor_core::{ArtifactKind, ArtifactLoadError, ContentDigest, PolicyBoundaryTable};
use advisor_governance::MetadataRecord;
use advisor_model::{Classifier, GradientBoostedTrees};
use serde::de::DeserializeOwned;

use crate::error::ServiceError;
use crate::pipeline::CertifiedModel;
use crate::report::EvaluationReport;

pub const MODEL_FILE: &str = "model.json";
pub const CODEC_FILE: &str = "encoders.json";
pub const METADATA_FILE: &str = "model_metadata.json";
pub const REPORT_FILE: &str = "evaluation_report.json";

/// Serialized model and codec with the digests of exactly those bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedArtifacts {
    model_bytes: Vec<u8>,
    codec_bytes: Vec<u8>,
    model_digest: ContentDigest,
    codec_digest: ContentDigest,
}

impl EncodedArtifacts {
    pub fn encode(
        model: &GradientBoostedTrees,
        codec: &FeatureCodec,
    ) -> Result<Self, serde_json::Error> {
        let model_bytes = serde_json::to_vec_pretty(model)?;
        let codec_bytes = serde_json::to_vec_pretty(codec)?;
        Ok(Self {
            model_digest: ContentDigest::of_bytes(&model_bytes),
            codec_digest: ContentDigest::of_bytes(&codec_bytes),
            model_bytes,
            codec_bytes,
        })
    }

    pub fn model_digest(&self) -> &ContentDigest {
        &self.model_digest
    }

    pub fn codec_digest(&self) -> &ContentDigest {
        &self.codec_digest
    }
}

/// Everything needed to serve predictions, after all load-time checks.
#[derive(Debug, Clone)]
pub struct LoadedArtifacts {
    pub model: GradientBoostedTrees,
    pub codec: FeatureCodec,
    pub metadata: MetadataRecord,
}

/// Directory-backed artifact store.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn model_path(&self) -> PathBuf {
        self.dir.join(MODEL_FILE)
    }

    pub fn codec_path(&self) -> PathBuf {
        self.dir.join(CODEC_FILE)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.dir.join(METADATA_FILE)
    }

    pub fn report_path(&self) -> PathBuf {
        self.dir.join(REPORT_FILE)
    }

    /// Write a certified model. Metadata is written last, so a directory with
    /// a metadata file always has the artifacts it describes.
    pub fn save(&self, certified: &CertifiedModel) -> Result<(), ServiceError> {
        let trained = certified.trained();
        fs::create_dir_all(&self.dir).map_err(|source| ServiceError::Write {
            path: self.dir.clone(),
            source,
        })?;
        write_bytes(&self.model_path(), &trained.artifacts.model_bytes)?;
        write_bytes(&self.codec_path(), &trained.artifacts.codec_bytes)?;
        write_bytes(
            &self.metadata_path(),
            &serde_json::to_vec_pretty(&trained.metadata)?,
        )?;
        tracing::info!(
            dir = %self.dir.display(),
            model_digest = %trained.artifacts.model_digest,
            codec_digest = %trained.artifacts.codec_digest,
            "artifacts saved"
        );
        Ok(())
    }

    /// Read the Metadata Record alone, without any cross-checks.
    pub fn load_metadata(&self) -> Result<MetadataRecord, ArtifactLoadError> {
        let path = self.metadata_path();
        let bytes = read_bytes(ArtifactKind::Metadata, &path)?;
        parse(ArtifactKind::Metadata, &path, &bytes)
    }

    /// Load model, codec and metadata and run every load-time check against
    /// the injected boundary table.
    pub fn load(&self, boundaries: &PolicyBoundaryTable) -> Result<LoadedArtifacts, ArtifactLoadError> {
        let metadata_path = self.metadata_path();
        let meta_shown = metadata_path.display().to_string();
        let meta_err = |reason: String| {
            ArtifactLoadError::new(ArtifactKind::Metadata, meta_shown.as_str(), reason)
        };
        let metadata = self.load_metadata()?;
        metadata
            .feature_schema()
            .ok_or_else(|| meta_err("feature schema missing".to_string()))?
            .ensure_compatible(ArtifactKind::Metadata, &meta_shown)?;

        let model_path = self.model_path();
        let model_bytes = read_bytes(ArtifactKind::Model, &model_path)?;
        check_digest(
            ArtifactKind::Model,
            &model_path,
            &model_bytes,
            metadata.model_digest.as_ref(),
        )?;
        let model: GradientBoostedTrees = parse(ArtifactKind::Model, &model_path, &model_bytes)?;
        model.validate_loaded(&model_path.display().to_string())?;

        let codec_path = self.codec_path();
        let codec_bytes = read_bytes(ArtifactKind::CodecBundle, &codec_path)?;
        check_digest(
            ArtifactKind::CodecBundle,
            &codec_path,
            &codec_bytes,
            metadata.codec_digest.as_ref(),
        )?;
        let codec: FeatureCodec = parse(ArtifactKind::CodecBundle, &codec_path, &codec_bytes)?;
        codec.validate_loaded(&codec_path.display().to_string())?;

        if codec.class_labels().len() != model.n_classes() {
            return Err(ArtifactLoadError::new(
                ArtifactKind::CodecBundle,
                codec_path.display().to_string(),
                format!(
                    "target codec has {} classes but the model predicts {}",
                    codec.class_labels().len(),
                    model.n_classes()
                ),
            ));
        }

        match &metadata.decision_boundaries {
            Some(snapshot) if snapshot == boundaries => {}
            Some(_) => {
                return Err(meta_err(
                    "decision boundary snapshot differs from the Policy Boundary Table in force"
                        .to_string(),
                ))
            }
            None => return Err(meta_err("decision boundary snapshot missing".to_string())),
        }

        tracing::info!(dir = %self.dir.display(), "artifacts loaded and verified");
        Ok(LoadedArtifacts {
            model,
            codec,
            metadata,
        })
    }

    pub fn save_report(&self, report: &EvaluationReport) -> Result<PathBuf, ServiceError> {
        let path = self.report_path();
        write_bytes(&path, &serde_json::to_vec_pretty(report)?)?;
        tracing::info!(path = %path.display(), "evaluation report saved");
        Ok(path)
    }

    pub fn load_report(&self) -> Result<EvaluationReport, ArtifactLoadError> {
        let path = self.report_path();
        let bytes = read_bytes(ArtifactKind::EvaluationReport, &path)?;
        parse(ArtifactKind::EvaluationReport, &path, &bytes)
    }
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), ServiceError> {
    fs::write(path, bytes).map_err(|source| ServiceError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn read_bytes(kind: ArtifactKind, path: &Path) -> Result<Vec<u8>, ArtifactLoadError> {
    fs::read(path).map_err(|e| {
        let reason = if e.kind() == std::io::ErrorKind::NotFound {
            "file not found".to_string()
        } else {
            e.to_string()
        };
        ArtifactLoadError::new(kind, path.display().to_string(), reason)
    })
}

fn parse<T: DeserializeOwned>(
    kind: ArtifactKind,
    path: &Path,
    bytes: &[u8],
) -> Result<T, ArtifactLoadError> {
    serde_json::from_slice(bytes).map_err(|e| {
        ArtifactLoadError::new(kind, path.display().to_string(), format!("corrupt: {e}"))
    })
}

fn check_digest(
    kind: ArtifactKind,
    path: &Path,
    bytes: &[u8],
    expected: Option<&ContentDigest>,
) -> Result<(), ArtifactLoadError> {
    let shown = path.display().to_string();
    let Some(expected) = expected else {
        return Err(ArtifactLoadError::new(kind, shown, "metadata records no digest"));
    };
    let actual = ContentDigest::of_bytes(bytes);
    if &actual != expected {
        return Err(ArtifactLoadError::new(
            kind,
            shown,
            format!("digest {actual} does not match metadata digest {expected}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use advisor_core::GovernanceViolationError;

    use crate::advisory::AdvisoryService;
    use crate::test_fixtures::certified;

    fn saved() -> (tempfile::TempDir, ArtifactStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("artifacts"));
        store.save(&certified()).unwrap();
        (dir, store)
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_dir, store) = saved();
        for path in [store.model_path(), store.codec_path(), store.metadata_path()] {
            assert!(path.exists(), "{} missing", path.display());
        }
        let loaded = store.load(&PolicyBoundaryTable::frozen()).unwrap();
        let original = certified().into_trained();
        assert_eq!(loaded.codec, original.codec);
        assert_eq!(loaded.metadata.model_digest, original.metadata.model_digest);
        let x = [0.0, 2_500.0, 0.0, 1.0];
        let a = loaded.model.predict_proba(&x).unwrap();
        let b = original.model.predict_proba(&x).unwrap();
        for (p, q) in a.iter().zip(&b) {
            assert!((p - q).abs() < 1e-9);
        }
    }

    #[test]
    fn missing_model_names_the_artifact() {
        let (_dir, store) = saved();
        fs::remove_file(store.model_path()).unwrap();
        let err = store.load(&PolicyBoundaryTable::frozen()).unwrap_err();
        assert_eq!(err.artifact, ArtifactKind::Model);
        assert_eq!(err.reason, "file not found");
    }

    #[test]
    fn tampered_model_fails_digest_check() {
        let (_dir, store) = saved();
        let mut bytes = fs::read(store.model_path()).unwrap();
        bytes.push(b'\n');
        fs::write(store.model_path(), bytes).unwrap();
        let err = store.load(&PolicyBoundaryTable::frozen()).unwrap_err();
        assert_eq!(err.artifact, ArtifactKind::Model);
        assert!(err.reason.contains("digest"));
    }

    #[test]
    fn codec_from_another_run_is_rejected() {
        let (_dir, store) = saved();
        let mut codec = certified().into_trained().codec;
        codec.claim_type = advisor_codec::CategoryCodec::fit("claim_type", ["Auto", "Health"]);
        fs::write(store.codec_path(), serde_json::to_vec_pretty(&codec).unwrap()).unwrap();
        let err = store.load(&PolicyBoundaryTable::frozen()).unwrap_err();
        assert_eq!(err.artifact, ArtifactKind::CodecBundle);
    }

    #[test]
    fn corrupt_metadata_is_reported() {
        let (_dir, store) = saved();
        fs::write(store.metadata_path(), b"{ not json").unwrap();
        let err = store.load_metadata().unwrap_err();
        assert_eq!(err.artifact, ArtifactKind::Metadata);
        assert!(err.reason.starts_with("corrupt"));
    }

    #[test]
    fn schema_version_mismatch_fails_fast() {
        let (_dir, store) = saved();
        let mut metadata = store.load_metadata().unwrap();
        metadata.schema_version = Some("claims-features/v0".into());
        fs::write(store.metadata_path(), serde_json::to_vec(&metadata).unwrap()).unwrap();
        let err = store.load(&PolicyBoundaryTable::frozen()).unwrap_err();
        assert_eq!(err.artifact, ArtifactKind::Metadata);
        assert!(err.reason.contains("v0"));
    }

    #[test]
    fn different_boundary_table_is_rejected() {
        let (_dir, store) = saved();
        let mut other = PolicyBoundaryTable::frozen();
        other.injury_multiplier = 2.0;
        let err = store.load(&other).unwrap_err();
        assert_eq!(err.artifact, ArtifactKind::Metadata);
        assert!(err.reason.contains("boundary"));
    }

    #[test]
    fn non_compliant_metadata_loads_but_is_not_served() {
        let (_dir, store) = saved();
        let mut metadata = store.load_metadata().unwrap();
        metadata.human_review_required = Some(false);
        fs::write(store.metadata_path(), serde_json::to_vec(&metadata).unwrap()).unwrap();
        let boundaries = Arc::new(PolicyBoundaryTable::frozen());
        assert!(store.load(&boundaries).is_ok());
        match AdvisoryService::load(&store, boundaries) {
            Err(ServiceError::Governance(GovernanceViolationError::ComplianceFailed {
                failed_checks,
            })) => assert_eq!(failed_checks, ["Human review required"]),
            Err(other) => panic!("expected ComplianceFailed, got {other:?}"),
            Ok(_) => panic!("non-compliant model was served"),
        }
    }

    #[test]
    fn missing_report_is_an_artifact_error() {
        let (_dir, store) = saved();
        let err = store.load_report().unwrap_err();
        assert_eq!(err.artifact, ArtifactKind::EvaluationReport);
    }
}
