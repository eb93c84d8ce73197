//! # Training Pipeline
//!
//! ```text
//! dataset ─► allow-list gate ─► codec fit ─► stratified split ─► train
//!        ─► evaluate ─► Metadata Record ─► compliance checklist ─► save
//! ```
//!
//! Either governance gate halts the run with a
//! [`GovernanceViolationError`](advisor_core::GovernanceViolationError).
//! Nothing is written before the checklist has passed: only a
//! [`CertifiedModel`] can be saved, and the only way to get one is
//! [`TrainedModel::certify`].

use std::collections::BTreeMap;
use std::sync::Arc;

use advisor_codec::{FeatureCodec, FeatureMatrix};
use advisor_core::{PolicyBoundaryTable, FEATURE_NAMES};
use advisor_eval::{evaluate, Metrics};
use advisor_governance::{
    check_dataset_columns, verify, ComplianceReport, MetadataRecord, SplitSizes, TrainingMetrics,
};
use advisor_model::{
    stratified_split, train, Classifier, GradientBoostedTrees, Hyperparameters, SplitIndices,
    SPLIT_SEED, TEST_FRACTION,
};

use crate::dataset::{target_distribution, Dataset};
use crate::error::ServiceError;
use crate::store::{ArtifactStore, EncodedArtifacts};

/// Dataset type recorded when none is given.
pub const DEFAULT_DATASET_TYPE: &str = "synthetic";

/// Output of a training run that has not yet been certified.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub model: GradientBoostedTrees,
    pub codec: FeatureCodec,
    pub metadata: MetadataRecord,
    /// Held-out metrics from the training split.
    pub metrics: Metrics,
    pub artifacts: EncodedArtifacts,
}

impl TrainedModel {
    /// Run the compliance checklist on this run's metadata.
    pub fn certify(self) -> Result<CertifiedModel, ServiceError> {
        let compliance = verify(&self.metadata);
        compliance.ensure_passed()?;
        Ok(CertifiedModel {
            trained: self,
            compliance,
        })
    }
}

/// A trained model whose metadata passed every governance check.
#[derive(Debug, Clone)]
pub struct CertifiedModel {
    trained: TrainedModel,
    compliance: ComplianceReport,
}

impl CertifiedModel {
    pub fn trained(&self) -> &TrainedModel {
        &self.trained
    }

    pub fn compliance(&self) -> &ComplianceReport {
        &self.compliance
    }

    pub fn into_trained(self) -> TrainedModel {
        self.trained
    }
}

/// Governed training run.
#[derive(Debug, Clone)]
pub struct TrainingPipeline {
    boundaries: Arc<PolicyBoundaryTable>,
    dataset_type: String,
}

impl TrainingPipeline {
    pub fn new(boundaries: Arc<PolicyBoundaryTable>) -> Self {
        Self {
            boundaries,
            dataset_type: DEFAULT_DATASET_TYPE.to_string(),
        }
    }

    pub fn with_dataset_type(mut self, dataset_type: impl Into<String>) -> Self {
        self.dataset_type = dataset_type.into();
        self
    }

    /// Train and evaluate without certifying or writing anything.
    pub fn fit(&self, dataset: &Dataset) -> Result<TrainedModel, ServiceError> {
        check_dataset_columns(dataset.columns())?;
        let rows = dataset.labeled_claims()?;
        let distribution = target_distribution(&rows);
        tracing::info!(rows = rows.len(), ?distribution, "target distribution");

        let codec = FeatureCodec::fit(&rows);
        let (x, y) = codec.encode_rows(&rows)?;
        let split = held_out_split(&y)?;
        let (x_train, y_train) = select(&x, &y, &split.train);
        let (x_test, y_test) = select(&x, &y, &split.test);
        tracing::info!(train = y_train.len(), test = y_test.len(), "stratified split");

        let hyperparameters = Hyperparameters::fixed();
        let model = train(&x_train, &y_train, &hyperparameters)?;
        let metrics = evaluate(&model, &x_test, &y_test, codec.class_labels())?;
        let artifacts = EncodedArtifacts::encode(&model, &codec)?;

        let mut encoding = BTreeMap::new();
        for category in [&codec.claim_type, &codec.risk_factor, &codec.target] {
            encoding.insert(category.field().to_string(), category.mapping());
        }
        let feature_importance = FEATURE_NAMES
            .iter()
            .map(|f| f.to_string())
            .zip(model.feature_importances())
            .collect();

        let mut metadata = MetadataRecord::for_model(&model.descriptor(), &self.boundaries);
        metadata.target_mapping = Some(codec.target.mapping());
        metadata.hyperparameters = Some(hyperparameters);
        metadata.dataset = Some(dataset.name().to_string());
        metadata.dataset_type = Some(self.dataset_type.clone());
        metadata.model_digest = Some(artifacts.model_digest().clone());
        metadata.codec_digest = Some(artifacts.codec_digest().clone());
        metadata.metrics = Some(TrainingMetrics {
            accuracy: metrics.classification.accuracy,
            classification_report: metrics.classification.clone(),
            target_distribution: distribution,
            encoding,
            split: SplitSizes {
                train: y_train.len(),
                test: y_test.len(),
            },
            feature_importance,
        });

        Ok(TrainedModel {
            model,
            codec,
            metadata,
            metrics,
            artifacts,
        })
    }

    /// Fit, certify, and save to `store`.
    pub fn run(&self, dataset: &Dataset, store: &ArtifactStore) -> Result<CertifiedModel, ServiceError> {
        let certified = self.fit(dataset)?.certify()?;
        store.save(&certified)?;
        Ok(certified)
    }
}

/// The fixed-seed 80/20 stratified split used by both training and
/// evaluation.
pub fn held_out_split(y: &[usize]) -> Result<SplitIndices, ServiceError> {
    Ok(stratified_split(y, TEST_FRACTION, SPLIT_SEED)?)
}

/// Rows and labels at `indices`.
pub fn select(x: &FeatureMatrix, y: &[usize], indices: &[usize]) -> (FeatureMatrix, Vec<usize>) {
    (x.select(indices), indices.iter().map(|&i| y[i]).collect())
}
