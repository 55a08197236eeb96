//! Prediction service: Orchestrates the ensemble scoring pipeline.
//!
//! One request flows validate -> three model predictions -> aggregate ->
//! tier. The three predictions have no data dependency on each other and
//! run on scoped threads; all three must succeed before aggregation, and
//! no partial result is ever returned.

use std::path::Path;
use std::sync::Arc;
use std::thread;

use chrono::Utc;

use crate::adapters::{
    artifact_dir, CentroidModel, DecisionTreeModel, GaussianNbModel,
};
use crate::domain::{
    ensemble, EnsembleResult, HealthReport, ModelMetrics, ModelName, ModelStatus, ModelVerdict,
    PatientRecord, ServiceStatus,
};
use crate::ports::{ModelError, RiskModel};
use crate::PredictionError;

/// Service combining three trained classifiers into one assessment.
///
/// Models are injected once at construction and shared read-only across
/// all requests; nothing here mutates adapter state per request.
#[derive(Debug)]
pub struct PredictionService<D, B, T>
where
    D: RiskModel,
    B: RiskModel,
    T: RiskModel,
{
    distance: Arc<D>,
    bayes: Arc<B>,
    tree: Arc<T>,
}

fn join_verdict(
    handle: thread::ScopedJoinHandle<'_, Result<ModelVerdict, ModelError>>,
    model: ModelName,
) -> Result<ModelVerdict, ModelError> {
    match handle.join() {
        Ok(outcome) => outcome,
        Err(_) => Err(ModelError::Prediction {
            model,
            reason: "prediction thread panicked".to_string(),
        }),
    }
}

impl<D, B, T> PredictionService<D, B, T>
where
    D: RiskModel,
    B: RiskModel,
    T: RiskModel,
{
    /// Create a new prediction service over three injected models.
    pub fn new(distance: Arc<D>, bayes: Arc<B>, tree: Arc<T>) -> Self {
        Self {
            distance,
            bayes,
            tree,
        }
    }

    /// Run the full assessment pipeline for one patient record.
    ///
    /// # Errors
    /// - [`PredictionError::InvalidInput`] when any field is out of range
    ///   (carries the full violation list; no model is consulted).
    /// - [`PredictionError::ServiceUnavailable`] when a model has no
    ///   loaded artifact.
    /// - [`PredictionError::PredictionFailure`] when a model faults.
    pub fn predict(&self, record: PatientRecord) -> Result<EnsembleResult, PredictionError> {
        let features = record.validate()?;

        tracing::debug!("Record validated, requesting the three model verdicts");
        let (distance, bayes, tree) = thread::scope(|scope| {
            let distance = scope.spawn(|| self.distance.predict(&features));
            let bayes = scope.spawn(|| self.bayes.predict(&features));
            let tree = scope.spawn(|| self.tree.predict(&features));
            (
                join_verdict(distance, self.distance.name()),
                join_verdict(bayes, self.bayes.name()),
                join_verdict(tree, self.tree.name()),
            )
        });

        let verdicts = [distance?, bayes?, tree?];
        let result = ensemble::assess(verdicts);

        tracing::info!(
            "Assessment complete: prediction={}, risk_score={:.2}, tier={}",
            result.ensemble_positive,
            result.risk_score,
            result.risk_tier
        );

        Ok(result)
    }

    /// Whether all three models can serve predictions.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.distance.is_ready() && self.bayes.is_ready() && self.tree.is_ready()
    }

    /// Point-in-time readiness report across the three models.
    #[must_use]
    pub fn health(&self) -> HealthReport {
        let models = [
            ModelStatus {
                model: self.distance.name(),
                ready: self.distance.is_ready(),
            },
            ModelStatus {
                model: self.bayes.name(),
                ready: self.bayes.is_ready(),
            },
            ModelStatus {
                model: self.tree.name(),
                ready: self.tree.is_ready(),
            },
        ];
        let status = if models.iter().all(|m| m.ready) {
            ServiceStatus::Ready
        } else {
            tracing::warn!("Service degraded: at least one model has no artifact");
            ServiceStatus::Degraded
        };

        HealthReport {
            status,
            timestamp: Utc::now(),
            models,
        }
    }

    /// Training-time evaluation metrics for the reference deployment,
    /// measured by the external pipeline. All values are percentages.
    #[must_use]
    pub fn model_metrics(&self) -> [ModelMetrics; 3] {
        [
            ModelMetrics {
                model: ModelName::Distance,
                accuracy: 82.0,
                precision: 78.0,
                recall: 94.0,
                f1_score: 85.0,
            },
            ModelMetrics {
                model: ModelName::Bayes,
                accuracy: 82.0,
                precision: 79.0,
                recall: 91.0,
                f1_score: 85.0,
            },
            ModelMetrics {
                model: ModelName::Tree,
                accuracy: 70.0,
                precision: 70.0,
                recall: 79.0,
                f1_score: 74.0,
            },
        ]
    }
}

impl PredictionService<CentroidModel, GaussianNbModel, DecisionTreeModel> {
    /// Load the three reference adapters from an artifact directory.
    ///
    /// # Errors
    /// Returns the first [`ModelError`] raised while loading or verifying
    /// an artifact.
    pub fn load_from_dir(dir: &Path) -> Result<Self, ModelError> {
        tracing::info!("Loading model artifacts from {}", dir.display());

        let mut distance = CentroidModel::reference();
        distance.load(dir)?;
        let mut bayes = GaussianNbModel::reference();
        bayes.load(dir)?;
        let mut tree = DecisionTreeModel::reference();
        tree.load(dir)?;

        tracing::info!("All three models loaded");
        Ok(Self::new(Arc::new(distance), Arc::new(bayes), Arc::new(tree)))
    }

    /// Load from the directory named by `CARDIOSCORE_MODEL_DIR`, falling
    /// back to `models`.
    ///
    /// # Errors
    /// Returns the first [`ModelError`] raised while loading or verifying
    /// an artifact.
    pub fn load_default() -> Result<Self, ModelError> {
        Self::load_from_dir(&artifact_dir())
    }
}
