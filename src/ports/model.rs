//! Risk model port: Trait for the trained binary classifiers.
//!
//! This trait is the only surface the prediction pipeline sees; which
//! algorithm family produced a verdict is invisible past this boundary.

use crate::domain::{ModelName, ModelVerdict, PatientFeatures};

/// Errors raised at the model-adapter boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// The adapter has no loaded artifact yet; retryable once loading
    /// completes.
    #[error("{model} model is not ready (no artifact loaded)")]
    NotReady { model: ModelName },

    /// An exported artifact was rejected at load or verification time.
    #[error("{model} model artifact rejected: {reason}")]
    Artifact { model: ModelName, reason: String },

    /// The adapter hit an unexpected internal fault while predicting.
    #[error("{model} model prediction failed: {reason}")]
    Prediction { model: ModelName, reason: String },
}

/// Trait for one trained binary classifier.
///
/// Implementations wrap externally-trained model parameters and are
/// constructed with a fixed `declared_accuracy` weight. Adapters are
/// loaded once, shared read-only across concurrent requests, and never
/// mutated per request.
pub trait RiskModel: Send + Sync {
    /// Identity of this model within the ensemble.
    fn name(&self) -> ModelName;

    /// The model's pre-measured accuracy in [0, 1], fixed at construction.
    fn declared_accuracy(&self) -> f64;

    /// Whether a trained artifact is loaded and predictions can be served.
    fn is_ready(&self) -> bool;

    /// Produce a verdict for one validated feature vector.
    ///
    /// The returned probability is guaranteed to be in [0, 1].
    ///
    /// # Errors
    /// Returns [`ModelError::NotReady`] when no artifact is loaded and
    /// [`ModelError::Prediction`] on an internal fault.
    fn predict(&self, features: &PatientFeatures) -> Result<ModelVerdict, ModelError>;
}
