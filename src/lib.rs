//! # cardioscore
//!
//! Ensemble scoring and validation engine for cardiovascular risk
//! assessment.
//!
//! This crate provides:
//! - Ingestion validation of 13-field clinical records against per-field
//!   clinical bounds
//! - A trait boundary over three independently-trained binary classifiers
//! - Majority-vote and accuracy-weighted aggregation of the three verdicts
//! - Bucketing of the weighted score into a discrete risk tier
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (patient record, verdicts, ensemble math)
//! - `ports`: Trait definition for the trained model adapters
//! - `adapters`: Concrete model implementations over exported artifacts
//! - `application`: The prediction orchestrator
//!
//! Model training, persistence, and any transport surface live outside
//! this crate; models arrive as exported artifacts and are consumed purely
//! as predictors.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub use application::PredictionService;
pub use domain::{EnsembleResult, PatientRecord, RiskTier, ValidationError};
pub use ports::{ModelError, RiskModel};

/// Result type for cardioscore operations
pub type Result<T> = std::result::Result<T, PredictionError>;

/// Main error type for the prediction pipeline
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    /// One or more record fields are outside their clinical bounds;
    /// carries the full violation list. A client error, never retried.
    #[error("invalid patient record: {0}")]
    InvalidInput(#[from] domain::ValidationError),

    /// A model has no loaded artifact; safe to retry once loading
    /// completes.
    #[error("prediction service unavailable: {0}")]
    ServiceUnavailable(ports::ModelError),

    /// A model raised an unexpected internal fault; idempotent, the
    /// caller may retry at its discretion.
    #[error("model prediction failed: {0}")]
    PredictionFailure(ports::ModelError),
}

impl From<ports::ModelError> for PredictionError {
    fn from(err: ports::ModelError) -> Self {
        match err {
            ports::ModelError::NotReady { .. } => Self::ServiceUnavailable(err),
            _ => Self::PredictionFailure(err),
        }
    }
}
