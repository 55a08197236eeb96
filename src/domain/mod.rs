//! Domain layer: Core business types and decision logic.
//!
//! Pure types and pure functions only; no I/O and no external services.

mod assessment;
pub mod ensemble;
mod patient;

pub use assessment::{
    EnsembleResult, HealthReport, ModelMetrics, ModelName, ModelStatus, ModelVerdict, RiskTier,
    ServiceStatus,
};
pub use ensemble::{aggregate, assess, EnsembleVote};
pub use patient::{
    PatientFeatures, PatientRecord, ValidationError, Violation, FEATURE_NAMES, FIELD_COUNT,
};
