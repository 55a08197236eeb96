//! Assessment result types.
//!
//! Output of the ensemble prediction pipeline: per-model verdicts, the
//! combined decision, and the bucketed risk tier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The three classifiers in the reference deployment, identified by family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelName {
    /// Distance-based classifier (class-centroid comparison)
    Distance,
    /// Probabilistic classifier (Gaussian naive Bayes)
    Bayes,
    /// Tree-based classifier (decision tree)
    Tree,
}

impl ModelName {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Distance => "distance",
            Self::Bayes => "bayes",
            Self::Tree => "tree",
        }
    }
}

impl std::fmt::Display for ModelName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One trained model's output for one patient.
///
/// Immutable once produced by the model adapter; `declared_accuracy` is the
/// model's fixed historical weight, not a per-request quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelVerdict {
    pub model: ModelName,
    /// Binary label: true = disease indicated
    #[serde(rename = "prediction")]
    pub predicted_positive: bool,
    /// Confidence probability in [0, 1]
    pub probability: f64,
    /// Pre-measured model accuracy in [0, 1], set at adapter construction
    #[serde(rename = "accuracy")]
    pub declared_accuracy: f64,
}

/// Risk tier assigned to a weighted risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    /// No significant indicators
    Low,
    /// Follow-up recommended
    Moderate,
    /// Immediate consultation advised
    High,
}

impl RiskTier {
    /// Bucket a weighted risk score on the [0, 100] scale.
    ///
    /// Thresholds are exact: a score of 70 is still moderate, a score of
    /// 40 is still low.
    #[must_use]
    pub fn from_score(risk_score: f64) -> Self {
        if risk_score > 70.0 {
            Self::High
        } else if risk_score > 40.0 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    /// Canonical wire string for this tier.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }

    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Low risk - No significant indicators",
            Self::Moderate => "Moderate risk - Follow-up recommended",
            Self::High => "High risk - Immediate consultation advised",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete ensemble assessment for one prediction request.
///
/// The majority vote (`ensemble_positive`) and the weighted score behind
/// `risk_tier` are reported independently; when the models disagree the two
/// fields may point in different directions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnsembleResult {
    /// The three contributing verdicts
    pub per_model: [ModelVerdict; 3],
    /// Majority-vote binary decision
    #[serde(rename = "prediction")]
    pub ensemble_positive: bool,
    /// Accuracy-weighted confidence on the [0, 100] scale
    pub risk_score: f64,
    /// Bucketed tier for `risk_score`
    #[serde(rename = "riskLevel")]
    pub risk_tier: RiskTier,
}

/// Static evaluation metrics for one model, measured at training time.
///
/// All values are percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetrics {
    pub model: ModelName,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

/// Readiness of a single model adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelStatus {
    pub model: ModelName,
    pub ready: bool,
}

/// Overall service readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    /// All three models have loaded artifacts
    Ready,
    /// At least one model is missing its artifact
    Degraded,
}

/// Point-in-time readiness report across the three models.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: ServiceStatus,
    pub timestamp: DateTime<Utc>,
    pub models: [ModelStatus; 3],
}
