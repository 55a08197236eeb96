//! Probabilistic model adapter.
//!
//! Evaluates an exported Gaussian naive Bayes artifact: per-class feature
//! means and variances plus the positive-class prior, all estimated by the
//! external training pipeline. Prediction computes the two class
//! log-posteriors and converts their difference to a probability.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::adapters::artifact::read_artifact;
use crate::domain::{ModelName, ModelVerdict, PatientFeatures, FIELD_COUNT};
use crate::ports::{ModelError, RiskModel};

/// Declared accuracy of the probabilistic model in the reference
/// deployment.
pub const BAYES_MODEL_ACCURACY: f64 = 0.82;

/// Artifact file name within the model directory.
pub const BAYES_ARTIFACT: &str = "bayes_model.json";

/// Per-class Gaussian parameters, one entry per feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDensity {
    pub means: Vec<f64>,
    pub variances: Vec<f64>,
}

/// Naive Bayes parameters exported by the training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedBayesModel {
    pub feature_names: Vec<String>,
    /// P(disease) over the training set, in (0, 1)
    pub prior_positive: f64,
    pub positive: ClassDensity,
    pub negative: ClassDensity,
}

/// Probabilistic classifier over exported Gaussian densities.
#[derive(Debug)]
pub struct GaussianNbModel {
    declared_accuracy: f64,
    model: Option<ExportedBayesModel>,
}

impl GaussianNbModel {
    /// Create an adapter with no loaded artifact.
    #[must_use]
    pub fn new(declared_accuracy: f64) -> Self {
        Self {
            declared_accuracy,
            model: None,
        }
    }

    /// Create the adapter with the reference-deployment accuracy weight.
    #[must_use]
    pub fn reference() -> Self {
        Self::new(BAYES_MODEL_ACCURACY)
    }

    /// Load and verify the exported artifact from `dir`.
    ///
    /// # Errors
    /// Returns [`ModelError::Artifact`] when the file is missing, fails
    /// the manifest check, or is structurally inconsistent.
    pub fn load(&mut self, dir: &Path) -> Result<(), ModelError> {
        let model: ExportedBayesModel = read_artifact(ModelName::Bayes, dir, BAYES_ARTIFACT)?;
        Self::sanity_check(&model)?;

        tracing::info!(
            "Loaded bayes model ({} features, prior={:.3})",
            model.feature_names.len(),
            model.prior_positive
        );
        self.model = Some(model);
        Ok(())
    }

    /// Install already-deserialized parameters after the same checks
    /// `load` applies.
    ///
    /// # Errors
    /// Returns [`ModelError::Artifact`] when the parameters are
    /// structurally inconsistent.
    pub fn from_exported(
        model: ExportedBayesModel,
        declared_accuracy: f64,
    ) -> Result<Self, ModelError> {
        Self::sanity_check(&model)?;
        Ok(Self {
            declared_accuracy,
            model: Some(model),
        })
    }

    fn sanity_check(model: &ExportedBayesModel) -> Result<(), ModelError> {
        let reject = |reason: &str| ModelError::Artifact {
            model: ModelName::Bayes,
            reason: reason.to_string(),
        };

        let n = model.feature_names.len();
        if n != FIELD_COUNT {
            return Err(reject(&format!(
                "expected {FIELD_COUNT} features, artifact has {n}"
            )));
        }
        for class in [&model.positive, &model.negative] {
            if class.means.len() != n || class.variances.len() != n {
                return Err(reject("parameter lengths do not match feature_names"));
            }
            if class.means.iter().any(|m| !m.is_finite()) {
                return Err(reject("class means must be finite"));
            }
            if class.variances.iter().any(|v| !v.is_finite() || *v <= 0.0) {
                return Err(reject("class variances must be finite and positive"));
            }
        }
        if !model.prior_positive.is_finite()
            || model.prior_positive <= 0.0
            || model.prior_positive >= 1.0
        {
            return Err(reject("prior_positive must lie strictly within (0, 1)"));
        }
        Ok(())
    }

    /// Log-density of `x` under the class Gaussians plus the class
    /// log-prior.
    fn log_posterior(class: &ClassDensity, prior: f64, x: &[f64; FIELD_COUNT]) -> f64 {
        let mut log_p = prior.ln();
        for i in 0..FIELD_COUNT {
            let variance = class.variances[i];
            let residual = x[i] - class.means[i];
            log_p += -0.5 * (2.0 * std::f64::consts::PI * variance).ln()
                - residual * residual / (2.0 * variance);
        }
        log_p
    }
}

impl RiskModel for GaussianNbModel {
    fn name(&self) -> ModelName {
        ModelName::Bayes
    }

    fn declared_accuracy(&self) -> f64 {
        self.declared_accuracy
    }

    fn is_ready(&self) -> bool {
        self.model.is_some()
    }

    fn predict(&self, features: &PatientFeatures) -> Result<ModelVerdict, ModelError> {
        let model = self.model.as_ref().ok_or(ModelError::NotReady {
            model: ModelName::Bayes,
        })?;

        let x = features.as_slice();
        let log_positive = Self::log_posterior(&model.positive, model.prior_positive, x);
        let log_negative = Self::log_posterior(&model.negative, 1.0 - model.prior_positive, x);

        // P(pos | x) = 1 / (1 + exp(log_neg - log_pos)); the difference
        // form avoids exponentiating the large raw log-densities.
        let probability = 1.0 / (1.0 + (log_negative - log_positive).exp());

        if !probability.is_finite() {
            return Err(ModelError::Prediction {
                model: ModelName::Bayes,
                reason: "non-finite probability".to_string(),
            });
        }

        Ok(ModelVerdict {
            model: ModelName::Bayes,
            predicted_positive: log_positive >= log_negative,
            probability,
            declared_accuracy: self.declared_accuracy,
        })
    }
}
