//! Distance-based model adapter.
//!
//! Evaluates an exported nearest-centroid artifact: the training pipeline
//! exports one centroid per class plus the per-feature inverse scales of
//! its standardizer, and prediction compares scaled distances to the two
//! centroids. Training happens entirely outside this crate.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::adapters::artifact::read_artifact;
use crate::domain::{ModelName, ModelVerdict, PatientFeatures, FIELD_COUNT};
use crate::ports::{ModelError, RiskModel};

/// Declared accuracy of the distance-based model in the reference
/// deployment.
pub const DISTANCE_MODEL_ACCURACY: f64 = 0.82;

/// Artifact file name within the model directory.
pub const DISTANCE_ARTIFACT: &str = "distance_model.json";

/// Centroid parameters exported by the training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedCentroidModel {
    pub feature_names: Vec<String>,
    /// Mean feature vector of the positive training class
    pub positive_centroid: Vec<f64>,
    /// Mean feature vector of the negative training class
    pub negative_centroid: Vec<f64>,
    /// Per-feature inverse standard deviation from the training scaler
    pub inv_scale: Vec<f64>,
    /// Logistic calibration slope applied to the distance margin
    pub steepness: f64,
}

/// Distance-based classifier over exported class centroids.
#[derive(Debug)]
pub struct CentroidModel {
    declared_accuracy: f64,
    model: Option<ExportedCentroidModel>,
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl CentroidModel {
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
        Self::new(DISTANCE_MODEL_ACCURACY)
    }

    /// Load and verify the exported artifact from `dir`.
    ///
    /// # Errors
    /// Returns [`ModelError::Artifact`] when the file is missing, fails
    /// the manifest check, or is structurally inconsistent.
    pub fn load(&mut self, dir: &Path) -> Result<(), ModelError> {
        let model: ExportedCentroidModel = read_artifact(ModelName::Distance, dir, DISTANCE_ARTIFACT)?;
        Self::sanity_check(&model)?;

        tracing::info!(
            "Loaded distance model ({} features, steepness={})",
            model.feature_names.len(),
            model.steepness
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
        model: ExportedCentroidModel,
        declared_accuracy: f64,
    ) -> Result<Self, ModelError> {
        Self::sanity_check(&model)?;
        Ok(Self {
            declared_accuracy,
            model: Some(model),
        })
    }

    fn sanity_check(model: &ExportedCentroidModel) -> Result<(), ModelError> {
        let reject = |reason: &str| ModelError::Artifact {
            model: ModelName::Distance,
            reason: reason.to_string(),
        };

        let n = model.feature_names.len();
        if n != FIELD_COUNT {
            return Err(reject(&format!(
                "expected {FIELD_COUNT} features, artifact has {n}"
            )));
        }
        if model.positive_centroid.len() != n
            || model.negative_centroid.len() != n
            || model.inv_scale.len() != n
        {
            return Err(reject("parameter lengths do not match feature_names"));
        }
        if model
            .positive_centroid
            .iter()
            .chain(model.negative_centroid.iter())
            .any(|v| !v.is_finite())
        {
            return Err(reject("centroids must be finite"));
        }
        if model.inv_scale.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(reject("inv_scale entries must be finite and positive"));
        }
        if !model.steepness.is_finite() || model.steepness <= 0.0 {
            return Err(reject("steepness must be finite and positive"));
        }
        Ok(())
    }
}

impl RiskModel for CentroidModel {
    fn name(&self) -> ModelName {
        ModelName::Distance
    }

    fn declared_accuracy(&self) -> f64 {
        self.declared_accuracy
    }

    fn is_ready(&self) -> bool {
        self.model.is_some()
    }

    fn predict(&self, features: &PatientFeatures) -> Result<ModelVerdict, ModelError> {
        let model = self.model.as_ref().ok_or(ModelError::NotReady {
            model: ModelName::Distance,
        })?;

        let x = features.as_slice();
        let mut dist_positive = 0.0;
        let mut dist_negative = 0.0;
        for i in 0..FIELD_COUNT {
            let scale = model.inv_scale[i];
            let dp = (x[i] - model.positive_centroid[i]) * scale;
            let dn = (x[i] - model.negative_centroid[i]) * scale;
            dist_positive += dp * dp;
            dist_negative += dn * dn;
        }
        let dist_positive = dist_positive.sqrt();
        let dist_negative = dist_negative.sqrt();

        // Positive margin: the record sits closer to the positive centroid.
        let margin = dist_negative - dist_positive;
        let probability = sigmoid(model.steepness * margin);

        if !probability.is_finite() {
            return Err(ModelError::Prediction {
                model: ModelName::Distance,
                reason: "non-finite probability".to_string(),
            });
        }

        Ok(ModelVerdict {
            model: ModelName::Distance,
            predicted_positive: margin >= 0.0,
            probability,
            declared_accuracy: self.declared_accuracy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PatientRecord;
    use tempfile::tempdir;

    fn exported_model() -> ExportedCentroidModel {
        ExportedCentroidModel {
            feature_names: crate::domain::FEATURE_NAMES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            // Centroids shifted only along age and max heart rate.
            positive_centroid: vec![
                60.0, 1.0, 2.0, 140.0, 260.0, 0.0, 1.0, 120.0, 1.0, 2.0, 1.0, 1.0, 2.0,
            ],
            negative_centroid: vec![
                45.0, 0.0, 1.0, 120.0, 220.0, 0.0, 0.0, 170.0, 0.0, 0.5, 1.0, 0.0, 1.0,
            ],
            inv_scale: vec![
                0.1, 1.0, 0.5, 0.05, 0.02, 1.0, 0.7, 0.04, 1.0, 0.9, 0.7, 0.9, 0.8,
            ],
            steepness: 0.8,
        }
    }

    fn features_like_positive() -> crate::domain::PatientFeatures {
        PatientRecord {
            age: 62.0,
            sex: 1.0,
            chest_pain_type: 2.0,
            resting_blood_pressure: 145.0,
            serum_cholesterol: 270.0,
            fasting_blood_sugar: 0.0,
            resting_ecg: 1.0,
            max_heart_rate: 115.0,
            exercise_induced_angina: 1.0,
            st_depression: 2.2,
            slope_of_peak_exercise: 1.0,
            number_of_major_vessels: 1.0,
            thalassemia: 2.0,
        }
        .validate()
        .expect("valid record")
    }

    #[test]
    fn test_not_ready_without_artifact() {
        let adapter = CentroidModel::reference();
        assert!(!adapter.is_ready());

        let err = adapter
            .predict(&features_like_positive())
            .expect_err("must be not ready");
        assert_eq!(
            err,
            ModelError::NotReady {
                model: ModelName::Distance
            }
        );
    }

    #[test]
    fn test_predicts_class_of_nearest_centroid() {
        let adapter = CentroidModel::from_exported(exported_model(), DISTANCE_MODEL_ACCURACY)
            .expect("valid artifact");

        let verdict = adapter
            .predict(&features_like_positive())
            .expect("should predict");
        assert_eq!(verdict.model, ModelName::Distance);
        assert!(verdict.predicted_positive);
        assert!(verdict.probability > 0.5 && verdict.probability <= 1.0);
        assert_eq!(verdict.declared_accuracy, DISTANCE_MODEL_ACCURACY);
    }

    #[test]
    fn test_label_agrees_with_probability_midpoint() {
        let adapter = CentroidModel::from_exported(exported_model(), DISTANCE_MODEL_ACCURACY)
            .expect("valid artifact");

        let negative_leaning = PatientRecord {
            age: 44.0,
            sex: 0.0,
            chest_pain_type: 1.0,
            resting_blood_pressure: 118.0,
            serum_cholesterol: 215.0,
            fasting_blood_sugar: 0.0,
            resting_ecg: 0.0,
            max_heart_rate: 172.0,
            exercise_induced_angina: 0.0,
            st_depression: 0.4,
            slope_of_peak_exercise: 1.0,
            number_of_major_vessels: 0.0,
            thalassemia: 1.0,
        }
        .validate()
        .expect("valid record");

        let verdict = adapter.predict(&negative_leaning).expect("should predict");
        assert!(!verdict.predicted_positive);
        assert!(verdict.probability < 0.5);
    }

    #[test]
    fn test_load_from_directory() {
        let temp = tempdir().expect("tempdir");
        let json = serde_json::to_string(&exported_model()).expect("serialize");
        std::fs::write(temp.path().join(DISTANCE_ARTIFACT), json).expect("write");

        let mut adapter = CentroidModel::reference();
        adapter.load(temp.path()).expect("should load");
        assert!(adapter.is_ready());
    }

    #[test]
    fn test_rejects_mismatched_lengths() {
        let mut model = exported_model();
        model.inv_scale.pop();
        let err = CentroidModel::from_exported(model, DISTANCE_MODEL_ACCURACY)
            .expect_err("short inv_scale");
        assert!(err.to_string().contains("lengths"));
    }

    #[test]
    fn test_rejects_non_positive_scale() {
        let mut model = exported_model();
        model.inv_scale[3] = 0.0;
        assert!(CentroidModel::from_exported(model, DISTANCE_MODEL_ACCURACY).is_err());

        let mut model = exported_model();
        model.steepness = f64::NAN;
        assert!(CentroidModel::from_exported(model, DISTANCE_MODEL_ACCURACY).is_err());
    }
}
