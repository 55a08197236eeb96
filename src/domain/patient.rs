//! Patient record types and ingestion validation.
//!
//! Field set and bounds follow the 13-attribute Cleveland-style clinical
//! record used by the trained classifiers.

use serde::{Deserialize, Serialize};

/// Number of clinical features per record.
pub const FIELD_COUNT: usize = 13;

/// Feature names in the order the trained models consume them.
pub const FEATURE_NAMES: [&str; FIELD_COUNT] = [
    "age",
    "sex",
    "chest_pain_type",
    "resting_blood_pressure",
    "serum_cholesterol",
    "fasting_blood_sugar",
    "resting_ecg",
    "max_heart_rate",
    "exercise_induced_angina",
    "st_depression",
    "slope_of_peak_exercise",
    "number_of_major_vessels",
    "thalassemia",
];

/// Raw patient record as delivered by the transport layer.
///
/// Fields arrive loosely typed (categorical attributes are plain numbers);
/// nothing here is trusted until [`PatientRecord::validate`] has run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    /// Age in years
    pub age: f64,
    /// 0 = female, 1 = male
    pub sex: f64,
    /// Chest pain category (0-3)
    pub chest_pain_type: f64,
    /// Resting blood pressure in mmHg
    pub resting_blood_pressure: f64,
    /// Serum cholesterol in mg/dl
    pub serum_cholesterol: f64,
    /// Fasting blood sugar > 120 mg/dl flag (0/1)
    pub fasting_blood_sugar: f64,
    /// Resting ECG category (0-2)
    pub resting_ecg: f64,
    /// Maximum heart rate achieved in bpm
    pub max_heart_rate: f64,
    /// Exercise-induced angina flag (0/1)
    pub exercise_induced_angina: f64,
    /// ST depression induced by exercise (oldpeak)
    pub st_depression: f64,
    /// Slope of the peak exercise ST segment (0-2)
    pub slope_of_peak_exercise: f64,
    /// Number of major vessels colored by fluoroscopy (0-3)
    pub number_of_major_vessels: f64,
    /// Thalassemia category (0-2)
    pub thalassemia: f64,
}

/// A single out-of-range field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// Field name as listed in [`FEATURE_NAMES`]
    pub field: &'static str,
    /// The rejected value
    pub value: f64,
    /// Human-readable description of the accepted range
    pub constraint: &'static str,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={} outside {}", self.field, self.value, self.constraint)
    }
}

/// Ingestion failure: one or more fields outside their clinical bounds.
///
/// Carries every violated field so the caller can report them all at once.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("patient record rejected: {} field(s) out of range", .violations.len())]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

/// Validated clinical feature vector.
///
/// Only [`PatientRecord::validate`] constructs this type; downstream code
/// (model adapters, the aggregator) relies on the bounds having been
/// established exactly once at ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientFeatures {
    values: [f64; FIELD_COUNT],
}

impl PatientFeatures {
    /// Feature values in model consumption order (see [`FEATURE_NAMES`]).
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        self.values.to_vec()
    }

    /// Feature values as a fixed-size slice.
    #[must_use]
    pub fn as_slice(&self) -> &[f64; FIELD_COUNT] {
        &self.values
    }
}

/// True when `value` lies strictly between `lo` and `hi`.
///
/// Non-finite values fail the comparison and are rejected with the
/// same violation as any other out-of-range input.
fn within_open(value: f64, lo: f64, hi: f64) -> bool {
    value > lo && value < hi
}

/// True when `value` is one of the integer categories `0..=max`.
fn within_category(value: f64, max: u8) -> bool {
    value.fract() == 0.0 && value >= 0.0 && value <= f64::from(max)
}

impl PatientRecord {
    /// Check every field against its clinical bounds.
    ///
    /// All 13 fields are checked without short-circuiting, so the returned
    /// error lists every violation in field declaration order.
    ///
    /// # Errors
    /// Returns [`ValidationError`] with the full violation list when any
    /// field is out of range.
    pub fn validate(self) -> Result<PatientFeatures, ValidationError> {
        let mut violations = Vec::new();

        if !within_open(self.age, 0.0, 120.0) {
            violations.push(Violation {
                field: "age",
                value: self.age,
                constraint: "(0, 120)",
            });
        }
        if !within_category(self.sex, 1) {
            violations.push(Violation {
                field: "sex",
                value: self.sex,
                constraint: "{0, 1}",
            });
        }
        if !within_category(self.chest_pain_type, 3) {
            violations.push(Violation {
                field: "chest_pain_type",
                value: self.chest_pain_type,
                constraint: "{0..3}",
            });
        }
        if !within_open(self.resting_blood_pressure, 0.0, 300.0) {
            violations.push(Violation {
                field: "resting_blood_pressure",
                value: self.resting_blood_pressure,
                constraint: "(0, 300)",
            });
        }
        if !within_open(self.serum_cholesterol, 0.0, 1000.0) {
            violations.push(Violation {
                field: "serum_cholesterol",
                value: self.serum_cholesterol,
                constraint: "(0, 1000)",
            });
        }
        if !within_category(self.fasting_blood_sugar, 1) {
            violations.push(Violation {
                field: "fasting_blood_sugar",
                value: self.fasting_blood_sugar,
                constraint: "{0, 1}",
            });
        }
        if !within_category(self.resting_ecg, 2) {
            violations.push(Violation {
                field: "resting_ecg",
                value: self.resting_ecg,
                constraint: "{0..2}",
            });
        }
        if !within_open(self.max_heart_rate, 0.0, 250.0) {
            violations.push(Violation {
                field: "max_heart_rate",
                value: self.max_heart_rate,
                constraint: "(0, 250)",
            });
        }
        if !within_category(self.exercise_induced_angina, 1) {
            violations.push(Violation {
                field: "exercise_induced_angina",
                value: self.exercise_induced_angina,
                constraint: "{0, 1}",
            });
        }
        if !(0.0..=10.0).contains(&self.st_depression) {
            violations.push(Violation {
                field: "st_depression",
                value: self.st_depression,
                constraint: "[0, 10]",
            });
        }
        if !within_category(self.slope_of_peak_exercise, 2) {
            violations.push(Violation {
                field: "slope_of_peak_exercise",
                value: self.slope_of_peak_exercise,
                constraint: "{0..2}",
            });
        }
        if !within_category(self.number_of_major_vessels, 3) {
            violations.push(Violation {
                field: "number_of_major_vessels",
                value: self.number_of_major_vessels,
                constraint: "{0..3}",
            });
        }
        if !within_category(self.thalassemia, 2) {
            violations.push(Violation {
                field: "thalassemia",
                value: self.thalassemia,
                constraint: "{0..2}",
            });
        }

        if !violations.is_empty() {
            return Err(ValidationError { violations });
        }

        Ok(PatientFeatures {
            values: [
                self.age,
                self.sex,
                self.chest_pain_type,
                self.resting_blood_pressure,
                self.serum_cholesterol,
                self.fasting_blood_sugar,
                self.resting_ecg,
                self.max_heart_rate,
                self.exercise_induced_angina,
                self.st_depression,
                self.slope_of_peak_exercise,
                self.number_of_major_vessels,
                self.thalassemia,
            ],
        })
    }
}
