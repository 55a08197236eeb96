//! End-to-end pipeline tests over real adapters loaded from an exported
//! artifact set.

use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};
use tempfile::tempdir;

use cardioscore::domain::{ModelName, RiskTier};
use cardioscore::{PredictionError, PredictionService};

fn feature_names() -> serde_json::Value {
    serde_json::json!(cardioscore::domain::FEATURE_NAMES)
}

fn distance_artifact() -> serde_json::Value {
    serde_json::json!({
        "feature_names": feature_names(),
        "positive_centroid": [60.0, 1.0, 2.0, 140.0, 260.0, 0.0, 1.0, 120.0, 1.0, 2.0, 1.0, 1.0, 2.0],
        "negative_centroid": [45.0, 0.0, 1.0, 120.0, 220.0, 0.0, 0.0, 170.0, 0.0, 0.5, 1.0, 0.0, 1.0],
        "inv_scale": [0.1, 1.0, 0.5, 0.05, 0.02, 1.0, 0.7, 0.04, 1.0, 0.9, 0.7, 0.9, 0.8],
        "steepness": 0.8
    })
}

fn bayes_artifact() -> serde_json::Value {
    serde_json::json!({
        "feature_names": feature_names(),
        "prior_positive": 0.55,
        "positive": {
            "means": [60.0, 0.5, 1.5, 130.0, 240.0, 0.2, 0.8, 120.0, 0.4, 2.5, 1.0, 0.7, 1.4],
            "variances": [64.0, 0.25, 1.2, 300.0, 2500.0, 0.2, 0.6, 500.0, 0.25, 1.2, 0.5, 0.9, 0.7]
        },
        "negative": {
            "means": [45.0, 0.5, 1.5, 130.0, 240.0, 0.2, 0.8, 165.0, 0.4, 0.6, 1.0, 0.7, 1.4],
            "variances": [64.0, 0.25, 1.2, 300.0, 2500.0, 0.2, 0.6, 500.0, 0.25, 1.2, 0.5, 0.9, 0.7]
        }
    })
}

fn tree_artifact() -> serde_json::Value {
    serde_json::json!({
        "feature_names": feature_names(),
        "nodes": [
            { "kind": "split", "feature": 9, "threshold": 1.5, "left": 1, "right": 2 },
            { "kind": "leaf", "probability": 0.22 },
            { "kind": "split", "feature": 11, "threshold": 0.5, "left": 3, "right": 4 },
            { "kind": "leaf", "probability": 0.58 },
            { "kind": "leaf", "probability": 0.91 }
        ]
    })
}

fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Write the three artifacts plus a manifest binding all of them.
fn write_artifact_set(dir: &Path) {
    let files = [
        ("distance_model.json", distance_artifact()),
        ("bayes_model.json", bayes_artifact()),
        ("tree_model.json", tree_artifact()),
    ];

    let mut manifest_files = serde_json::Map::new();
    for (name, value) in &files {
        let bytes = serde_json::to_vec(value).expect("serialize artifact");
        manifest_files.insert(
            (*name).to_string(),
            serde_json::Value::String(sha256_hex(&bytes)),
        );
        fs::write(dir.join(name), bytes).expect("write artifact");
    }

    let manifest = serde_json::json!({ "version": 1, "files": manifest_files });
    fs::write(dir.join("manifest.json"), manifest.to_string()).expect("write manifest");
}

fn high_risk_record() -> cardioscore::PatientRecord {
    cardioscore::PatientRecord {
        age: 64.0,
        sex: 1.0,
        chest_pain_type: 3.0,
        resting_blood_pressure: 150.0,
        serum_cholesterol: 280.0,
        fasting_blood_sugar: 1.0,
        resting_ecg: 1.0,
        max_heart_rate: 112.0,
        exercise_induced_angina: 1.0,
        st_depression: 2.6,
        slope_of_peak_exercise: 2.0,
        number_of_major_vessels: 2.0,
        thalassemia: 2.0,
    }
}

fn low_risk_record() -> cardioscore::PatientRecord {
    cardioscore::PatientRecord {
        age: 41.0,
        sex: 0.0,
        chest_pain_type: 1.0,
        resting_blood_pressure: 118.0,
        serum_cholesterol: 210.0,
        fasting_blood_sugar: 0.0,
        resting_ecg: 0.0,
        max_heart_rate: 174.0,
        exercise_induced_angina: 0.0,
        st_depression: 0.2,
        slope_of_peak_exercise: 1.0,
        number_of_major_vessels: 0.0,
        thalassemia: 1.0,
    }
}

#[test]
fn assesses_a_high_risk_record() {
    let temp = tempdir().expect("tempdir");
    write_artifact_set(temp.path());

    let service = PredictionService::load_from_dir(temp.path()).expect("should load");
    assert!(service.is_ready());

    let result = service.predict(high_risk_record()).expect("should assess");

    assert!(result.ensemble_positive);
    assert!((0.0..=100.0).contains(&result.risk_score));
    assert_eq!(result.risk_tier, RiskTier::from_score(result.risk_score));
    assert_eq!(result.per_model[0].model, ModelName::Distance);
    assert_eq!(result.per_model[1].model, ModelName::Bayes);
    assert_eq!(result.per_model[2].model, ModelName::Tree);
    for verdict in &result.per_model {
        assert!((0.0..=1.0).contains(&verdict.probability));
        assert!(verdict.predicted_positive);
    }
}

#[test]
fn assesses_a_low_risk_record() {
    let temp = tempdir().expect("tempdir");
    write_artifact_set(temp.path());

    let service = PredictionService::load_from_dir(temp.path()).expect("should load");
    let result = service.predict(low_risk_record()).expect("should assess");

    assert!(!result.ensemble_positive);
    assert_eq!(result.risk_tier, RiskTier::Low);
    for verdict in &result.per_model {
        assert!(!verdict.predicted_positive);
    }
}

#[test]
fn serialized_result_keeps_the_wire_shape() {
    let temp = tempdir().expect("tempdir");
    write_artifact_set(temp.path());

    let service = PredictionService::load_from_dir(temp.path()).expect("should load");
    let result = service.predict(high_risk_record()).expect("should assess");

    let json = serde_json::to_value(&result).expect("serialize");
    assert!(json["prediction"].is_boolean());
    assert!(json["riskScore"].is_number());
    assert!(matches!(
        json["riskLevel"].as_str(),
        Some("low" | "moderate" | "high")
    ));
    assert_eq!(json["perModel"].as_array().map(Vec::len), Some(3));
    for verdict in json["perModel"].as_array().expect("array") {
        assert!(verdict["prediction"].is_boolean());
        assert!(verdict["probability"].is_number());
        assert!(verdict["accuracy"].is_number());
    }
}

#[test]
fn invalid_record_reports_every_violation() {
    let temp = tempdir().expect("tempdir");
    write_artifact_set(temp.path());

    let service = PredictionService::load_from_dir(temp.path()).expect("should load");
    let record = cardioscore::PatientRecord {
        age: 150.0,
        serum_cholesterol: 1200.0,
        ..high_risk_record()
    };

    let err = service.predict(record).expect_err("must be rejected");
    match err {
        PredictionError::InvalidInput(validation) => {
            let fields: Vec<_> = validation.violations.iter().map(|v| v.field).collect();
            assert_eq!(fields, vec!["age", "serum_cholesterol"]);
        }
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn tampered_artifact_fails_loading() {
    let temp = tempdir().expect("tempdir");
    write_artifact_set(temp.path());

    // Corrupt one artifact after the manifest was written.
    let mut tampered = tree_artifact();
    tampered["nodes"][1]["probability"] = serde_json::json!(0.99);
    fs::write(
        temp.path().join("tree_model.json"),
        serde_json::to_vec(&tampered).expect("serialize"),
    )
    .expect("write");

    let err = PredictionService::load_from_dir(temp.path()).expect_err("must fail");
    assert!(err.to_string().contains("hash mismatch"));
}

#[test]
fn missing_artifact_fails_loading() {
    let temp = tempdir().expect("tempdir");
    write_artifact_set(temp.path());
    fs::remove_file(temp.path().join("bayes_model.json")).expect("remove");

    let err = PredictionService::load_from_dir(temp.path()).expect_err("must fail");
    assert!(matches!(err, cardioscore::ModelError::Artifact { .. }));
}
