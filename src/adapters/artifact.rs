//! Exported-artifact loading and integrity checking.
//!
//! Trained model parameters arrive as JSON files exported by the external
//! training pipeline. When the artifact directory carries a
//! `manifest.json`, every file loaded from it must match its SHA-256
//! manifest entry.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::domain::ModelName;
use crate::ports::ModelError;

/// Environment variable overriding the artifact directory.
pub const MODEL_DIR_ENV: &str = "CARDIOSCORE_MODEL_DIR";

const DEFAULT_MODEL_DIR: &str = "models";
const MANIFEST_FILE: &str = "manifest.json";

/// Resolve the artifact directory from the environment, falling back to
/// the `models` directory next to the process.
#[must_use]
pub fn artifact_dir() -> PathBuf {
    std::env::var(MODEL_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_DIR))
}

/// Integrity manifest written by the training pipeline: file name to
/// SHA-256 hex digest.
#[derive(Debug, Clone, Deserialize)]
struct ArtifactManifest {
    version: u32,
    files: BTreeMap<String, String>,
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

// Constant-time compare for ASCII strings (used for SHA-256 hex digests).
fn constant_time_eq_str(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.as_bytes().iter().zip(b.as_bytes().iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

fn artifact_error(model: ModelName, reason: impl Into<String>) -> ModelError {
    ModelError::Artifact {
        model,
        reason: reason.into(),
    }
}

/// Read and deserialize one exported artifact from `dir`.
///
/// If `dir` contains a `manifest.json`, the artifact must be bound by it
/// and its SHA-256 digest must match before deserialization is attempted.
///
/// # Errors
/// Returns [`ModelError::Artifact`] on a missing file, a manifest
/// mismatch, or malformed JSON.
pub fn read_artifact<T: DeserializeOwned>(
    model: ModelName,
    dir: &Path,
    file_name: &str,
) -> Result<T, ModelError> {
    let path = dir.join(file_name);
    let bytes = fs::read(&path)
        .map_err(|e| artifact_error(model, format!("failed to read {}: {e}", path.display())))?;

    let manifest_path = dir.join(MANIFEST_FILE);
    if manifest_path.exists() {
        let manifest_bytes = fs::read(&manifest_path)
            .map_err(|e| artifact_error(model, format!("failed to read manifest: {e}")))?;
        let manifest: ArtifactManifest = serde_json::from_slice(&manifest_bytes)
            .map_err(|e| artifact_error(model, format!("invalid manifest format: {e}")))?;

        if manifest.version != 1 {
            return Err(artifact_error(
                model,
                format!("unsupported manifest version: {}", manifest.version),
            ));
        }

        let expected = manifest.files.get(file_name).ok_or_else(|| {
            artifact_error(model, format!("{file_name} is not bound by the manifest"))
        })?;
        let actual = sha256_hex(&bytes);
        if !constant_time_eq_str(&actual, expected) {
            return Err(artifact_error(
                model,
                format!("hash mismatch for {file_name}"),
            ));
        }
        tracing::debug!("Verified {file_name} against manifest");
    }

    serde_json::from_slice(&bytes)
        .map_err(|e| artifact_error(model, format!("invalid artifact format: {e}")))
}
