//! Tree-based model adapter.
//!
//! Evaluates an exported decision tree: the training pipeline flattens the
//! fitted tree into an indexed node array (splits and probability leaves),
//! and prediction walks it from the root. Tree induction happens entirely
//! outside this crate.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::adapters::artifact::read_artifact;
use crate::domain::{ModelName, ModelVerdict, PatientFeatures, FIELD_COUNT};
use crate::ports::{ModelError, RiskModel};

/// Declared accuracy of the tree-based model in the reference deployment.
pub const TREE_MODEL_ACCURACY: f64 = 0.70;

/// Artifact file name within the model directory.
pub const TREE_ARTIFACT: &str = "tree_model.json";

/// One node of the flattened tree. Children are indices into the node
/// array; records with `feature <= threshold` descend left.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Positive-class probability observed at this leaf during training
        probability: f64,
    },
}

/// Decision tree exported by the training pipeline; node 0 is the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedTreeModel {
    pub feature_names: Vec<String>,
    pub nodes: Vec<TreeNode>,
}

/// Tree-based classifier over an exported flattened decision tree.
#[derive(Debug)]
pub struct DecisionTreeModel {
    declared_accuracy: f64,
    model: Option<ExportedTreeModel>,
}

impl DecisionTreeModel {
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
        Self::new(TREE_MODEL_ACCURACY)
    }

    /// Load and verify the exported artifact from `dir`.
    ///
    /// # Errors
    /// Returns [`ModelError::Artifact`] when the file is missing, fails
    /// the manifest check, or is structurally inconsistent.
    pub fn load(&mut self, dir: &Path) -> Result<(), ModelError> {
        let model: ExportedTreeModel = read_artifact(ModelName::Tree, dir, TREE_ARTIFACT)?;
        Self::sanity_check(&model)?;

        tracing::info!("Loaded tree model ({} nodes)", model.nodes.len());
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
        model: ExportedTreeModel,
        declared_accuracy: f64,
    ) -> Result<Self, ModelError> {
        Self::sanity_check(&model)?;
        Ok(Self {
            declared_accuracy,
            model: Some(model),
        })
    }

    fn sanity_check(model: &ExportedTreeModel) -> Result<(), ModelError> {
        let reject = |reason: String| ModelError::Artifact {
            model: ModelName::Tree,
            reason,
        };

        if model.feature_names.len() != FIELD_COUNT {
            return Err(reject(format!(
                "expected {FIELD_COUNT} features, artifact has {}",
                model.feature_names.len()
            )));
        }
        let node_count = model.nodes.len();
        if node_count == 0 {
            return Err(reject("tree has no nodes".to_string()));
        }
        for (index, node) in model.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= FIELD_COUNT {
                        return Err(reject(format!(
                            "node {index} splits on unknown feature {feature}"
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(reject(format!("node {index} has non-finite threshold")));
                    }
                    if *left >= node_count || *right >= node_count {
                        return Err(reject(format!(
                            "node {index} references child outside the node array"
                        )));
                    }
                }
                TreeNode::Leaf { probability } => {
                    if !(0.0..=1.0).contains(probability) {
                        return Err(reject(format!(
                            "node {index} leaf probability {probability} outside [0, 1]"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

impl RiskModel for DecisionTreeModel {
    fn name(&self) -> ModelName {
        ModelName::Tree
    }

    fn declared_accuracy(&self) -> f64 {
        self.declared_accuracy
    }

    fn is_ready(&self) -> bool {
        self.model.is_some()
    }

    fn predict(&self, features: &PatientFeatures) -> Result<ModelVerdict, ModelError> {
        let model = self.model.as_ref().ok_or(ModelError::NotReady {
            model: ModelName::Tree,
        })?;

        let x = features.as_slice();
        let mut index = 0;
        // A well-formed tree reaches a leaf within `nodes.len()` steps;
        // more than that means the node array contains a cycle.
        for _ in 0..model.nodes.len() {
            match &model.nodes[index] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if x[*feature] <= *threshold { *left } else { *right };
                }
                TreeNode::Leaf { probability } => {
                    return Ok(ModelVerdict {
                        model: ModelName::Tree,
                        predicted_positive: *probability >= 0.5,
                        probability: *probability,
                        declared_accuracy: self.declared_accuracy,
                    });
                }
            }
        }

        Err(ModelError::Prediction {
            model: ModelName::Tree,
            reason: "node array contains a cycle".to_string(),
        })
    }
}
