//! XGBoost JSON model format and gradient-boosted tree inference
//!
//! Reads the document written by `XGBClassifier.save_model("model.json")`.
//! Only binary classifiers with a logistic link are accepted:
//!
//! ```text
//! margin      = logit(base_score) + Σ weight[t] × tree[t](x)
//! probability = 1 / (1 + e^-margin)
//! ```
//!
//! `weight[t]` is 1 for `gbtree` boosters and `weight_drop[t]` for `dart`.

use crate::classifier::FeatureClassifier;
use crate::features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use crate::tree::{Node, Tree};
use phishguard_core::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;

// ============================================================================
// On-disk document
// ============================================================================

#[derive(Debug, Deserialize)]
struct ModelDocument {
    learner: Learner,
    #[serde(default)]
    version: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct Learner {
    #[serde(default)]
    feature_names: Vec<String>,
    gradient_booster: GradientBooster,
    learner_model_param: LearnerModelParam,
    objective: ObjectiveSpec,
}

#[derive(Debug, Deserialize)]
struct LearnerModelParam {
    base_score: String,
    num_feature: String,
    #[serde(default)]
    num_class: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ObjectiveSpec {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase")]
enum GradientBooster {
    Gbtree {
        model: TreeEnsemble,
    },
    Dart {
        gbtree: DartTrees,
        weight_drop: Vec<f32>,
    },
}

#[derive(Debug, Deserialize)]
struct DartTrees {
    model: TreeEnsemble,
}

#[derive(Debug, Deserialize)]
struct TreeEnsemble {
    trees: Vec<RawTree>,
    #[serde(default)]
    tree_info: Vec<i32>,
}

#[derive(Debug, Deserialize)]
struct RawTree {
    left_children: Vec<i32>,
    right_children: Vec<i32>,
    split_indices: Vec<u32>,
    split_conditions: Vec<f32>,
    default_left: Vec<Flag>,
    #[serde(default)]
    split_type: Vec<u8>,
}

/// Older writers emit `default_left` as 0/1, newer ones as booleans
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(u8),
}

impl Flag {
    fn is_set(self) -> bool {
        match self {
            Flag::Bool(b) => b,
            Flag::Int(i) => i != 0,
        }
    }
}

impl RawTree {
    fn compile(self, tree_id: usize, num_features: usize) -> Result<Tree> {
        let n = self.left_children.len();
        if self.right_children.len() != n
            || self.split_indices.len() != n
            || self.split_conditions.len() != n
            || self.default_left.len() != n
        {
            return Err(Error::model(format!(
                "tree {} has node arrays of different lengths",
                tree_id
            )));
        }
        if self.split_type.iter().any(|t| *t != 0) {
            return Err(Error::model(format!(
                "tree {} uses categorical splits, which are not supported",
                tree_id
            )));
        }

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let left = self.left_children[i];
            if left == -1 {
                nodes.push(Node::Leaf {
                    value: self.split_conditions[i],
                });
                continue;
            }
            let right = self.right_children[i];
            if left < 0 || right < 0 {
                return Err(Error::model(format!(
                    "tree {} node {} has a negative child index",
                    tree_id, i
                )));
            }
            nodes.push(Node::Split {
                feature: self.split_indices[i] as usize,
                threshold: self.split_conditions[i],
                left: left as usize,
                right: right as usize,
                default_left: self.default_left[i].is_set(),
            });
        }

        Tree::new(nodes, num_features).map_err(|e| match e {
            Error::Model(msg) => Error::model(format!("tree {}: {}", tree_id, msg)),
            other => other,
        })
    }
}

// ============================================================================
// Objective
// ============================================================================

/// Link function applied to the summed margin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Objective {
    /// `binary:logistic`
    BinaryLogistic,
    /// `reg:logistic`
    RegLogistic,
}

impl Objective {
    fn parse(name: &str) -> Result<Self> {
        match name {
            "binary:logistic" => Ok(Self::BinaryLogistic),
            "reg:logistic" => Ok(Self::RegLogistic),
            other => Err(Error::model(format!(
                "unsupported objective '{}', expected a logistic binary classifier",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BinaryLogistic => "binary:logistic",
            Self::RegLogistic => "reg:logistic",
        }
    }
}

fn sigmoid(margin: f32) -> f32 {
    1.0 / (1.0 + (-margin).exp())
}

/// `"5E-1"`, `"[5E-1]"` and `"0.5"` are all written by some XGBoost release
fn parse_base_score(raw: &str) -> Result<f32> {
    let trimmed = raw.trim().trim_start_matches('[').trim_end_matches(']');
    let first = trimmed.split(',').next().unwrap_or_default().trim();
    let score: f32 = first
        .parse()
        .map_err(|_| Error::model(format!("invalid base_score '{}'", raw)))?;
    if !(score > 0.0 && score < 1.0) {
        return Err(Error::model(format!(
            "base_score {} is outside (0, 1) for a logistic objective",
            score
        )));
    }
    Ok(score)
}

// ============================================================================
// Classifier
// ============================================================================

/// A loaded gradient-boosted tree ensemble
#[derive(Debug, Clone)]
pub struct GradientBoostedClassifier {
    name: String,
    objective: Objective,
    base_margin: f32,
    trees: Vec<Tree>,
    tree_weights: Vec<f32>,
    num_features: usize,
    feature_names: Vec<String>,
    version: Vec<u32>,
}

impl GradientBoostedClassifier {
    /// Parse an XGBoost JSON document
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let document: ModelDocument = serde_json::from_slice(bytes)?;
        Self::from_document(document)
    }

    /// Parse an XGBoost JSON document from a string
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_json_slice(json.as_bytes())
    }

    fn from_document(document: ModelDocument) -> Result<Self> {
        let learner = document.learner;
        let params = learner.learner_model_param;

        let objective = Objective::parse(&learner.objective.name)?;

        let num_features: usize = params
            .num_feature
            .trim()
            .parse()
            .map_err(|_| Error::model(format!("invalid num_feature '{}'", params.num_feature)))?;

        let num_class: usize = params
            .num_class
            .as_deref()
            .unwrap_or("0")
            .trim()
            .parse()
            .map_err(|_| Error::model("invalid num_class"))?;
        if num_class > 1 {
            return Err(Error::model(format!(
                "multi-class models are not supported (num_class = {})",
                num_class
            )));
        }

        let base_score = parse_base_score(&params.base_score)?;
        let base_margin = (base_score / (1.0 - base_score)).ln();

        let (ensemble, weights) = match learner.gradient_booster {
            GradientBooster::Gbtree { model } => (model, None),
            GradientBooster::Dart {
                gbtree,
                weight_drop,
            } => (gbtree.model, Some(weight_drop)),
        };

        if ensemble.tree_info.iter().any(|group| *group != 0) {
            return Err(Error::model("trees belong to more than one output group"));
        }

        let tree_count = ensemble.trees.len();
        let tree_weights = match weights {
            Some(w) if w.len() != tree_count => {
                return Err(Error::model(format!(
                    "dart booster has {} weights for {} trees",
                    w.len(),
                    tree_count
                )));
            }
            Some(w) => w,
            None => vec![1.0; tree_count],
        };

        let trees = ensemble
            .trees
            .into_iter()
            .enumerate()
            .map(|(id, raw)| raw.compile(id, num_features))
            .collect::<Result<Vec<_>>>()?;

        if !learner.feature_names.is_empty() && learner.feature_names.len() != num_features {
            return Err(Error::model(format!(
                "model lists {} feature names for {} features",
                learner.feature_names.len(),
                num_features
            )));
        }

        Ok(Self {
            name: "xgboost".to_string(),
            objective,
            base_margin,
            trees,
            tree_weights,
            num_features,
            feature_names: learner.feature_names,
            version: document.version,
        })
    }

    /// Set a display name for logging
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Raw margin before the logistic link
    pub fn predict_margin(&self, row: &[f32]) -> f32 {
        self.trees
            .iter()
            .zip(&self.tree_weights)
            .fold(self.base_margin, |acc, (tree, weight)| {
                acc + weight * tree.predict(row)
            })
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Feature names embedded in the model, empty when trained on bare arrays
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// XGBoost version that wrote the artifact, when recorded
    pub fn version(&self) -> Option<String> {
        if self.version.is_empty() {
            return None;
        }
        Some(
            self.version
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join("."),
        )
    }

    fn feature_name(&self, index: usize) -> String {
        if let Some(name) = self.feature_names.get(index) {
            name.clone()
        } else if self.num_features == FEATURE_COUNT {
            FEATURE_NAMES[index].to_string()
        } else {
            format!("f{}", index)
        }
    }

    /// Number of splits on each feature across all trees ("weight" importance)
    ///
    /// Features never used in a split are omitted. Sorted by descending count,
    /// ties broken by name.
    pub fn feature_importance(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<usize, usize> = HashMap::new();
        for tree in &self.trees {
            for feature in tree.split_features() {
                *counts.entry(feature).or_default() += 1;
            }
        }

        let mut importance: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(index, count)| (self.feature_name(index), count))
            .collect();
        importance.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        importance
    }
}

impl FeatureClassifier for GradientBoostedClassifier {
    fn predict_proba(&self, features: &FeatureVector) -> Result<f32> {
        if features.len() != self.num_features {
            return Err(Error::schema(self.num_features, features.len()));
        }

        let margin = self.predict_margin(&features.to_row());
        let probability = sigmoid(margin);
        if !probability.is_finite() {
            return Err(Error::inference(format!(
                "model produced a non-finite probability (margin {})",
                margin
            )));
        }
        Ok(probability)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two stumps over three features
    const SMALL_MODEL: &str = r#"{
        "learner": {
            "feature_names": ["a", "b", "c"],
            "gradient_booster": {
                "name": "gbtree",
                "model": {
                    "gbtree_model_param": {"num_trees": "2"},
                    "tree_info": [0, 0],
                    "trees": [
                        {
                            "id": 0,
                            "left_children": [1, -1, -1],
                            "right_children": [2, -1, -1],
                            "split_indices": [0, 0, 0],
                            "split_conditions": [0.5, -1.0, 1.0],
                            "default_left": [0, 0, 0],
                            "split_type": [0, 0, 0]
                        },
                        {
                            "id": 1,
                            "left_children": [1, -1, -1],
                            "right_children": [2, -1, -1],
                            "split_indices": [2, 0, 0],
                            "split_conditions": [2.0, -0.5, 0.5],
                            "default_left": [true, false, false]
                        }
                    ]
                }
            },
            "learner_model_param": {"base_score": "5E-1", "num_class": "0", "num_feature": "3"},
            "objective": {"name": "binary:logistic", "reg_loss_param": {"scale_pos_weight": "1"}}
        },
        "version": [1, 7, 6]
    }"#;

    #[test]
    fn test_parse_small_model() {
        let model = GradientBoostedClassifier::from_json_str(SMALL_MODEL).unwrap();
        assert_eq!(model.tree_count(), 2);
        assert_eq!(model.num_features(), 3);
        assert_eq!(model.objective(), Objective::BinaryLogistic);
        assert_eq!(model.version().as_deref(), Some("1.7.6"));
        assert_eq!(model.feature_names(), ["a", "b", "c"]);
    }

    #[test]
    fn test_margin_sums_trees() {
        let model = GradientBoostedClassifier::from_json_str(SMALL_MODEL).unwrap();
        // base_score 0.5 contributes a zero margin
        assert!((model.predict_margin(&[0.0, 0.0, 0.0]) - -1.5).abs() < 1e-6);
        assert!((model.predict_margin(&[1.0, 0.0, 3.0]) - 1.5).abs() < 1e-6);
        // Missing value on tree 1 follows default_left
        assert!((model.predict_margin(&[1.0, 0.0, f32::NAN]) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_feature_importance_counts_splits() {
        let model = GradientBoostedClassifier::from_json_str(SMALL_MODEL).unwrap();
        let importance = model.feature_importance();
        assert_eq!(
            importance,
            vec![("a".to_string(), 1), ("c".to_string(), 1)]
        );
    }

    #[test]
    fn test_base_score_variants() {
        assert_eq!(parse_base_score("5E-1").unwrap(), 0.5);
        assert_eq!(parse_base_score("[5E-1]").unwrap(), 0.5);
        assert!((parse_base_score("0.25").unwrap() - 0.25).abs() < 1e-7);
        assert!(parse_base_score("1.0").is_err());
        assert!(parse_base_score("abc").is_err());
    }

    #[test]
    fn test_rejects_unsupported_objective() {
        let json = SMALL_MODEL.replace("binary:logistic", "multi:softprob");
        let err = GradientBoostedClassifier::from_json_str(&json).unwrap_err();
        assert!(err.to_string().contains("unsupported objective"));
    }

    #[test]
    fn test_rejects_mismatched_arrays() {
        let json = SMALL_MODEL.replace("\"split_indices\": [0, 0, 0]", "\"split_indices\": [0, 0]");
        let err = GradientBoostedClassifier::from_json_str(&json).unwrap_err();
        assert!(err.to_string().contains("different lengths"));
    }

    #[test]
    fn test_rejects_gblinear() {
        let json = SMALL_MODEL.replace("\"name\": \"gbtree\"", "\"name\": \"gblinear\"");
        assert!(GradientBoostedClassifier::from_json_str(&json).is_err());
    }

    #[test]
    fn test_dart_weights_scale_trees() {
        let json = r#"{
            "learner": {
                "gradient_booster": {
                    "name": "dart",
                    "gbtree": {
                        "name": "gbtree",
                        "model": {
                            "trees": [{
                                "left_children": [-1],
                                "right_children": [-1],
                                "split_indices": [0],
                                "split_conditions": [2.0],
                                "default_left": [0]
                            }]
                        }
                    },
                    "weight_drop": [0.5]
                },
                "learner_model_param": {"base_score": "5E-1", "num_feature": "1"},
                "objective": {"name": "binary:logistic"}
            }
        }"#;
        let model = GradientBoostedClassifier::from_json_str(json).unwrap();
        assert!((model.predict_margin(&[0.0]) - 1.0).abs() < 1e-6);
        assert_eq!(model.version(), None);
        // Leaf-only trees contribute no splits
        assert!(model.feature_importance().is_empty());
    }

    #[test]
    fn test_predict_proba_checks_width() {
        let model = GradientBoostedClassifier::from_json_str(SMALL_MODEL).unwrap();
        let vector = FeatureVector::new(vec![0.0; FEATURE_COUNT]).unwrap();
        let err = model.predict_proba(&vector).unwrap_err();
        assert!(matches!(err, Error::Schema { expected: 3, actual: 77 }));
    }

    #[test]
    fn test_sigmoid() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(20.0) > 0.999);
        assert!(sigmoid(-20.0) < 0.001);
    }
}
