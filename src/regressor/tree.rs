use serde::{Deserialize, Serialize};

use super::artifact::{find_input, InputSpec, LoadError};
use super::{FeatureType, ModelInput, PredictionError};

/// Additive ensemble of regression trees (boosted-tree style).
///
/// The prediction is `base_score` plus the leaf value reached in each tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<RegressionTree>,
}

/// A single tree stored as a flat node list rooted at index 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// Goes `left` when the numeric input is below `threshold`.
    Split {
        feature: String,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Goes `left` when the string input is one of `categories`.
    CategorySplit {
        feature: String,
        categories: Vec<String>,
        left: usize,
        right: usize,
    },
    Leaf { value: f64 },
}

impl TreeEnsemble {
    pub(super) fn validate(&self, inputs: &[InputSpec]) -> Result<(), LoadError> {
        if !self.base_score.is_finite() {
            return Err(LoadError::Invalid("base_score is not finite".into()));
        }
        for (t, tree) in self.trees.iter().enumerate() {
            tree.validate(inputs)
                .map_err(|msg| LoadError::Invalid(format!("tree {}: {}", t, msg)))?;
        }
        Ok(())
    }

    pub(super) fn evaluate(&self, input: &ModelInput) -> Result<f64, PredictionError> {
        let mut total = self.base_score;
        for tree in &self.trees {
            total += tree.evaluate(input)?;
        }
        Ok(total)
    }
}

impl RegressionTree {
    // Children must come after their parent, which rules out cycles and
    // guarantees every walk ends at a leaf.
    fn validate(&self, inputs: &[InputSpec]) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".into());
        }

        for (i, node) in self.nodes.iter().enumerate() {
            let (feature, expected, left, right) = match node {
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("leaf {} is not finite", i));
                    }
                    continue;
                }
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if threshold.is_nan() {
                        return Err(format!("node {} has a NaN threshold", i));
                    }
                    (feature, FeatureType::Int64, *left, *right)
                }
                TreeNode::CategorySplit {
                    feature,
                    left,
                    right,
                    ..
                } => (feature, FeatureType::String, *left, *right),
            };

            let spec = find_input(inputs, feature)
                .ok_or_else(|| format!("node {} splits on undeclared input `{}`", i, feature))?;
            if spec.kind != expected {
                return Err(format!(
                    "node {} splits on {} input `{}` as {}",
                    i, spec.kind, feature, expected
                ));
            }

            for child in [left, right] {
                if child <= i || child >= self.nodes.len() {
                    return Err(format!("node {} has invalid child index {}", i, child));
                }
            }
        }

        Ok(())
    }

    fn evaluate(&self, input: &ModelInput) -> Result<f64, PredictionError> {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { value } => return Ok(*value),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let x = numeric(input, feature)?;
                    index = if (x as f64) < *threshold { *left } else { *right };
                }
                TreeNode::CategorySplit {
                    feature,
                    categories,
                    left,
                    right,
                } => {
                    let s = categorical(input, feature)?;
                    index = if categories.iter().any(|c| c == s) {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

fn numeric(input: &ModelInput, feature: &str) -> Result<i64, PredictionError> {
    let value = input
        .get(feature)
        .ok_or_else(|| PredictionError::MissingFeature(feature.to_string()))?;
    value.as_i64().ok_or_else(|| PredictionError::TypeMismatch {
        name: feature.to_string(),
        expected: FeatureType::Int64,
        found: value.feature_type(),
    })
}

fn categorical<'a>(input: &'a ModelInput, feature: &str) -> Result<&'a str, PredictionError> {
    let value = input
        .get(feature)
        .ok_or_else(|| PredictionError::MissingFeature(feature.to_string()))?;
    value.as_str().ok_or_else(|| PredictionError::TypeMismatch {
        name: feature.to_string(),
        expected: FeatureType::String,
        found: value.feature_type(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regressor::FeatureValue;

    fn specs() -> Vec<InputSpec> {
        vec![
            InputSpec {
                name: "sqft".into(),
                kind: FeatureType::Int64,
                categories: None,
            },
            InputSpec {
                name: "water".into(),
                kind: FeatureType::String,
                categories: Some(vec!["yes".into(), "no".into()]),
            },
        ]
    }

    fn tree() -> RegressionTree {
        RegressionTree {
            nodes: vec![
                TreeNode::Split {
                    feature: "sqft".into(),
                    threshold: 1500.0,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf { value: 100.0 },
                TreeNode::CategorySplit {
                    feature: "water".into(),
                    categories: vec!["yes".into()],
                    left: 3,
                    right: 4,
                },
                TreeNode::Leaf { value: 500.0 },
                TreeNode::Leaf { value: 200.0 },
            ],
        }
    }

    fn input(sqft: i64, water: &str) -> ModelInput {
        [
            ("sqft", FeatureValue::Int64(sqft)),
            ("water", FeatureValue::from(water)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_walks_numeric_and_category_splits() {
        let tree = tree();
        assert_eq!(tree.evaluate(&input(1000, "yes")).unwrap(), 100.0);
        assert_eq!(tree.evaluate(&input(1500, "yes")).unwrap(), 500.0);
        assert_eq!(tree.evaluate(&input(2000, "no")).unwrap(), 200.0);
    }

    #[test]
    fn test_ensemble_adds_base_score() {
        let ensemble = TreeEnsemble {
            base_score: 1000.0,
            trees: vec![tree(), tree()],
        };
        assert_eq!(ensemble.evaluate(&input(2000, "no")).unwrap(), 1400.0);
    }

    #[test]
    fn test_validate_rejects_backward_child() {
        let mut tree = tree();
        tree.nodes[2] = TreeNode::CategorySplit {
            feature: "water".into(),
            categories: vec!["yes".into()],
            left: 0,
            right: 4,
        };
        let err = tree.validate(&specs()).unwrap_err();
        assert_eq!(err, "node 2 has invalid child index 0");
    }

    #[test]
    fn test_validate_rejects_split_type_mismatch() {
        let tree = RegressionTree {
            nodes: vec![
                TreeNode::Split {
                    feature: "water".into(),
                    threshold: 1.0,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf { value: 1.0 },
                TreeNode::Leaf { value: 2.0 },
            ],
        };
        assert!(tree.validate(&specs()).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_tree() {
        let tree = RegressionTree { nodes: vec![] };
        assert_eq!(tree.validate(&specs()).unwrap_err(), "tree has no nodes");
    }
}
