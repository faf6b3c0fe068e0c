//! Boundary to the pre-trained regression model.
//!
//! The estimator only sees [`RegressionModel`]: a pure function from named,
//! typed inputs to a single number. [`ModelArtifact`] loads the concrete
//! model shipped as a JSON file, which is either a linear model or an
//! ensemble of regression trees.

mod artifact;
mod linear;
mod tree;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use artifact::*;
pub use linear::LinearModel;
pub use tree::{RegressionTree, TreeEnsemble, TreeNode};

/// A pre-trained model consumed as a black box.
///
/// Implementations must be deterministic: the same input always yields the
/// same output.
pub trait RegressionModel {
    fn predict(&self, input: &ModelInput) -> Result<f64, PredictionError>;
}

/// Failure to produce a prediction for a given input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("missing input feature `{0}`")]
    MissingFeature(String),

    #[error("input feature `{name}` is {found}, expected {expected}")]
    TypeMismatch {
        name: String,
        expected: FeatureType,
        found: FeatureType,
    },

    #[error("input feature `{name}` has unknown category `{value}`")]
    UnknownCategory { name: String, value: String },

    #[error("model produced a non-finite prediction ({0})")]
    NonFinite(f64),

    #[error("model unavailable: {0}")]
    Unavailable(String),
}

/// Value type of a model input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureType {
    Int64,
    String,
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int64 => f.write_str("int64"),
            Self::String => f.write_str("string"),
        }
    }
}

/// A single typed model input value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Int64(i64),
    String(String),
}

impl FeatureValue {
    pub fn feature_type(&self) -> FeatureType {
        match self {
            Self::Int64(_) => FeatureType::Int64,
            Self::String(_) => FeatureType::String,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int64(v) => Some(*v),
            Self::String(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Int64(_) => None,
        }
    }
}

impl From<i64> for FeatureValue {
    fn from(value: i64) -> Self {
        Self::Int64(value)
    }
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int64(v) => write!(f, "{}", v),
            Self::String(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// Named inputs submitted to a model in one prediction call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelInput(BTreeMap<String, FeatureValue>);

impl ModelInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FeatureValue) -> Option<FeatureValue> {
        self.0.insert(name.into(), value)
    }

    pub fn remove(&mut self, name: &str) -> Option<FeatureValue> {
        self.0.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, FeatureValue)> for ModelInput {
    fn from_iter<I: IntoIterator<Item = (K, FeatureValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
