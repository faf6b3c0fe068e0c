use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::linear::LinearModel;
use super::tree::TreeEnsemble;
use super::{FeatureType, ModelInput, PredictionError, RegressionModel};

const DEFAULT_OUTPUT: &str = "price";

/// Failure to load a model artifact. Fatal at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read model artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model artifact {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid model artifact: {0}")]
    Invalid(String),
}

/// One declared model input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FeatureType,
    /// Allowed values of a string input. `None` accepts any string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
}

/// Parameters of the pre-trained model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelKind {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linear(_) => "linear",
            Self::TreeEnsemble(_) => "tree_ensemble",
        }
    }
}

/// On-disk description of a pre-trained regression model.
///
/// ```json
/// {
///   "name": "HomePriceRegressor",
///   "inputs": [{ "name": "bedrooms", "type": "int64" }, ...],
///   "output": "price",
///   "model": { "type": "linear", "intercept": 42000.0, "weights": { ... } }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_version")]
    pub version: String,
    pub inputs: Vec<InputSpec>,
    #[serde(default = "default_output")]
    pub output: String,
    pub model: ModelKind,
}

fn default_version() -> String {
    "1".to_string()
}

fn default_output() -> String {
    DEFAULT_OUTPUT.to_string()
}

impl ModelArtifact {
    /// Read, parse and validate an artifact file.
    pub fn load(path: impl AsRef<Path>) -> Result<LoadedModel, LoadError> {
        let path = path.as_ref();
        tracing::debug!("Loading model artifact from {}", path.display());

        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact: ModelArtifact =
            serde_json::from_str(&content).map_err(|source| LoadError::Parse {
                origin: path.display().to_string(),
                source,
            })?;

        let model = artifact.validate()?;
        tracing::info!(
            "Loaded {} model '{}' v{} with {} inputs",
            model.artifact.model.as_str(),
            model.artifact.name,
            model.artifact.version,
            model.artifact.inputs.len()
        );
        Ok(model)
    }

    /// Parse and validate an artifact held in memory.
    pub fn from_json(json: &str) -> Result<LoadedModel, LoadError> {
        let artifact: ModelArtifact =
            serde_json::from_str(json).map_err(|source| LoadError::Parse {
                origin: "<inline>".to_string(),
                source,
            })?;
        artifact.validate()
    }

    /// Check the schema and parameters for consistency.
    pub fn validate(self) -> Result<LoadedModel, LoadError> {
        if self.inputs.is_empty() {
            return Err(LoadError::Invalid("artifact declares no inputs".into()));
        }
        for (i, spec) in self.inputs.iter().enumerate() {
            if self.inputs[..i].iter().any(|other| other.name == spec.name) {
                return Err(LoadError::Invalid(format!(
                    "input `{}` is declared twice",
                    spec.name
                )));
            }
            if spec.kind == FeatureType::Int64 && spec.categories.is_some() {
                return Err(LoadError::Invalid(format!(
                    "int64 input `{}` cannot declare categories",
                    spec.name
                )));
            }
        }

        match &self.model {
            ModelKind::Linear(linear) => linear.validate(&self.inputs)?,
            ModelKind::TreeEnsemble(ensemble) => ensemble.validate(&self.inputs)?,
        }

        Ok(LoadedModel { artifact: self })
    }
}

/// Summary of a loaded model, as shown by `hpest inspect`.
#[derive(Debug, Clone, Serialize)]
pub struct ModelDescription {
    pub name: String,
    pub description: Option<String>,
    pub version: String,
    pub kind: &'static str,
    pub output: String,
    pub inputs: Vec<InputSpec>,
}

/// A validated artifact ready for inference.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    artifact: ModelArtifact,
}

impl LoadedModel {
    pub fn describe(&self) -> ModelDescription {
        ModelDescription {
            name: self.artifact.name.clone(),
            description: self.artifact.description.clone(),
            version: self.artifact.version.clone(),
            kind: self.artifact.model.as_str(),
            output: self.artifact.output.clone(),
            inputs: self.artifact.inputs.clone(),
        }
    }

    /// Reject inputs that do not match the declared schema.
    fn check_shape(&self, input: &ModelInput) -> Result<(), PredictionError> {
        for spec in &self.artifact.inputs {
            let value = input
                .get(&spec.name)
                .ok_or_else(|| PredictionError::MissingFeature(spec.name.clone()))?;

            if value.feature_type() != spec.kind {
                return Err(PredictionError::TypeMismatch {
                    name: spec.name.clone(),
                    expected: spec.kind,
                    found: value.feature_type(),
                });
            }

            if let (Some(allowed), Some(s)) = (&spec.categories, value.as_str()) {
                if !allowed.iter().any(|c| c == s) {
                    return Err(PredictionError::UnknownCategory {
                        name: spec.name.clone(),
                        value: s.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl RegressionModel for LoadedModel {
    fn predict(&self, input: &ModelInput) -> Result<f64, PredictionError> {
        self.check_shape(input)?;

        let value = match &self.artifact.model {
            ModelKind::Linear(linear) => linear.evaluate(&self.artifact.inputs, input)?,
            ModelKind::TreeEnsemble(ensemble) => ensemble.evaluate(input)?,
        };

        if !value.is_finite() {
            return Err(PredictionError::NonFinite(value));
        }
        Ok(value)
    }
}

pub(super) fn find_input<'a>(inputs: &'a [InputSpec], name: &str) -> Option<&'a InputSpec> {
    inputs.iter().find(|spec| spec.name == name)
}
