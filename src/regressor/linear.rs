use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::artifact::{find_input, InputSpec, LoadError};
use super::{FeatureType, FeatureValue, ModelInput, PredictionError};

/// Linear regression over numeric inputs with additive category offsets.
///
/// `price = intercept + Σ weight[i] * x[i] + Σ categories[s][value(s)]`
///
/// Inputs without a weight or category table contribute nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinearModel {
    #[serde(default)]
    pub intercept: f64,
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,
    #[serde(default)]
    pub categories: BTreeMap<String, BTreeMap<String, f64>>,
}

impl LinearModel {
    pub(super) fn validate(&self, inputs: &[InputSpec]) -> Result<(), LoadError> {
        if !self.intercept.is_finite() {
            return Err(LoadError::Invalid("linear intercept is not finite".into()));
        }

        for (name, weight) in &self.weights {
            let spec = find_input(inputs, name).ok_or_else(|| {
                LoadError::Invalid(format!("weight for undeclared input `{}`", name))
            })?;
            if spec.kind != FeatureType::Int64 {
                return Err(LoadError::Invalid(format!(
                    "weight given for {} input `{}`",
                    spec.kind, name
                )));
            }
            if !weight.is_finite() {
                return Err(LoadError::Invalid(format!(
                    "weight for `{}` is not finite",
                    name
                )));
            }
        }

        for (name, table) in &self.categories {
            let spec = find_input(inputs, name).ok_or_else(|| {
                LoadError::Invalid(format!("categories for undeclared input `{}`", name))
            })?;
            if spec.kind != FeatureType::String {
                return Err(LoadError::Invalid(format!(
                    "categories given for {} input `{}`",
                    spec.kind, name
                )));
            }
            if let Some(allowed) = &spec.categories {
                if let Some(missing) = allowed.iter().find(|c| !table.contains_key(*c)) {
                    return Err(LoadError::Invalid(format!(
                        "no offset for category `{}` of input `{}`",
                        missing, name
                    )));
                }
            }
        }

        Ok(())
    }

    /// Sum contributions in schema order so the result is reproducible.
    pub(super) fn evaluate(
        &self,
        inputs: &[InputSpec],
        input: &ModelInput,
    ) -> Result<f64, PredictionError> {
        let mut total = self.intercept;

        for spec in inputs {
            let Some(value) = input.get(&spec.name) else {
                return Err(PredictionError::MissingFeature(spec.name.clone()));
            };
            match value {
                FeatureValue::Int64(x) => {
                    if let Some(weight) = self.weights.get(&spec.name) {
                        total += weight * *x as f64;
                    }
                }
                FeatureValue::String(s) => {
                    if let Some(table) = self.categories.get(&spec.name) {
                        let offset =
                            table
                                .get(s)
                                .ok_or_else(|| PredictionError::UnknownCategory {
                                    name: spec.name.clone(),
                                    value: s.clone(),
                                })?;
                        total += offset;
                    }
                }
            }
        }

        Ok(total)
    }
}
