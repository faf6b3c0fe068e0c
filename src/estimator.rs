//! Turns form state into a price by way of the regression model.

use crate::form::FormState;
use crate::models::{FeatureRecord, PriceEstimate};
use crate::regressor::{PredictionError, RegressionModel};

/// Result of refreshing the displayed price.
#[derive(Debug, Clone, PartialEq)]
pub enum Refresh {
    /// The model produced a price and the form now shows it.
    Updated(PriceEstimate),
    /// The model failed; the form still shows its previous price.
    Unchanged(PredictionError),
}

impl Refresh {
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated(_))
    }
}

/// Wraps a loaded model and invokes it once per request.
pub struct Estimator {
    model: Box<dyn RegressionModel>,
}

impl Estimator {
    pub fn new(model: impl RegressionModel + 'static) -> Self {
        Self {
            model: Box::new(model),
        }
    }

    /// Submit one record to the model.
    pub fn estimate(&self, record: &FeatureRecord) -> Result<PriceEstimate, PredictionError> {
        let input = record.to_model_input();
        let amount = self.model.predict(&input)?;
        tracing::debug!(?record, amount, "Estimated price");
        Ok(PriceEstimate::new(amount))
    }

    /// Estimate from the current form values and display the result.
    ///
    /// Prediction failures are logged and never reach the caller as an
    /// error; the previously displayed price stays in place.
    pub fn refresh(&self, form: &mut FormState) -> Refresh {
        let record = form.record();
        match self.estimate(&record) {
            Ok(price) => {
                form.display_price(price);
                Refresh::Updated(price)
            }
            Err(e) => {
                tracing::error!("Error predicting home price: {}", e);
                Refresh::Unchanged(e)
            }
        }
    }
}
