use std::fmt;

use serde::{Deserialize, Serialize};

/// A single price amount produced by the regression model.
///
/// Non-negative by convention only; whatever the model returns is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceEstimate(f64);

impl PriceEstimate {
    pub const ZERO: Self = Self(0.0);

    pub fn new(amount: f64) -> Self {
        Self(amount)
    }

    pub fn amount(self) -> f64 {
        self.0
    }
}

impl From<f64> for PriceEstimate {
    fn from(amount: f64) -> Self {
        Self(amount)
    }
}

impl fmt::Display for PriceEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
