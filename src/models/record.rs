use serde::{Deserialize, Serialize};

use super::selection::{Bathrooms, Bedrooms, SpaceCount};
use crate::regressor::{FeatureValue, ModelInput};

/// Model input names, in the order the regressor declares them.
pub mod inputs {
    pub const BEDROOMS: &str = "bedrooms";
    pub const BATHROOMS: &str = "bathrooms";
    pub const SQUARE_FEET: &str = "square_feet";
    pub const PARKING_SPACES: &str = "parking_spaces";
    pub const GARAGE_SPACES: &str = "garage_spaces";
    pub const CORNER: &str = "corner";
    pub const LOT_SIZE: &str = "lot_size";
    pub const WATER_FRONT: &str = "water_front";

    pub const ALL: [&str; 8] = [
        BEDROOMS,
        BATHROOMS,
        SQUARE_FEET,
        PARKING_SPACES,
        GARAGE_SPACES,
        CORNER,
        LOT_SIZE,
        WATER_FRONT,
    ];
}

/// Largest value a free-text number field accepts. The model reads int64.
pub const MAX_WHOLE_NUMBER: u64 = i64::MAX as u64;

/// The fixed-shape set of house attributes submitted for estimation.
///
/// Built fresh from the form on every request and dropped afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub bedrooms: Bedrooms,
    pub bathrooms: Bathrooms,
    pub square_feet: u64,
    pub parking_spaces: SpaceCount,
    pub garage_spaces: SpaceCount,
    pub corner_lot: bool,
    pub lot_size: u64,
    pub waterfront: bool,
}

impl FeatureRecord {
    /// Translate into the named, typed inputs the regression model expects.
    ///
    /// Selections become their counts and flags become the literal
    /// strings `"yes"` / `"no"`.
    pub fn to_model_input(&self) -> ModelInput {
        let mut input = ModelInput::new();
        input.insert(inputs::BEDROOMS, FeatureValue::Int64(self.bedrooms.count()));
        input.insert(inputs::BATHROOMS, FeatureValue::Int64(self.bathrooms.count()));
        input.insert(inputs::SQUARE_FEET, FeatureValue::Int64(int64(self.square_feet)));
        input.insert(
            inputs::PARKING_SPACES,
            FeatureValue::Int64(self.parking_spaces.count()),
        );
        input.insert(
            inputs::GARAGE_SPACES,
            FeatureValue::Int64(self.garage_spaces.count()),
        );
        input.insert(inputs::CORNER, FeatureValue::from(yes_no(self.corner_lot)));
        input.insert(inputs::LOT_SIZE, FeatureValue::Int64(int64(self.lot_size)));
        input.insert(
            inputs::WATER_FRONT,
            FeatureValue::from(yes_no(self.waterfront)),
        );
        input
    }
}

// Form and CLI input is capped at MAX_WHOLE_NUMBER; a record built by hand
// past it saturates.
fn int64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// The string token the model expects for a boolean attribute.
pub fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}
