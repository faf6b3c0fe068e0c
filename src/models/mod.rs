//! Domain types for the estimator.
//!
//! - [`Bedrooms`], [`Bathrooms`], [`SpaceCount`]: closed selection sets backing the pickers.
//! - [`FeatureRecord`]: the house attributes submitted to the model, one per request.
//! - [`PriceEstimate`]: the model's single numeric output.

mod estimate;
mod record;
mod selection;

pub use estimate::*;
pub use record::*;
pub use selection::*;
