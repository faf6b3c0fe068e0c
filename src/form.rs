//! Current values of the estimate form.
//!
//! [`FormState`] is owned by whichever shell drives the form and handed to
//! the estimator explicitly; nothing here is shared or global.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::models::*;

/// The fields of the form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Bedrooms,
    Bathrooms,
    GarageSpaces,
    ParkingSpaces,
    SquareFeet,
    LotSize,
    CornerLot,
    Waterfront,
}

impl FormField {
    pub const ALL: [Self; 8] = [
        Self::Bedrooms,
        Self::Bathrooms,
        Self::GarageSpaces,
        Self::ParkingSpaces,
        Self::SquareFeet,
        Self::LotSize,
        Self::CornerLot,
        Self::Waterfront,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Bedrooms => "Number of Bedrooms",
            Self::Bathrooms => "Number of Bathrooms",
            Self::GarageSpaces => "Number of Garage Spaces",
            Self::ParkingSpaces => "Number of Parking Spaces",
            Self::SquareFeet => "Square Footage",
            Self::LotSize => "Lot Size",
            Self::CornerLot => "Corner Lot",
            Self::Waterfront => "Waterfront",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A boolean field that can be flipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    CornerLot,
    Waterfront,
}

/// A typed change to one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEdit {
    Bedrooms(Bedrooms),
    Bathrooms(Bathrooms),
    GarageSpaces(SpaceCount),
    ParkingSpaces(SpaceCount),
    SquareFeet(u64),
    LotSize(u64),
    CornerLot(bool),
    Waterfront(bool),
}

/// Text that could not be coerced into a field's type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{field} must be a whole number, got `{text}`")]
    NotANumber { field: FormField, text: String },

    #[error("{field} cannot be negative")]
    Negative { field: FormField },

    #[error("{field} is too large")]
    TooLarge { field: FormField },

    #[error("{field} expects yes or no, got `{text}`")]
    NotAFlag { field: FormField, text: String },

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// Values currently shown by the form, plus the last displayed price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormState {
    pub bedrooms: Bedrooms,
    pub bathrooms: Bathrooms,
    pub garage_spaces: SpaceCount,
    pub parking_spaces: SpaceCount,
    pub square_feet: u64,
    pub lot_size: u64,
    pub corner_lot: bool,
    pub waterfront: bool,
    price: PriceEstimate,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            bedrooms: Bedrooms::One,
            bathrooms: Bathrooms::One,
            garage_spaces: SpaceCount::None,
            parking_spaces: SpaceCount::None,
            square_feet: 0,
            lot_size: 0,
            corner_lot: false,
            waterfront: false,
            price: PriceEstimate::ZERO,
        }
    }
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The price currently on display. Only a successful estimate changes it.
    pub fn price(&self) -> PriceEstimate {
        self.price
    }

    pub(crate) fn display_price(&mut self, price: PriceEstimate) {
        self.price = price;
    }

    pub fn apply(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::Bedrooms(v) => self.bedrooms = v,
            FieldEdit::Bathrooms(v) => self.bathrooms = v,
            FieldEdit::GarageSpaces(v) => self.garage_spaces = v,
            FieldEdit::ParkingSpaces(v) => self.parking_spaces = v,
            FieldEdit::SquareFeet(v) => self.square_feet = v,
            FieldEdit::LotSize(v) => self.lot_size = v,
            FieldEdit::CornerLot(v) => self.corner_lot = v,
            FieldEdit::Waterfront(v) => self.waterfront = v,
        }
    }

    /// Coerce `text` into `field` and store it. On error the field keeps its
    /// previous value.
    pub fn set_text(&mut self, field: FormField, text: &str) -> Result<(), FieldError> {
        let edit = parse_edit(field, text)?;
        self.apply(edit);
        Ok(())
    }

    pub fn toggle(&mut self, toggle: Toggle) {
        match toggle {
            Toggle::CornerLot => self.corner_lot = !self.corner_lot,
            Toggle::Waterfront => self.waterfront = !self.waterfront,
        }
    }

    /// Restore every input to its default. The displayed price is kept.
    pub fn reset(&mut self) {
        *self = Self {
            price: self.price,
            ..Self::default()
        };
    }

    /// Display text of a field's current value.
    pub fn value_text(&self, field: FormField) -> String {
        match field {
            FormField::Bedrooms => self.bedrooms.to_string(),
            FormField::Bathrooms => self.bathrooms.to_string(),
            FormField::GarageSpaces => self.garage_spaces.to_string(),
            FormField::ParkingSpaces => self.parking_spaces.to_string(),
            FormField::SquareFeet => self.square_feet.to_string(),
            FormField::LotSize => self.lot_size.to_string(),
            FormField::CornerLot => on_off(self.corner_lot).to_string(),
            FormField::Waterfront => on_off(self.waterfront).to_string(),
        }
    }

    /// Snapshot the inputs for one estimation request.
    pub fn record(&self) -> FeatureRecord {
        FeatureRecord {
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            square_feet: self.square_feet,
            parking_spaces: self.parking_spaces,
            garage_spaces: self.garage_spaces,
            corner_lot: self.corner_lot,
            lot_size: self.lot_size,
            waterfront: self.waterfront,
        }
    }
}

impl From<FeatureRecord> for FormState {
    fn from(record: FeatureRecord) -> Self {
        Self {
            bedrooms: record.bedrooms,
            bathrooms: record.bathrooms,
            garage_spaces: record.garage_spaces,
            parking_spaces: record.parking_spaces,
            square_feet: record.square_feet,
            lot_size: record.lot_size,
            corner_lot: record.corner_lot,
            waterfront: record.waterfront,
            price: PriceEstimate::ZERO,
        }
    }
}

/// Parse user text into a typed edit for `field`.
pub fn parse_edit(field: FormField, text: &str) -> Result<FieldEdit, FieldError> {
    let edit = match field {
        FormField::Bedrooms => FieldEdit::Bedrooms(text.parse()?),
        FormField::Bathrooms => FieldEdit::Bathrooms(text.parse()?),
        FormField::GarageSpaces => FieldEdit::GarageSpaces(text.parse()?),
        FormField::ParkingSpaces => FieldEdit::ParkingSpaces(text.parse()?),
        FormField::SquareFeet => FieldEdit::SquareFeet(coerce_whole_number(field, text)?),
        FormField::LotSize => FieldEdit::LotSize(coerce_whole_number(field, text)?),
        FormField::CornerLot => FieldEdit::CornerLot(parse_flag(field, text)?),
        FormField::Waterfront => FieldEdit::Waterfront(parse_flag(field, text)?),
    };
    Ok(edit)
}

/// Lenient whole-number coercion for free-text fields.
///
/// Surrounding whitespace and grouping separators (`,` `_` and spaces) are
/// ignored, so `"1,800"` reads as 1800. Values above [`MAX_WHOLE_NUMBER`]
/// are too large.
pub fn coerce_whole_number(field: FormField, text: &str) -> Result<u64, FieldError> {
    let trimmed = text.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let cleaned: String = digits
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | ' '))
        .collect();
    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return Err(FieldError::NotANumber {
            field,
            text: trimmed.to_string(),
        });
    }

    if negative && cleaned.chars().any(|c| c != '0') {
        return Err(FieldError::Negative { field });
    }

    cleaned
        .parse::<u64>()
        .ok()
        .filter(|n| *n <= MAX_WHOLE_NUMBER)
        .ok_or(FieldError::TooLarge { field })
}

pub fn parse_flag(field: FormField, text: &str) -> Result<bool, FieldError> {
    match text.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "on" | "true" | "1" => Ok(true),
        "no" | "n" | "off" | "false" | "0" => Ok(false),
        _ => Err(FieldError::NotAFlag {
            field,
            text: text.trim().to_string(),
        }),
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "On" } else { "Off" }
}
