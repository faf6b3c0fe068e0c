use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A count outside the closed set of a selection field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{value} is not a valid {field} selection (expected {expected})")]
pub struct SelectionError {
    pub field: &'static str,
    pub value: String,
    pub expected: &'static str,
}

/// Number of bedrooms, picked from a fixed list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Bedrooms {
    #[default]
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
}

impl Bedrooms {
    pub const ALL: [Self; 6] = [
        Self::One,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
    ];

    pub fn count(self) -> i64 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
            Self::Five => 5,
            Self::Six => 6,
        }
    }

    pub fn from_count(count: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.count() == count)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::One => "1",
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
            Self::Six => "6",
        }
    }
}

/// Number of bathrooms, picked from a fixed list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Bathrooms {
    #[default]
    One,
    Two,
    Three,
    Four,
    Five,
}

impl Bathrooms {
    pub const ALL: [Self; 5] = [Self::One, Self::Two, Self::Three, Self::Four, Self::Five];

    pub fn count(self) -> i64 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
            Self::Five => 5,
        }
    }

    pub fn from_count(count: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.count() == count)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::One => "1",
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
        }
    }
}

/// Garage or parking spaces. Shared by both pickers; `None` means zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum SpaceCount {
    #[default]
    None,
    One,
    Two,
    Three,
    Four,
    Five,
}

impl SpaceCount {
    pub const ALL: [Self; 6] = [
        Self::None,
        Self::One,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
    ];

    pub fn count(self) -> i64 {
        match self {
            Self::None => 0,
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
            Self::Five => 5,
        }
    }

    pub fn from_count(count: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.count() == count)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::One => "1",
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
        }
    }
}

macro_rules! selection_impls {
    ($ty:ident, $field:literal, $expected:literal) => {
        impl TryFrom<i64> for $ty {
            type Error = SelectionError;

            fn try_from(count: i64) -> Result<Self, Self::Error> {
                Self::from_count(count).ok_or_else(|| SelectionError {
                    field: $field,
                    value: count.to_string(),
                    expected: $expected,
                })
            }
        }

        impl From<$ty> for i64 {
            fn from(value: $ty) -> i64 {
                value.count()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

selection_impls!(Bedrooms, "bedrooms", "1-6");
selection_impls!(Bathrooms, "bathrooms", "1-5");
selection_impls!(SpaceCount, "space count", "none or 0-5");

impl FromStr for Bedrooms {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_count(s, "bedrooms", "1-6").and_then(Self::try_from)
    }
}

impl FromStr for Bathrooms {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_count(s, "bathrooms", "1-5").and_then(Self::try_from)
    }
}

impl FromStr for SpaceCount {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("none") {
            return Ok(Self::None);
        }
        parse_count(s, "space count", "none or 0-5").and_then(Self::try_from)
    }
}

fn parse_count(
    s: &str,
    field: &'static str,
    expected: &'static str,
) -> Result<i64, SelectionError> {
    s.trim().parse::<i64>().map_err(|_| SelectionError {
        field,
        value: s.trim().to_string(),
        expected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_cover_closed_sets() {
        let bedrooms: Vec<i64> = Bedrooms::ALL.iter().map(|b| b.count()).collect();
        assert_eq!(bedrooms, vec![1, 2, 3, 4, 5, 6]);

        let bathrooms: Vec<i64> = Bathrooms::ALL.iter().map(|b| b.count()).collect();
        assert_eq!(bathrooms, vec![1, 2, 3, 4, 5]);

        let spaces: Vec<i64> = SpaceCount::ALL.iter().map(|s| s.count()).collect();
        assert_eq!(spaces, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_out_of_range_counts_are_rejected() {
        assert!(Bedrooms::try_from(0i64).is_err());
        assert!(Bedrooms::try_from(7i64).is_err());
        assert!(Bathrooms::try_from(6i64).is_err());
        assert!(SpaceCount::try_from(-1i64).is_err());
        assert!(SpaceCount::try_from(6i64).is_err());
    }

    #[test]
    fn test_space_count_parses_none() {
        assert_eq!("none".parse::<SpaceCount>().unwrap(), SpaceCount::None);
        assert_eq!("None".parse::<SpaceCount>().unwrap(), SpaceCount::None);
        assert_eq!("0".parse::<SpaceCount>().unwrap(), SpaceCount::None);
        assert_eq!(" 3 ".parse::<SpaceCount>().unwrap(), SpaceCount::Three);
    }

    #[test]
    fn test_parse_error_names_the_field() {
        let err = "seven".parse::<Bedrooms>().unwrap_err();
        assert_eq!(err.field, "bedrooms");
        assert_eq!(
            err.to_string(),
            "seven is not a valid bedrooms selection (expected 1-6)"
        );
    }

    #[test]
    fn test_labels_match_picker_text() {
        assert_eq!(SpaceCount::None.label(), "None");
        assert_eq!(SpaceCount::Two.to_string(), "2");
        assert_eq!(Bedrooms::Six.to_string(), "6");
    }

    #[test]
    fn test_serde_uses_counts() {
        assert_eq!(serde_json::to_string(&Bedrooms::Three).unwrap(), "3");
        let parsed: SpaceCount = serde_json::from_str("2").unwrap();
        assert_eq!(parsed, SpaceCount::Two);
        assert!(serde_json::from_str::<Bathrooms>("9").is_err());
    }
}
