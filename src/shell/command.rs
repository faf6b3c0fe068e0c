use thiserror::Error;

use crate::form::{parse_edit, parse_flag, FieldEdit, FieldError, FormField, Toggle};

pub const HELP: &str = "\
Commands:
  bedrooms <1-6>              set the number of bedrooms
  bathrooms <1-5>             set the number of bathrooms
  garage <none|0-5>           set the number of garage spaces
  parking <none|0-5>          set the number of parking spaces
  sqft <n>                    set the square footage
  lot <n>                     set the lot size
  corner [yes|no|toggle]      set or flip the corner lot flag
  waterfront [yes|no|toggle]  set or flip the waterfront flag
  estimate                    estimate the price from the current values
  show                        show the form
  reset                       restore default values
  help                        show this help
  quit                        leave
";

/// One line of shell input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Set(FieldEdit),
    Toggle(Toggle),
    Estimate,
    Show,
    Reset,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command `{0}` (type `help` for a list)")]
    Unknown(String),

    #[error("`{command}` needs a value: {usage}")]
    MissingValue {
        command: String,
        usage: &'static str,
    },

    #[error("`{0}` takes no value")]
    UnexpectedValue(String),

    #[error(transparent)]
    Field(#[from] FieldError),
}

impl Command {
    /// Parse a line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (name, value) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, Some(rest.trim()).filter(|v| !v.is_empty())),
            None => (line, None),
        };
        let keyword = name.to_ascii_lowercase();

        let field = match keyword.as_str() {
            "bedrooms" | "beds" => Some((FormField::Bedrooms, "bedrooms <1-6>")),
            "bathrooms" | "baths" => Some((FormField::Bathrooms, "bathrooms <1-5>")),
            "garage" => Some((FormField::GarageSpaces, "garage <none|0-5>")),
            "parking" => Some((FormField::ParkingSpaces, "parking <none|0-5>")),
            "sqft" | "square-feet" | "square_feet" => Some((FormField::SquareFeet, "sqft <n>")),
            "lot" | "lot-size" | "lot_size" => Some((FormField::LotSize, "lot <n>")),
            _ => None,
        };
        if let Some((field, usage)) = field {
            let value = value.ok_or_else(|| CommandError::MissingValue {
                command: keyword.clone(),
                usage,
            })?;
            return Ok(Some(Self::Set(parse_edit(field, value)?)));
        }

        let flag = match keyword.as_str() {
            "corner" => Some((FormField::CornerLot, Toggle::CornerLot)),
            "waterfront" | "water-front" => Some((FormField::Waterfront, Toggle::Waterfront)),
            _ => None,
        };
        if let Some((field, toggle)) = flag {
            return match value {
                None => Ok(Some(Self::Toggle(toggle))),
                Some(v) if v.eq_ignore_ascii_case("toggle") => Ok(Some(Self::Toggle(toggle))),
                Some(v) => {
                    let on = parse_flag(field, v)?;
                    let edit = match toggle {
                        Toggle::CornerLot => FieldEdit::CornerLot(on),
                        Toggle::Waterfront => FieldEdit::Waterfront(on),
                    };
                    Ok(Some(Self::Set(edit)))
                }
            };
        }

        let command = match keyword.as_str() {
            "estimate" | "e" => Self::Estimate,
            "show" | "s" => Self::Show,
            "reset" => Self::Reset,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            _ => return Err(CommandError::Unknown(name.to_string())),
        };
        if value.is_some() {
            return Err(CommandError::UnexpectedValue(keyword));
        }
        Ok(Some(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bedrooms, SpaceCount};

    #[test]
    fn test_blank_and_comment_lines() {
        assert_eq!(Command::parse("").unwrap(), None);
        assert_eq!(Command::parse("   ").unwrap(), None);
        assert_eq!(Command::parse("# a comment").unwrap(), None);
    }

    #[test]
    fn test_selection_commands() {
        assert_eq!(
            Command::parse("bedrooms 3").unwrap(),
            Some(Command::Set(FieldEdit::Bedrooms(Bedrooms::Three)))
        );
        assert_eq!(
            Command::parse("GARAGE none").unwrap(),
            Some(Command::Set(FieldEdit::GarageSpaces(SpaceCount::None)))
        );
    }

    #[test]
    fn test_number_commands_keep_grouped_digits() {
        assert_eq!(
            Command::parse("sqft 1,800").unwrap(),
            Some(Command::Set(FieldEdit::SquareFeet(1800)))
        );
        assert_eq!(
            Command::parse("lot 5 000").unwrap(),
            Some(Command::Set(FieldEdit::LotSize(5000)))
        );
    }

    #[test]
    fn test_flag_commands() {
        assert_eq!(
            Command::parse("corner").unwrap(),
            Some(Command::Toggle(Toggle::CornerLot))
        );
        assert_eq!(
            Command::parse("waterfront toggle").unwrap(),
            Some(Command::Toggle(Toggle::Waterfront))
        );
        assert_eq!(
            Command::parse("corner yes").unwrap(),
            Some(Command::Set(FieldEdit::CornerLot(true)))
        );
        assert!(Command::parse("corner perhaps").is_err());
    }

    #[test]
    fn test_missing_value() {
        let err = Command::parse("bedrooms").unwrap_err();
        assert_eq!(err.to_string(), "`bedrooms` needs a value: bedrooms <1-6>");
    }

    #[test]
    fn test_unknown_and_extra_values() {
        assert_eq!(
            Command::parse("fly away").unwrap_err(),
            CommandError::Unknown("fly".into())
        );
        assert_eq!(
            Command::parse("estimate now").unwrap_err(),
            CommandError::UnexpectedValue("estimate".into())
        );
    }
}
