//! Localized currency rendering for the displayed price.

use crate::models::PriceEstimate;

/// Shown when an amount cannot be rendered (NaN or infinite).
pub const FALLBACK_TEXT: &str = "0.0";

/// Upper bound on rendered fraction digits.
pub const MAX_FRACTION_DIGITS: u8 = 2;

pub const DEFAULT_LOCALE: &str = "en-US";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPosition {
    Prefix,
    Suffix,
}

/// How a locale writes currency amounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub position: SymbolPosition,
    /// Separator between the number and a suffixed symbol.
    pub symbol_spacing: Option<char>,
    pub grouping_separator: char,
    pub decimal_separator: char,
    min_fraction_digits: u8,
    max_fraction_digits: u8,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::prefixed("$", ',', '.')
    }
}

impl CurrencyFormat {
    fn prefixed(symbol: &str, grouping: char, decimal: char) -> Self {
        Self {
            symbol: symbol.to_string(),
            position: SymbolPosition::Prefix,
            symbol_spacing: None,
            grouping_separator: grouping,
            decimal_separator: decimal,
            min_fraction_digits: MAX_FRACTION_DIGITS,
            max_fraction_digits: MAX_FRACTION_DIGITS,
        }
    }

    fn suffixed(symbol: &str, grouping: char, decimal: char) -> Self {
        Self {
            position: SymbolPosition::Suffix,
            symbol_spacing: Some('\u{a0}'),
            ..Self::prefixed(symbol, grouping, decimal)
        }
    }

    /// Preset for a BCP 47 style tag such as `en-US` or `de_DE`.
    pub fn for_locale(tag: &str) -> Option<Self> {
        let tag = tag.trim().replace('_', "-").to_ascii_lowercase();
        let format = match tag.as_str() {
            "en-us" | "en" => Self::prefixed("$", ',', '.'),
            "en-gb" => Self::prefixed("£", ',', '.'),
            "de-de" | "de" => Self::suffixed("€", '.', ','),
            "fr-fr" | "fr" => Self::suffixed("€", '\u{202f}', ','),
            "ja-jp" | "ja" => Self::prefixed("¥", ',', '.').with_fraction_digits(0, 0),
            _ => return None,
        };
        Some(format)
    }

    /// Set the fraction digit range. `max` is capped at two and `min` at `max`.
    pub fn with_fraction_digits(mut self, min: u8, max: u8) -> Self {
        self.max_fraction_digits = max.min(MAX_FRACTION_DIGITS);
        self.min_fraction_digits = min.min(self.max_fraction_digits);
        self
    }

    pub fn fraction_digits(&self) -> (u8, u8) {
        (self.min_fraction_digits, self.max_fraction_digits)
    }

    pub fn format_price(&self, price: PriceEstimate) -> String {
        self.format(price.amount())
    }

    pub fn format(&self, amount: f64) -> String {
        if !amount.is_finite() {
            return FALLBACK_TEXT.to_string();
        }

        let digits = usize::from(self.max_fraction_digits);
        let scale = 10u128.pow(u32::from(self.max_fraction_digits));
        let scaled = round_half_even(amount.abs() * scale as f64);

        // Past u128 range every f64 is a whole number; render its shortest
        // decimal digits instead.
        let (whole, fraction, zero) = if scaled < u128::MAX as f64 {
            let units = scaled as u128;
            ((units / scale).to_string(), units % scale, units == 0)
        } else {
            (amount.abs().to_string(), 0, false)
        };

        let mut number = group_digits(&whole, self.grouping_separator);
        if digits > 0 {
            let mut fraction = format!("{:0width$}", fraction, width = digits);
            while fraction.len() > usize::from(self.min_fraction_digits) && fraction.ends_with('0')
            {
                fraction.pop();
            }
            if !fraction.is_empty() {
                number.push(self.decimal_separator);
                number.push_str(&fraction);
            }
        }

        let sign = if amount < 0.0 && !zero { "-" } else { "" };
        match self.position {
            SymbolPosition::Prefix => format!("{}{}{}", sign, self.symbol, number),
            SymbolPosition::Suffix => {
                let spacing = self.symbol_spacing.map(String::from).unwrap_or_default();
                format!("{}{}{}{}", sign, number, spacing, self.symbol)
            }
        }
    }
}

// Ties go to the even neighbour, like platform currency formatters.
fn round_half_even(x: f64) -> f64 {
    let rounded = x.round();
    if (x - x.trunc()).abs() == 0.5 && rounded % 2.0 != 0.0 {
        rounded - x.signum()
    } else {
        rounded
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_us_dollars() {
        let format = CurrencyFormat::default();
        assert_eq!(format.format(0.0), "$0.00");
        assert_eq!(format.format(328200.0), "$328,200.00");
        assert_eq!(format.format(1234.5), "$1,234.50");
        assert_eq!(format.format(999.999), "$1,000.00");
    }

    #[test]
    fn test_rounds_half_to_even() {
        let format = CurrencyFormat::for_locale("ja-JP").unwrap();
        assert_eq!(format.format(2.5), "¥2");
        assert_eq!(format.format(3.5), "¥4");
        assert_eq!(format.format(1234567.0), "¥1,234,567");
    }

    #[test]
    fn test_suffixed_locales() {
        let de = CurrencyFormat::for_locale("de_DE").unwrap();
        assert_eq!(de.format(1234.5), "1.234,50\u{a0}€");

        let fr = CurrencyFormat::for_locale("fr-FR").unwrap();
        assert_eq!(fr.format(1234.5), "1\u{202f}234,50\u{a0}€");
    }

    #[test]
    fn test_negative_amounts() {
        let format = CurrencyFormat::default();
        assert_eq!(format.format(-12.0), "-$12.00");
        assert_eq!(format.format(-0.001), "$0.00");
    }

    #[test]
    fn test_trailing_zeros_trimmed_to_minimum() {
        let format = CurrencyFormat::default().with_fraction_digits(0, 2);
        assert_eq!(format.format(10.0), "$10");
        assert_eq!(format.format(10.5), "$10.5");
        assert_eq!(format.format(10.25), "$10.25");
    }

    #[test]
    fn test_fraction_digits_capped_at_two() {
        let format = CurrencyFormat::default().with_fraction_digits(5, 9);
        assert_eq!(format.fraction_digits(), (2, 2));
        assert_eq!(format.format(1.23456), "$1.23");
    }

    #[test]
    fn test_non_finite_uses_fallback() {
        let format = CurrencyFormat::default();
        assert_eq!(format.format(f64::NAN), FALLBACK_TEXT);
        assert_eq!(format.format(f64::INFINITY), FALLBACK_TEXT);
    }

    #[test]
    fn test_amounts_beyond_u128_keep_their_digits() {
        let format = CurrencyFormat::default();
        assert_eq!(format.format(1e40), format!("$10{}.00", ",000".repeat(13)));
        assert_eq!(format.format(-1e39), format!("-$1{}.00", ",000".repeat(13)));
        assert_ne!(format.format(1e39), format.format(1e40));

        let de = CurrencyFormat::for_locale("de-DE").unwrap();
        assert_eq!(de.format(1e40), format!("10{},00\u{a0}€", ".000".repeat(13)));
    }

    #[test]
    fn test_unknown_locale() {
        assert!(CurrencyFormat::for_locale("xx-YY").is_none());
    }
}
