//! Canonical decimal numbers for `N` attributes.
//!
//! Backends transmit numbers as decimal text, so `42`, `42.0` and `4.2e1`
//! all name the same value. [`Number`] normalizes the text into a sign,
//! significant digits and a power of ten, which makes equality numeric and
//! gives every value exactly one textual form.

use std::fmt;
use std::str::FromStr;

use super::error::KeyError;

/// Magnitudes whose plain rendering stays within this many digits are
/// displayed without an exponent.
const PLAIN_DIGIT_LIMIT: i64 = 40;

/// Exponent marker used by the canonical rendering.
const EXPONENT_MARKER: char = 'E';

/// Largest accepted magnitude of the scientific exponent (`d.ddd E x`).
///
/// Backends stay within `E-130..E+125`; anything past this bound is rejected
/// so every accepted value has an exact canonical rendering.
pub const MAX_DECIMAL_EXPONENT: i64 = 10_000;

/// A decimal number in canonical form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Number {
    negative: bool,
    /// Significant digits without leading or trailing zeros; empty for zero.
    digits: String,
    /// Power of ten applied to `digits` read as an integer.
    exponent: i64,
}

impl Number {
    /// Parse decimal text such as `-12.50`, `7` or `1.5e-3`.
    pub fn parse(text: &str) -> Result<Self, KeyError> {
        let invalid = || KeyError::InvalidNumber(text.to_string());

        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };

        let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
            Some((mantissa, exp)) => {
                if exp.is_empty() || exp.starts_with("++") || exp.starts_with("+-") {
                    return Err(invalid());
                }
                (mantissa, exp.parse::<i64>().map_err(|_| invalid())?)
            }
            None => (unsigned, 0),
        };

        let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let frac_len = i64::try_from(frac_part.len()).map_err(|_| invalid())?;
        let exponent = exponent.checked_sub(frac_len).ok_or_else(invalid)?;

        let mut raw = String::with_capacity(int_part.len() + frac_part.len());
        raw.push_str(int_part);
        raw.push_str(frac_part);

        let number = Self::from_parts(negative, &raw, exponent).ok_or_else(invalid)?;
        if !number.is_zero() {
            let exp = number.scientific_exponent().ok_or_else(invalid)?;
            if !(-MAX_DECIMAL_EXPONENT..=MAX_DECIMAL_EXPONENT).contains(&exp) {
                return Err(invalid());
            }
        }
        Ok(number)
    }

    /// Build a number from a digit string and a power of ten, normalizing zeros.
    ///
    /// `None` if the exponent overflows while absorbing trailing zeros.
    fn from_parts(negative: bool, raw_digits: &str, exponent: i64) -> Option<Self> {
        let leading_trimmed = raw_digits.trim_start_matches('0');
        let digits = leading_trimmed.trim_end_matches('0');

        if digits.is_empty() {
            return Some(Self::default());
        }

        let trailing = i64::try_from(leading_trimmed.len() - digits.len()).ok()?;
        Some(Self {
            negative,
            digits: digits.to_string(),
            exponent: exponent.checked_add(trailing)?,
        })
    }

    /// Returns `true` for zero.
    pub fn is_zero(&self) -> bool {
        self.digits.is_empty()
    }

    /// Returns `true` if the value has no fractional part.
    pub fn is_integer(&self) -> bool {
        self.exponent >= 0
    }

    /// The value as an `i64`, if it is an integer in range.
    pub fn to_i64(&self) -> Option<i64> {
        if self.is_integer() {
            self.to_string().parse().ok()
        } else {
            None
        }
    }

    /// The value as the nearest `f64`, if finite.
    pub fn to_f64(&self) -> Option<f64> {
        self.to_string().parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// Number of digits before the decimal point when written out plainly.
    fn point_position(&self) -> Option<i64> {
        i64::try_from(self.digits.len())
            .ok()?
            .checked_add(self.exponent)
    }

    /// Power of ten of the leading digit; `None` for zero.
    fn scientific_exponent(&self) -> Option<i64> {
        if self.is_zero() {
            return None;
        }
        self.point_position()?.checked_sub(1)
    }
}

impl FromStr for Number {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        // Integers absorb at most 19 trailing zeros
        Self::from_parts(value < 0, &value.unsigned_abs().to_string(), 0).unwrap_or_default()
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Self::from_parts(false, &value.to_string(), 0).unwrap_or_default()
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        if self.negative {
            f.write_str("-")?;
        }

        let point = self.point_position().ok_or(fmt::Error)?;

        if self.exponent >= 0 && point <= PLAIN_DIGIT_LIMIT {
            f.write_str(&self.digits)?;
            for _ in 0..self.exponent {
                f.write_str("0")?;
            }
            return Ok(());
        }

        if self.exponent < 0 && point > 0 {
            let split = usize::try_from(point).map_err(|_| fmt::Error)?;
            let (whole, fraction) = self.digits.split_at(split);
            return write!(f, "{}.{}", whole, fraction);
        }

        if self.exponent < 0 && -point < PLAIN_DIGIT_LIMIT {
            f.write_str("0.")?;
            for _ in 0..-point {
                f.write_str("0")?;
            }
            return f.write_str(&self.digits);
        }

        let mut chars = self.digits.chars();
        let first = chars.next().ok_or(fmt::Error)?;
        let rest = chars.as_str();
        let exponent = self.scientific_exponent().ok_or(fmt::Error)?;
        if rest.is_empty() {
            write!(f, "{}{}{}", first, EXPONENT_MARKER, exponent)
        } else {
            write!(f, "{}.{}{}{}", first, rest, EXPONENT_MARKER, exponent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(text: &str) -> Number {
        Number::parse(text).unwrap()
    }

    #[test]
    fn test_parse_integers() {
        assert_eq!(n("42").to_string(), "42");
        assert_eq!(n("-7").to_string(), "-7");
        assert_eq!(n("+7").to_string(), "7");
        assert_eq!(n("1000").to_string(), "1000");
        assert_eq!(n("007").to_string(), "7");
    }

    #[test]
    fn test_numeric_equality() {
        assert_eq!(n("42"), n("42.0"));
        assert_eq!(n("42"), n("4.2e1"));
        assert_eq!(n("0.5"), n(".5"));
        assert_eq!(n("1200"), n("12E2"));
        assert_ne!(n("42"), n("-42"));
        assert_ne!(n("1.5"), n("15"));
    }

    #[test]
    fn test_zero_has_no_sign() {
        assert_eq!(n("-0"), n("0"));
        assert_eq!(n("0.000"), n("0"));
        assert_eq!(n("-0.0e5").to_string(), "0");
        assert!(n("0").is_zero());
    }

    #[test]
    fn test_fractions() {
        assert_eq!(n("-1.50").to_string(), "-1.5");
        assert_eq!(n("0.001").to_string(), "0.001");
        assert_eq!(n("123.456").to_string(), "123.456");
        assert_eq!(n("1e-3").to_string(), "0.001");
    }

    #[test]
    fn test_large_magnitudes_use_exponent() {
        assert_eq!(n("1e100").to_string(), "1E100");
        assert_eq!(n("-1.25e-130").to_string(), "-1.25E-130");
        assert_eq!(n(&n("9.99e125").to_string()), n("9.99e125"));
    }

    #[test]
    fn test_exponent_bound() {
        assert_eq!(n("1e10000").to_string(), "1E10000");
        assert_eq!(n("-1.5e-10000").to_string(), "-1.5E-10000");
        assert_eq!(n("10e9999"), n("1e10000"));
        assert_eq!(n("0e99999999"), n("0"));

        for bad in [
            "1e10001",
            "1e-10001",
            "15e10000",
            "0.1e-10000",
            "1e9223372036854775807",
            "1.5e9223372036854775807",
            "1e-9223372036854775808",
            "1e99999999999999999999",
            "99e9223372036854775806",
        ] {
            assert!(
                matches!(Number::parse(bad), Err(KeyError::InvalidNumber(_))),
                "expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_rejects_non_numbers() {
        for bad in ["", "-", ".", "abc", "1.2.3", "NaN", "Infinity", "0x10", "1e", "1e+", " 1", "1 ", "--1", "1e++2"] {
            assert!(Number::parse(bad).is_err(), "expected '{}' to be rejected", bad);
        }
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Number::from(42i64), n("42"));
        assert_eq!(Number::from(-300i64).to_string(), "-300");
        assert_eq!(Number::from(u64::MAX).to_string(), u64::MAX.to_string());
        assert_eq!(n("42").to_i64(), Some(42));
        assert_eq!(n("4.5").to_i64(), None);
        assert_eq!(n("4.5").to_f64(), Some(4.5));
    }
}
