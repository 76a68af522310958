// In: src/codec/decimal.rs

//! The Decimal Codec.
//!
//! Decimals are stored with Arrow's `Decimal128` semantics: an `i128`
//! coefficient whose value divided by `10^scale` is the logical number.
//! Precision and scale belong to the column, so the handler fixes them once and
//! every value is coerced to exactly that scale on the way in.
//!
//! There is one rounding rule in this module, used for text parsing and for
//! rescaling alike: round half up, i.e. half away from zero on the magnitude.

use std::fmt;
use std::str::FromStr;

use arrow::datatypes::DECIMAL128_MAX_PRECISION;

use crate::error::ConvError;

/// Maximum precision supported by `DecimalValue` (aligns with Arrow's Decimal128).
pub const MAX_DECIMAL_PRECISION: u8 = DECIMAL128_MAX_PRECISION;

/// Native representation of a Decimal128 value: coefficient plus scale.
///
/// Equality is structural. `1.50` (150, 2) and `1.5` (15, 1) are different
/// values here; handlers always rescale to their column scale first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DecimalValue {
    value: i128,
    scale: i8,
}

impl DecimalValue {
    /// Create a decimal from its raw parts, validating scale and digit count.
    pub fn new(value: i128, scale: i8) -> Result<Self, ConvError> {
        if !(0..=MAX_DECIMAL_PRECISION as i8).contains(&scale) {
            return Err(ConvError::ConversionOverflow(format!(
                "decimal scale {} outside 0..={}",
                scale, MAX_DECIMAL_PRECISION
            )));
        }
        let decimal = Self { value, scale };
        if decimal.precision() > MAX_DECIMAL_PRECISION {
            return Err(ConvError::ConversionOverflow(format!(
                "decimal coefficient {} exceeds {} digits",
                value, MAX_DECIMAL_PRECISION
            )));
        }
        Ok(decimal)
    }

    /// Return the scaled integer backing this decimal.
    #[inline]
    pub fn coefficient(self) -> i128 {
        self.value
    }

    /// Return the scale (number of fractional digits).
    #[inline]
    pub fn scale(self) -> i8 {
        self.scale
    }

    /// Number of significant digits in the coefficient (at least 1).
    #[inline]
    pub fn precision(self) -> u8 {
        digit_count(self.value)
    }

    /// Convert the decimal into an `f64`.
    ///
    /// Lossy for high precision inputs. Use it for display only; never compare
    /// a value that went through here against the exact coefficient.
    pub fn to_f64(self) -> f64 {
        if self.value == 0 {
            return 0.0;
        }
        (self.value as f64) / 10_f64.powi(self.scale as i32)
    }

    /// Parses decimal text into exactly `scale` fractional digits.
    ///
    /// Accepts an optional sign, integer digits, and an optional fraction
    /// (`"-12.5"`, `"+3"`, `".25"`). Extra fraction digits are rounded half up.
    pub fn parse_with_scale(text: &str, scale: i8) -> Result<Self, ConvError> {
        let invalid = || ConvError::mismatch(format!("text {:?}", text), "decimal literal");
        let trimmed = text.trim();
        let (negative, unsigned) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };
        let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if !(0..=MAX_DECIMAL_PRECISION as i8).contains(&scale) {
            return Err(ConvError::ConversionOverflow(format!(
                "decimal scale {} outside 0..={}",
                scale, MAX_DECIMAL_PRECISION
            )));
        }

        let scale_digits = scale as usize;
        let overflow = || {
            ConvError::ConversionOverflow(format!("decimal text {:?} does not fit in i128", text))
        };

        let mut magnitude: i128 = 0;
        let kept_fraction = frac_part
            .bytes()
            .chain(std::iter::repeat(b'0'))
            .take(scale_digits);
        for digit in int_part.bytes().chain(kept_fraction) {
            magnitude = magnitude
                .checked_mul(10)
                .and_then(|m| m.checked_add((digit - b'0') as i128))
                .ok_or_else(overflow)?;
        }
        if let Some(&next) = frac_part.as_bytes().get(scale_digits) {
            if next >= b'5' {
                magnitude = magnitude.checked_add(1).ok_or_else(overflow)?;
            }
        }

        Self::new(if negative { -magnitude } else { magnitude }, scale)
    }

    /// Re-expresses the value at `scale`, rounding half up when digits drop.
    pub fn rescale(self, scale: i8) -> Result<Self, ConvError> {
        if scale == self.scale {
            return Ok(self);
        }
        if scale > self.scale {
            let factor = pow10((scale - self.scale) as u32)?;
            let value = self.value.checked_mul(factor).ok_or_else(|| {
                ConvError::ConversionOverflow(format!(
                    "rescaling {} to scale {} overflows i128",
                    self, scale
                ))
            })?;
            return Self::new(value, scale);
        }

        let factor = pow10((self.scale - scale) as u32)?;
        let quotient = self.value / factor;
        let remainder = (self.value % factor).unsigned_abs();
        let round_away = remainder * 2 >= factor.unsigned_abs();
        let value = match (round_away, self.value < 0) {
            (false, _) => quotient,
            (true, false) => quotient + 1,
            (true, true) => quotient - 1,
        };
        Self::new(value, scale)
    }

    /// Fails with `ConversionOverflow` when the coefficient needs more than
    /// `precision` digits.
    pub fn check_precision(self, precision: u8) -> Result<Self, ConvError> {
        if self.value != 0 && self.precision() > precision {
            return Err(ConvError::ConversionOverflow(format!(
                "decimal {} needs {} digits but the column precision is {}",
                self,
                self.precision(),
                precision
            )));
        }
        Ok(self)
    }
}

impl fmt::Display for DecimalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.value);
        }
        let digits = self.value.unsigned_abs().to_string();
        let scale = self.scale as usize;
        if self.value < 0 {
            f.write_str("-")?;
        }
        if digits.len() <= scale {
            f.write_str("0.")?;
            for _ in digits.len()..scale {
                f.write_str("0")?;
            }
            return f.write_str(&digits);
        }
        let split = digits.len() - scale;
        f.write_str(&digits[..split])?;
        f.write_str(".")?;
        f.write_str(&digits[split..])
    }
}

/// Parses at the text's own scale (`"1.50"` has scale 2).
impl FromStr for DecimalValue {
    type Err = ConvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let scale = trimmed.split_once('.').map_or(0, |(_, frac)| frac.len());
        if scale > MAX_DECIMAL_PRECISION as usize {
            return Err(ConvError::ConversionOverflow(format!(
                "decimal text {:?} has more than {} fractional digits",
                s, MAX_DECIMAL_PRECISION
            )));
        }
        Self::parse_with_scale(trimmed, scale as i8)
    }
}

fn digit_count(value: i128) -> u8 {
    value.unsigned_abs().checked_ilog10().map_or(1, |d| d as u8 + 1)
}

fn pow10(exp: u32) -> Result<i128, ConvError> {
    10_i128
        .checked_pow(exp)
        .ok_or_else(|| ConvError::ConversionOverflow(format!("10^{} does not fit in i128", exp)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact_scale() {
        let d = DecimalValue::parse_with_scale("123.45", 2).unwrap();
        assert_eq!(d.coefficient(), 12345);
        assert_eq!(d.scale(), 2);
        assert_eq!(d.to_string(), "123.45");
    }

    #[test]
    fn test_parse_pads_missing_fraction_digits() {
        assert_eq!(DecimalValue::parse_with_scale("7", 2).unwrap().coefficient(), 700);
        assert_eq!(DecimalValue::parse_with_scale("7.5", 3).unwrap().coefficient(), 7500);
        assert_eq!(DecimalValue::parse_with_scale(".25", 2).unwrap().coefficient(), 25);
    }

    #[test]
    fn test_parse_rounds_half_up() {
        assert_eq!(DecimalValue::parse_with_scale("1.005", 2).unwrap().coefficient(), 101);
        assert_eq!(DecimalValue::parse_with_scale("1.0049", 2).unwrap().coefficient(), 100);
        assert_eq!(DecimalValue::parse_with_scale("-1.005", 2).unwrap().coefficient(), -101);
        assert_eq!(DecimalValue::parse_with_scale("0.5", 0).unwrap().coefficient(), 1);
        assert_eq!(DecimalValue::parse_with_scale("9.995", 2).unwrap().to_string(), "10.00");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for text in ["", "-", ".", "1.2.3", "12a", "1e5", " - 1"] {
            let result = DecimalValue::parse_with_scale(text, 2);
            assert!(
                matches!(result, Err(ConvError::TypeMismatch { .. })),
                "expected mismatch for {:?}, got {:?}",
                text,
                result
            );
        }
    }

    #[test]
    fn test_parse_overflow() {
        let huge = "9".repeat(40);
        let result = DecimalValue::parse_with_scale(&huge, 0);
        assert!(matches!(result, Err(ConvError::ConversionOverflow(_))));
    }

    #[test]
    fn test_display_small_and_negative_values() {
        assert_eq!(DecimalValue::new(5, 3).unwrap().to_string(), "0.005");
        assert_eq!(DecimalValue::new(-5, 3).unwrap().to_string(), "-0.005");
        assert_eq!(DecimalValue::new(-12345, 2).unwrap().to_string(), "-123.45");
        assert_eq!(DecimalValue::new(0, 2).unwrap().to_string(), "0.00");
        assert_eq!(DecimalValue::new(42, 0).unwrap().to_string(), "42");
    }

    #[test]
    fn test_from_str_keeps_text_scale() {
        let d: DecimalValue = "1.50".parse().unwrap();
        assert_eq!((d.coefficient(), d.scale()), (150, 2));
    }

    #[test]
    fn test_rescale_up_and_down() {
        let d = DecimalValue::new(15, 1).unwrap(); // 1.5
        assert_eq!(d.rescale(3).unwrap().coefficient(), 1500);
        let d = DecimalValue::new(12345, 3).unwrap(); // 12.345
        assert_eq!(d.rescale(2).unwrap().coefficient(), 1235);
        let d = DecimalValue::new(-12345, 3).unwrap();
        assert_eq!(d.rescale(2).unwrap().coefficient(), -1235);
        let d = DecimalValue::new(12344, 3).unwrap();
        assert_eq!(d.rescale(2).unwrap().coefficient(), 1234);
    }

    #[test]
    fn test_precision_checks() {
        let d = DecimalValue::new(12345, 2).unwrap();
        assert_eq!(d.precision(), 5);
        assert!(d.check_precision(5).is_ok());
        assert!(matches!(
            d.check_precision(4),
            Err(ConvError::ConversionOverflow(_))
        ));
        assert!(DecimalValue::new(0, 0).unwrap().check_precision(1).is_ok());
    }

    #[test]
    fn test_new_rejects_out_of_range_scale() {
        assert!(DecimalValue::new(1, -1).is_err());
        assert!(DecimalValue::new(1, 39).is_err());
    }

    #[test]
    fn test_to_f64_is_display_approximation() {
        let d = DecimalValue::new(12345, 2).unwrap();
        assert!((d.to_f64() - 123.45).abs() < 1e-9);
    }
}
