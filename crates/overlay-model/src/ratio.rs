//! Frame aspect ratios and the ratio expression parser.
//!
//! Ratio requests arrive from the UI as text: either a plain decimal
//! (`"1.5"`) or a fraction (`"16/9"`). Only those two shapes are accepted.

use std::fmt;
use std::str::FromStr;

use framecam_common::error::{FramecamError, FramecamResult};
use serde::{Deserialize, Serialize};

const EXPECTED_SHAPE: &str = "expected <number> or <number>/<number>";

/// Width-over-height ratio of the crop frame. Always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct AspectRatio(f64);

impl AspectRatio {
    /// 1:1.
    pub const SQUARE: AspectRatio = AspectRatio(1.0);

    /// Wrap a raw ratio, rejecting zero, negative, and non-finite values.
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value > 0.0).then_some(Self(value))
    }

    /// The ratio as a plain number.
    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::SQUARE
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<f64> for AspectRatio {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("aspect ratio must be finite and > 0, got {value}"))
    }
}

impl From<AspectRatio> for f64 {
    fn from(ratio: AspectRatio) -> f64 {
        ratio.0
    }
}

impl FromStr for AspectRatio {
    type Err = FramecamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_ratio(s)
    }
}

/// Parse a ratio expression of the form `<number>` or `<number>/<number>`.
///
/// Surrounding whitespace (also around the slash) is ignored. Both operands
/// must be finite and strictly positive; anything else is rejected.
pub fn parse_ratio(input: &str) -> FramecamResult<AspectRatio> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(FramecamError::invalid_ratio(input, "empty expression"));
    }

    let mut parts = trimmed.split('/');
    let numerator = parse_operand(input, parts.next().unwrap_or_default())?;
    let value = match (parts.next(), parts.next()) {
        (None, _) => numerator,
        (Some(denominator), None) => numerator / parse_operand(input, denominator)?,
        (Some(_), Some(_)) => {
            return Err(FramecamError::invalid_ratio(input, EXPECTED_SHAPE));
        }
    };

    AspectRatio::new(value)
        .ok_or_else(|| FramecamError::invalid_ratio(input, "ratio must be finite and > 0"))
}

fn parse_operand(input: &str, operand: &str) -> FramecamResult<f64> {
    let operand = operand.trim();
    // Only plain decimal literals: `f64::from_str` would also take "inf", "NaN", and exponents.
    let plain = !operand.is_empty()
        && operand.chars().all(|c| c.is_ascii_digit() || c == '.')
        && operand.chars().any(|c| c.is_ascii_digit())
        && operand.matches('.').count() <= 1;
    if !plain {
        return Err(FramecamError::invalid_ratio(input, EXPECTED_SHAPE));
    }

    let value: f64 = operand
        .parse()
        .map_err(|_| FramecamError::invalid_ratio(input, EXPECTED_SHAPE))?;
    if value <= 0.0 {
        return Err(FramecamError::invalid_ratio(
            input,
            "operands must be greater than zero",
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratio(s: &str) -> f64 {
        parse_ratio(s).unwrap().get()
    }

    #[test]
    fn test_plain_decimals() {
        assert_eq!(ratio("1"), 1.0);
        assert_eq!(ratio("1.5"), 1.5);
        assert_eq!(ratio(".5"), 0.5);
        assert_eq!(ratio("  2  "), 2.0);
    }

    #[test]
    fn test_fractions() {
        assert!((ratio("16/9") - 16.0 / 9.0).abs() < 1e-12);
        assert!((ratio("3 / 4") - 0.75).abs() < 1e-12);
        assert!((ratio("1.5/1") - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_code_and_garbage() {
        for input in [
            "",
            "   ",
            "alert(1)",
            "4/3/2",
            "4*3",
            "-1",
            "1/-2",
            "0",
            "4/0",
            "0/4",
            "NaN",
            "inf",
            "1e3",
            "1..2",
            ".",
            "/",
            "4/",
            "/3",
            "0x10",
        ] {
            let err = parse_ratio(input).unwrap_err();
            assert!(
                matches!(err, FramecamError::InvalidRatio { .. }),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_from_str_delegates() {
        let r: AspectRatio = "4/3".parse().unwrap();
        assert!((r.get() - 4.0 / 3.0).abs() < 1e-12);
        assert!("nope".parse::<AspectRatio>().is_err());
    }

    #[test]
    fn test_new_rejects_non_positive() {
        assert!(AspectRatio::new(0.0).is_none());
        assert!(AspectRatio::new(-1.0).is_none());
        assert!(AspectRatio::new(f64::NAN).is_none());
        assert!(AspectRatio::new(f64::INFINITY).is_none());
        assert_eq!(AspectRatio::new(2.0).map(AspectRatio::get), Some(2.0));
    }

    #[test]
    fn test_serde_validates() {
        let r: AspectRatio = serde_json::from_str("1.25").unwrap();
        assert_eq!(r.get(), 1.25);
        assert!(serde_json::from_str::<AspectRatio>("0").is_err());
    }
}
