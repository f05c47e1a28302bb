//! Fixed-point monetary amount with two fractional digits.
//!
//! Costs travel as decimal strings (`"19.99"`) and are normalized to exactly
//! two fractional digits using round-half-up (ties away from zero). Rounding
//! is decided from the source digits alone; no binary float is involved at
//! any point, so the same string always yields the same amount.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DomainError;
use crate::value_object::ValueObject;

/// Amount in hundredths of the currency unit (e.g. cents).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Cost {
    hundredths: i64,
}

impl ValueObject for Cost {}

impl Cost {
    pub const ZERO: Cost = Cost { hundredths: 0 };

    pub fn from_hundredths(hundredths: i64) -> Self {
        Self { hundredths }
    }

    pub fn hundredths(&self) -> i64 {
        self.hundredths
    }

    /// Parse a decimal string and round it half-up to two fractional digits.
    ///
    /// Accepts an optional sign, digits with at most one `.`, and an optional
    /// exponent (`1.5e2`). At least one digit is required.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::invalid_cost(raw);

        let (negative, rest) = match raw.as_bytes().first() {
            Some(b'-') => (true, &raw[1..]),
            Some(b'+') => (false, &raw[1..]),
            _ => (false, raw),
        };

        let (mantissa, exponent) = match rest.find(['e', 'E']) {
            Some(pos) => {
                let exp = &rest[pos + 1..];
                let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid());
                }
                (&rest[..pos], exp.parse::<i32>().map_err(|_| invalid())?)
            }
            None => (rest, 0),
        };

        let (int_part, frac_part) = match mantissa.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (mantissa, ""),
        };
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (int_part.is_empty() && frac_part.is_empty()) || !all_digits(int_part) || !all_digits(frac_part) {
            return Err(invalid());
        }

        // value = digits * 10^(exponent - frac_len); in hundredths shift by two more.
        let digits: Vec<u8> = int_part
            .bytes()
            .chain(frac_part.bytes())
            .map(|b| b - b'0')
            .skip_while(|d| *d == 0)
            .collect();
        if digits.is_empty() {
            return Ok(Cost::ZERO);
        }

        let shift = i64::from(exponent) - frac_part.len() as i64 + 2;
        let magnitude = if shift >= 0 {
            let mut value = accumulate(&digits).ok_or_else(invalid)?;
            for _ in 0..shift {
                value = value.checked_mul(10).ok_or_else(invalid)?;
            }
            value
        } else {
            let dropped = usize::try_from(-shift).map_err(|_| invalid())?;
            if dropped > digits.len() {
                0
            } else {
                let keep = digits.len() - dropped;
                let kept = accumulate(&digits[..keep]).ok_or_else(invalid)?;
                // Half-up only depends on the first discarded digit.
                if digits[keep] >= 5 {
                    kept.checked_add(1).ok_or_else(invalid)?
                } else {
                    kept
                }
            }
        };

        Ok(Cost {
            hundredths: if negative { -magnitude } else { magnitude },
        })
    }

    pub fn checked_add(self, other: Cost) -> Option<Cost> {
        self.hundredths
            .checked_add(other.hundredths)
            .map(Cost::from_hundredths)
    }
}

fn accumulate(digits: &[u8]) -> Option<i64> {
    digits
        .iter()
        .try_fold(0i64, |acc, d| acc.checked_mul(10)?.checked_add(i64::from(*d)))
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abs = self.hundredths.unsigned_abs();
        let sign = if self.hundredths < 0 { "-" } else { "" };
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl FromStr for Cost {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cost::parse(s)
    }
}

impl Serialize for Cost {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Cost {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Cost::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn normalized(raw: &str) -> String {
        Cost::parse(raw).unwrap().to_string()
    }

    #[test]
    fn rounds_half_up_at_two_digits() {
        assert_eq!(normalized("19.995"), "20.00");
        assert_eq!(normalized("0.005"), "0.01");
        assert_eq!(normalized("1.004"), "1.00");
        assert_eq!(normalized("10.005"), "10.01");
        assert_eq!(normalized("2.3449999"), "2.34");
    }

    #[test]
    fn negative_ties_round_away_from_zero() {
        assert_eq!(normalized("-2.345"), "-2.35");
        assert_eq!(normalized("-0.004"), "0.00");
    }

    #[test]
    fn pads_short_inputs() {
        assert_eq!(normalized("5"), "5.00");
        assert_eq!(normalized(".5"), "0.50");
        assert_eq!(normalized("7."), "7.00");
        assert_eq!(normalized("+3.1"), "3.10");
        assert_eq!(normalized("0000.10"), "0.10");
    }

    #[test]
    fn honours_exponent_notation() {
        assert_eq!(normalized("1.5e2"), "150.00");
        assert_eq!(normalized("125E-3"), "0.13");
        assert_eq!(normalized("0E+900"), "0.00");
        assert_eq!(normalized("4e-9"), "0.00");
    }

    #[test]
    fn rejects_malformed_input() {
        for raw in ["", "-", ".", "abc", "1.2.3", "1e", "1e+", " 1", "1,50", "NaN", "1e99999999999"] {
            assert!(
                matches!(Cost::parse(raw), Err(DomainError::InvalidCost(_))),
                "expected {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn rejects_overflow() {
        assert!(Cost::parse("99999999999999999999").is_err());
        assert!(Cost::parse("1e30").is_err());
    }

    #[test]
    fn serializes_as_normalized_string() {
        let cost = Cost::parse("12.5").unwrap();
        assert_eq!(serde_json::to_string(&cost).unwrap(), "\"12.50\"");
        let back: Cost = serde_json::from_str("\"12.505\"").unwrap();
        assert_eq!(back, Cost::from_hundredths(1251));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 512,
            ..ProptestConfig::default()
        })]

        /// Property: a third fractional digit rounds up exactly when it is 5 or more.
        #[test]
        fn third_digit_decides_rounding(units in 0u32..1_000_000u32, cents in 0u32..100u32, extra in 0u32..10u32) {
            let raw = format!("{units}.{cents:02}{extra}");
            let expected = i64::from(units) * 100 + i64::from(cents) + i64::from(extra >= 5);
            prop_assert_eq!(Cost::parse(&raw).unwrap().hundredths(), expected);
        }

        /// Property: rendering then parsing is the identity.
        #[test]
        fn display_parse_round_trip(hundredths in -1_000_000_000i64..1_000_000_000i64) {
            let cost = Cost::from_hundredths(hundredths);
            prop_assert_eq!(Cost::parse(&cost.to_string()).unwrap(), cost);
        }
    }
}
