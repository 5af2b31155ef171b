use std::{fmt, str::FromStr};

use crate::EngineError;

/// Multiplier applied by the compact `k` suffix (`50k` = 50 000).
const THOUSAND: u64 = 1_000;

/// Parses a strictly positive integer.
///
/// The input is taken as is: surrounding whitespace makes it invalid, so
/// `" 3"` is rejected. Arguments come from whitespace-split chat text and never
/// carry any. An explicit leading `+` is accepted. Zero, negative numbers, non-digit text
/// and values overflowing `u64` return `None`.
#[must_use]
pub fn parse_positive_int(value: &str) -> Option<u64> {
    value.parse::<u64>().ok().filter(|parsed| *parsed > 0)
}

/// Parses a bill amount in minor units.
///
/// The input is trimmed first. A trailing `k`/`K` multiplies the preceding
/// positive integer by 1000, so `50k` and `50K` are both `50000`. Whitespace
/// between the number and the suffix (`"5 k"`) is invalid; a whitespace-split
/// argument cannot contain it.
///
/// ```rust
/// use engine::parse_amount;
///
/// assert_eq!(parse_amount("50000"), Some(50_000));
/// assert_eq!(parse_amount(" 50k "), Some(50_000));
/// assert_eq!(parse_amount("k"), None);
/// assert_eq!(parse_amount("0"), None);
/// ```
#[must_use]
pub fn parse_amount(value: &str) -> Option<u64> {
    let raw = value.trim();
    if raw.is_empty() {
        return None;
    }

    match raw.strip_suffix(['k', 'K']) {
        Some(base) => parse_positive_int(base)?.checked_mul(THOUSAND),
        None => parse_positive_int(raw),
    }
}

/// Total of a bill, always strictly positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Amount(u64);

impl Amount {
    /// Returns `None` for zero.
    #[must_use]
    pub const fn new(value: u64) -> Option<Self> {
        if value == 0 { None } else { Some(Self(value)) }
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl FromStr for Amount {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_amount(s)
            .map(Self)
            .ok_or_else(|| EngineError::InvalidAmount(s.to_string()))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of people sharing a bill, always strictly positive.
///
/// Unlike [`Amount`] the `k` suffix is not accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct HeadCount(u64);

impl HeadCount {
    /// Returns `None` for zero.
    #[must_use]
    pub const fn new(value: u64) -> Option<Self> {
        if value == 0 { None } else { Some(Self(value)) }
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl FromStr for HeadCount {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_positive_int(s)
            .map(Self)
            .ok_or_else(|| EngineError::InvalidHeadCount(s.to_string()))
    }
}

impl fmt::Display for HeadCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Share of `total` owed by each of `people`.
///
/// Floor division: the remainder of a non-divisible total is not charged to
/// anyone. `100000 / 3` gives `33333` and the last unit is dropped.
#[must_use]
pub const fn split_evenly(total: Amount, people: HeadCount) -> u64 {
    total.0 / people.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_int_accepts_plain_and_plus_sign() {
        assert_eq!(parse_positive_int("3"), Some(3));
        assert_eq!(parse_positive_int("+3"), Some(3));
        assert_eq!(parse_positive_int("007"), Some(7));
    }

    #[test]
    fn positive_int_rejects_non_positive_and_garbage() {
        for raw in ["0", "-5", "-0", "abc", "", "1.5", " 3", "3k", "99999999999999999999999"] {
            assert_eq!(parse_positive_int(raw), None, "{raw:?} should be invalid");
        }
    }

    #[test]
    fn amount_accepts_k_suffix_case_insensitive() {
        assert_eq!(parse_amount("50000"), Some(50_000));
        assert_eq!(parse_amount("50k"), Some(50_000));
        assert_eq!(parse_amount("50K"), Some(50_000));
        assert_eq!(parse_amount("  12k\t"), Some(12_000));
    }

    #[test]
    fn amount_rejects_invalid_tokens() {
        for raw in ["0", "-1", "", "   ", "k", "K", "abc", "0k", "-5k", "5kk", "5 k"] {
            assert_eq!(parse_amount(raw), None, "{raw:?} should be invalid");
        }
    }

    #[test]
    fn amount_rejects_overflowing_suffix() {
        let raw = format!("{}k", u64::MAX / 10);
        assert_eq!(parse_amount(&raw), None);
    }

    #[test]
    fn typed_parsing_reports_raw_token() {
        assert_eq!("50k".parse::<Amount>().unwrap().get(), 50_000);
        assert_eq!(
            "zero".parse::<Amount>().unwrap_err(),
            EngineError::InvalidAmount("zero".to_string())
        );
        assert_eq!(
            "3k".parse::<HeadCount>().unwrap_err(),
            EngineError::InvalidHeadCount("3k".to_string())
        );
    }

    #[test]
    fn split_drops_remainder() {
        let total = Amount::new(100_000).unwrap();
        assert_eq!(split_evenly(total, HeadCount::new(3).unwrap()), 33_333);
        assert_eq!(split_evenly(total, HeadCount::new(4).unwrap()), 25_000);
        assert_eq!(split_evenly(total, HeadCount::new(1).unwrap()), 100_000);
    }

    #[test]
    fn split_can_round_down_to_zero() {
        let total = Amount::new(2).unwrap();
        assert_eq!(split_evenly(total, HeadCount::new(3).unwrap()), 0);
    }

    #[test]
    fn zero_is_not_constructible() {
        assert_eq!(Amount::new(0), None);
        assert_eq!(HeadCount::new(0), None);
    }
}
