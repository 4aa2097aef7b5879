use std::fmt;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::config::PAYOUTS;

/// A Win 4 combination: four digits, each 0-9, order significant.
///
/// Stored as raw digits rather than a string so ordering, hashing and box
/// (multiset) comparisons stay allocation-free. Serialized as the familiar
/// zero-padded 4-character string (e.g. "0042").
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Combo {
    digits: [u8; 4],
}

impl Combo {
    /// Strict constructor for already-normalized input: exactly four ASCII
    /// digits after trimming. Watchlist files and cached draws go through
    /// here, so anything shorter is a data error rather than padding fodder.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.len() != 4 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            bail!("combo {:?} must be exactly 4 digits", input);
        }
        Self::from_raw(trimmed)
    }

    /// Lenient constructor for raw API values: 1-4 ASCII digits are
    /// left-padded with zeros ("5" becomes "0005"). The source sometimes
    /// serves float-shaped values like "123.0", so a trailing ".0" fraction
    /// is stripped first. Anything else (non-digits, more than four digits)
    /// is rejected so the caller can drop the row instead of fabricating one.
    pub fn from_raw(input: &str) -> Result<Self> {
        let mut value = input.trim();
        if let Some((integer_part, fraction)) = value.split_once('.') {
            if !fraction.is_empty() && fraction.bytes().any(|b| b != b'0') {
                bail!("combo {:?} has a non-zero fractional part", input);
            }
            value = integer_part;
        }

        if value.is_empty() || value.len() > 4 {
            bail!("combo {:?} must have 1 to 4 digits", input);
        }
        if !value.bytes().all(|b| b.is_ascii_digit()) {
            bail!("combo {:?} contains non-digit characters", input);
        }

        let mut digits = [0u8; 4];
        let pad = 4 - value.len();
        for (i, b) in value.bytes().enumerate() {
            digits[pad + i] = b - b'0';
        }
        Ok(Combo { digits })
    }

    /// Build a combo directly from digit values. Values above 9 are clamped
    /// by taking the last decimal digit; callers constructing from counting
    /// loops always pass 0-9.
    pub fn from_digits(digits: [u8; 4]) -> Self {
        Combo {
            digits: digits.map(|d| d % 10),
        }
    }

    pub fn digits(&self) -> [u8; 4] {
        self.digits
    }

    /// Numeric value 0..=9999
    pub fn value(&self) -> u16 {
        self.digits
            .iter()
            .fold(0u16, |acc, &d| acc * 10 + u16::from(d))
    }

    /// Sum of the four digits, domain 0..=36
    pub fn digit_sum(&self) -> u8 {
        self.digits.iter().sum()
    }

    /// Digits in ascending order; equal sorted digits means a box match.
    pub fn sorted_digits(&self) -> [u8; 4] {
        let mut sorted = self.digits;
        sorted.sort_unstable();
        sorted
    }

    pub fn is_box_match(&self, other: &Combo) -> bool {
        self.sorted_digits() == other.sorted_digits()
    }

    /// d1 == d4
    pub fn mirror_ends(&self) -> bool {
        self.digits[0] == self.digits[3]
    }

    /// d2 == d3
    pub fn mirror_middle(&self) -> bool {
        self.digits[1] == self.digits[2]
    }

    /// Reads the same forwards and backwards (both mirror flags)
    pub fn is_palindrome(&self) -> bool {
        self.mirror_ends() && self.mirror_middle()
    }

    /// Classify by the multiset of digit multiplicities.
    pub fn box_type(&self) -> BoxType {
        let mut counts = [0u8; 10];
        for &d in &self.digits {
            counts[usize::from(d)] += 1;
        }
        let mut multiplicities: Vec<u8> = counts.iter().copied().filter(|&c| c > 0).collect();
        multiplicities.sort_unstable_by(|a, b| b.cmp(a));

        match multiplicities.as_slice() {
            [4] => BoxType::OneWay,
            [3, 1] => BoxType::FourWay,
            [2, 2] => BoxType::SixWay,
            [2, 1, 1] => BoxType::TwelveWay,
            _ => BoxType::TwentyFourWay,
        }
    }

    /// Box payout for a $1 bet. A quad has no separate box play, so it pays
    /// the straight amount.
    pub fn box_payout(&self) -> u32 {
        match self.box_type() {
            BoxType::TwentyFourWay => PAYOUTS.box_24,
            BoxType::TwelveWay => PAYOUTS.box_12,
            BoxType::SixWay => PAYOUTS.box_6,
            BoxType::FourWay => PAYOUTS.box_4,
            BoxType::OneWay => PAYOUTS.straight,
        }
    }
}

impl fmt::Display for Combo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            self.digits[0], self.digits[1], self.digits[2], self.digits[3]
        )
    }
}

impl fmt::Debug for Combo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Combo({})", self)
    }
}

impl TryFrom<String> for Combo {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Combo::parse(&value).map_err(|e| e.to_string())
    }
}

impl From<Combo> for String {
    fn from(combo: Combo) -> Self {
        combo.to_string()
    }
}

/// Box classification of a combo: how many distinct orderings its digit
/// multiset admits. Declaration order matches decreasing likelihood
/// (ABCD first), which the pattern-distribution table relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum BoxType {
    #[strum(serialize = "24-way")]
    TwentyFourWay,
    #[strum(serialize = "12-way")]
    TwelveWay,
    #[strum(serialize = "6-way")]
    SixWay,
    #[strum(serialize = "4-way")]
    FourWay,
    #[strum(serialize = "1-way")]
    OneWay,
}

impl BoxType {
    /// Number of distinct digit orderings.
    pub fn ways(&self) -> u32 {
        match self {
            BoxType::TwentyFourWay => 24,
            BoxType::TwelveWay => 12,
            BoxType::SixWay => 6,
            BoxType::FourWay => 4,
            BoxType::OneWay => 1,
        }
    }

    /// Letter-pattern label, e.g. "AABC" for one pair.
    pub fn pattern_label(&self) -> &'static str {
        match self {
            BoxType::TwentyFourWay => "ABCD",
            BoxType::TwelveWay => "AABC",
            BoxType::SixWay => "AABB",
            BoxType::FourWay => "AAAB",
            BoxType::OneWay => "AAAA",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BoxType::TwentyFourWay => "All Unique",
            BoxType::TwelveWay => "One Pair",
            BoxType::SixWay => "Two Pairs",
            BoxType::FourWay => "Triple",
            BoxType::OneWay => "Quad",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn combo(s: &str) -> Combo {
        Combo::parse(s).unwrap()
    }

    #[test]
    fn test_from_raw_pads_short_values() {
        assert_eq!(Combo::from_raw("5").unwrap().to_string(), "0005");
        assert_eq!(Combo::from_raw("42").unwrap().to_string(), "0042");
        assert_eq!(Combo::from_raw("1234").unwrap().to_string(), "1234");
        // Padding preserves the numeric value
        assert_eq!(Combo::from_raw("5").unwrap().value(), 5);
        assert_eq!(Combo::from_raw("0042").unwrap().value(), 42);
    }

    #[test]
    fn test_from_raw_strips_float_tail() {
        assert_eq!(Combo::from_raw("123.0").unwrap().to_string(), "0123");
        assert!(Combo::from_raw("123.5").is_err());
    }

    #[test]
    fn test_from_raw_rejects_bad_input() {
        assert!(Combo::from_raw("").is_err());
        assert!(Combo::from_raw("12a4").is_err());
        assert!(Combo::from_raw("12345").is_err());
        assert!(Combo::from_raw("-123").is_err());
    }

    #[test]
    fn test_parse_requires_four_digits() {
        assert!(Combo::parse("5").is_err());
        assert!(Combo::parse("0005").is_ok());
    }

    #[test]
    fn test_box_type_classification() {
        assert_eq!(combo("1234").box_type(), BoxType::TwentyFourWay);
        assert_eq!(combo("1123").box_type(), BoxType::TwelveWay);
        assert_eq!(combo("1212").box_type(), BoxType::SixWay);
        assert_eq!(combo("1112").box_type(), BoxType::FourWay);
        assert_eq!(combo("1111").box_type(), BoxType::OneWay);
    }

    #[test]
    fn test_box_type_is_permutation_invariant() {
        let perms = ["1123", "1213", "2311", "3112", "1132"];
        for p in perms {
            assert_eq!(combo(p).box_type(), BoxType::TwelveWay, "perm {}", p);
        }
    }

    #[test]
    fn test_box_type_covers_every_combo() {
        // Every one of the 10,000 combos lands in exactly one category
        let mut totals = std::collections::HashMap::new();
        for v in 0..10_000u16 {
            let c = Combo::from_raw(&v.to_string()).unwrap();
            *totals.entry(c.box_type()).or_insert(0u32) += 1;
        }
        assert_eq!(totals.len(), BoxType::iter().count());
        // Counting argument: 10 quads, 90 * 4/... checked as known totals
        assert_eq!(totals[&BoxType::OneWay], 10);
        assert_eq!(totals[&BoxType::FourWay], 360);
        assert_eq!(totals[&BoxType::SixWay], 270);
        assert_eq!(totals[&BoxType::TwelveWay], 4320);
        assert_eq!(totals[&BoxType::TwentyFourWay], 5040);
    }

    #[test]
    fn test_ways_counts_distinct_orderings() {
        use itertools::Itertools;
        for s in ["1234", "1123", "1212", "1112", "1111"] {
            let c = combo(s);
            let distinct_orderings = c.digits().into_iter().permutations(4).unique().count();
            assert_eq!(c.box_type().ways() as usize, distinct_orderings, "combo {}", s);
        }
    }

    #[test]
    fn test_mirror_flags() {
        // Digits 1,2,1,2: d1 != d4 and d2 != d3
        let c = combo("1212");
        assert!(!c.mirror_ends());
        assert!(!c.mirror_middle());
        assert!(!c.is_palindrome());

        let p = combo("1221");
        assert!(p.mirror_ends());
        assert!(p.mirror_middle());
        assert!(p.is_palindrome());
    }

    #[test]
    fn test_digit_sum_and_ordering() {
        assert_eq!(combo("0000").digit_sum(), 0);
        assert_eq!(combo("9999").digit_sum(), 36);
        assert_eq!(combo("1234").digit_sum(), 10);
        assert!(combo("0005") < combo("0042"));
        assert!(combo("1000") < combo("9999"));
    }

    #[test]
    fn test_serde_round_trip() {
        let c = combo("0042");
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"0042\"");
        let back: Combo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_box_payout_table() {
        assert_eq!(combo("1234").box_payout(), 208);
        assert_eq!(combo("1123").box_payout(), 416);
        assert_eq!(combo("1122").box_payout(), 833);
        assert_eq!(combo("1112").box_payout(), 1250);
        assert_eq!(combo("1111").box_payout(), 5000);
    }
}
