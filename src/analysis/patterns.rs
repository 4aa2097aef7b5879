use std::collections::HashMap;

use itertools::Itertools;
use strum::IntoEnumIterator;

use crate::domain::{BoxType, DrawRow};

#[derive(Debug, Clone, PartialEq)]
pub struct PatternShare {
    pub box_type: BoxType,
    pub count: usize,
    pub pct: f64,
}

/// Share of each box type across the draws, in fixed ABCD -> AAAA order.
pub fn pattern_distribution(rows: &[DrawRow]) -> Vec<PatternShare> {
    let mut counts: HashMap<BoxType, usize> = HashMap::new();
    for row in rows {
        *counts.entry(row.combo.box_type()).or_insert(0) += 1;
    }

    BoxType::iter()
        .map(|box_type| {
            let count = counts.get(&box_type).copied().unwrap_or(0);
            PatternShare {
                box_type,
                count,
                pct: percentage(count, rows.len()),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorAnalysis {
    pub total: usize,
    /// d1 == d4
    pub mirror_ends: usize,
    /// d2 == d3
    pub mirror_middle: usize,
    /// Both flags: reads the same backwards
    pub palindromes: usize,
}

impl MirrorAnalysis {
    pub fn mirror_ends_pct(&self) -> f64 {
        percentage(self.mirror_ends, self.total)
    }

    pub fn mirror_middle_pct(&self) -> f64 {
        percentage(self.mirror_middle, self.total)
    }

    pub fn palindrome_pct(&self) -> f64 {
        percentage(self.palindromes, self.total)
    }
}

pub fn mirror_analysis(rows: &[DrawRow]) -> MirrorAnalysis {
    let mut analysis = MirrorAnalysis {
        total: rows.len(),
        mirror_ends: 0,
        mirror_middle: 0,
        palindromes: 0,
    };
    for row in rows {
        if row.combo.mirror_ends() {
            analysis.mirror_ends += 1;
        }
        if row.combo.mirror_middle() {
            analysis.mirror_middle += 1;
        }
        if row.combo.is_palindrome() {
            analysis.palindromes += 1;
        }
    }
    analysis
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionPairRepeat {
    /// 1-based position pair, e.g. (1, 4) for the outer digits
    pub positions: (usize, usize),
    pub count: usize,
    pub fraction: f64,
}

/// For every unordered position pair, the fraction of draws where the two
/// positions carry the same digit.
pub fn repeat_analysis(rows: &[DrawRow]) -> Vec<PositionPairRepeat> {
    (0..4usize)
        .tuple_combinations()
        .map(|(i, j)| {
            let count = rows
                .iter()
                .filter(|row| {
                    let digits = row.combo.digits();
                    digits[i] == digits[j]
                })
                .count();
            PositionPairRepeat {
                positions: (i + 1, j + 1),
                count,
                fraction: if rows.is_empty() {
                    0.0
                } else {
                    count as f64 / rows.len() as f64
                },
            }
        })
        .collect()
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * count as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Combo, Session};
    use chrono::NaiveDate;

    fn rows(combos: &[&str]) -> Vec<DrawRow> {
        combos
            .iter()
            .map(|c| {
                DrawRow::new(
                    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                    Session::Midday,
                    Combo::parse(c).unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn test_pattern_distribution_order_and_counts() {
        let shares = pattern_distribution(&rows(&["1234", "1123", "1122", "1112", "1111"]));
        let kinds: Vec<BoxType> = shares.iter().map(|s| s.box_type).collect();
        assert_eq!(
            kinds,
            vec![
                BoxType::TwentyFourWay,
                BoxType::TwelveWay,
                BoxType::SixWay,
                BoxType::FourWay,
                BoxType::OneWay
            ]
        );
        assert!(shares.iter().all(|s| s.count == 1));
        assert!(shares.iter().all(|s| (s.pct - 20.0).abs() < 1e-9));
    }

    #[test]
    fn test_pattern_distribution_lists_absent_types() {
        let shares = pattern_distribution(&rows(&["1234"]));
        assert_eq!(shares.len(), 5);
        assert_eq!(shares[0].count, 1);
        assert!(shares[1..].iter().all(|s| s.count == 0));
    }

    #[test]
    fn test_mirror_analysis_counts() {
        // 1221: palindrome; 1231: ends only; 1334: middle only; 1234: neither
        let analysis = mirror_analysis(&rows(&["1221", "1231", "1334", "1234"]));
        assert_eq!(analysis.mirror_ends, 2);
        assert_eq!(analysis.mirror_middle, 2);
        assert_eq!(analysis.palindromes, 1);
        assert!((analysis.palindrome_pct() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_repeat_analysis_covers_all_six_pairs() {
        let repeats = repeat_analysis(&rows(&["1212", "1111"]));
        assert_eq!(repeats.len(), 6);

        let pair = |p: (usize, usize)| repeats.iter().find(|r| r.positions == p).unwrap();
        // 1212: positions (1,3) and (2,4) repeat; 1111: all pairs repeat
        assert_eq!(pair((1, 3)).count, 2);
        assert_eq!(pair((2, 4)).count, 2);
        assert_eq!(pair((1, 2)).count, 1);
        assert!((pair((1, 3)).fraction - 1.0).abs() < 1e-9);
        assert!((pair((1, 2)).fraction - 0.5).abs() < 1e-9);
    }
}
