use std::collections::HashMap;

use crate::domain::{Combo, DrawRow};

/// Position × digit counts for the heatmap: `counts[position][digit]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitFrequencyTable {
    pub counts: [[u32; 10]; 4],
    pub total_draws: usize,
}

impl DigitFrequencyTable {
    /// Count for a 1-based position and a digit value.
    pub fn count(&self, position: usize, digit: u8) -> u32 {
        self.counts[position - 1][usize::from(digit)]
    }
}

/// O(rows) sweep over every draw's four positions.
pub fn digit_frequency_table(rows: &[DrawRow]) -> DigitFrequencyTable {
    let mut counts = [[0u32; 10]; 4];
    for row in rows {
        for (position, digit) in row.combo.digits().into_iter().enumerate() {
            counts[position][usize::from(digit)] += 1;
        }
    }
    DigitFrequencyTable {
        counts,
        total_draws: rows.len(),
    }
}

/// Histogram of d1+d2+d3+d4 over the full domain 0..=36.
pub fn digit_sum_distribution(rows: &[DrawRow]) -> [u32; 37] {
    let mut histogram = [0u32; 37];
    for row in rows {
        histogram[usize::from(row.combo.digit_sum())] += 1;
    }
    histogram
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComboCount {
    pub combo: Combo,
    pub count: u32,
}

/// Frequency of each distinct observed combo, most frequent first.
/// Ties are broken by ascending combo value so rankings are deterministic.
pub fn combo_frequency(rows: &[DrawRow]) -> Vec<ComboCount> {
    let mut counts: HashMap<Combo, u32> = HashMap::new();
    for row in rows {
        *counts.entry(row.combo).or_insert(0) += 1;
    }

    let mut ranking: Vec<ComboCount> = counts
        .into_iter()
        .map(|(combo, count)| ComboCount { combo, count })
        .collect();
    ranking.sort_by(|a, b| b.count.cmp(&a.count).then(a.combo.cmp(&b.combo)));
    ranking
}

pub fn top_n(rows: &[DrawRow], n: usize) -> Vec<ComboCount> {
    let mut ranking = combo_frequency(rows);
    ranking.truncate(n);
    ranking
}

/// Least frequent among combos that have actually been drawn; never-drawn
/// combos are not listed (9,000+ of them would drown the table).
pub fn bottom_n(rows: &[DrawRow], n: usize) -> Vec<ComboCount> {
    let mut ranking = combo_frequency(rows);
    ranking.sort_by(|a, b| a.count.cmp(&b.count).then(a.combo.cmp(&b.combo)));
    ranking.truncate(n);
    ranking
}
