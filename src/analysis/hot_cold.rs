use std::collections::HashMap;

use chrono::NaiveDate;

use crate::config::analysis::HotColdSettings;
use crate::domain::Combo;
use crate::models::DrawHistory;

/// One scored combo from the recent window.
#[derive(Debug, Clone)]
pub struct ComboScore {
    pub combo: Combo,
    pub count: u32,
    /// Midrank frequency percentile among distinct combos in the window
    pub percentile: f64,
    pub last_seen: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct HotColdReport {
    pub window_days: u32,
    pub draws_in_window: usize,
    /// Percentile at or above the hot threshold, most frequent first
    pub hot: Vec<ComboScore>,
    /// Percentile at or below the cold threshold, least frequent first
    pub cold: Vec<ComboScore>,
}

/// Hot/cold is only meaningful with enough draws in the window; below the
/// minimum the caller gets this state instead of a misleading score.
#[derive(Debug, Clone)]
pub enum HotCold {
    Report(HotColdReport),
    InsufficientData { have: usize, need: usize },
}

pub fn hot_cold(history: &DrawHistory, window_days: u32, settings: &HotColdSettings) -> HotCold {
    let window = history.recent_window(window_days);
    if window.len() < settings.min_draws_for_analysis {
        return HotCold::InsufficientData {
            have: window.len(),
            need: settings.min_draws_for_analysis,
        };
    }

    let mut counts: HashMap<Combo, (u32, NaiveDate)> = HashMap::new();
    for row in &window.rows {
        let entry = counts.entry(row.combo).or_insert((0, row.date));
        entry.0 += 1;
        entry.1 = entry.1.max(row.date);
    }

    let mut sorted_counts: Vec<u32> = counts.values().map(|&(count, _)| count).collect();
    sorted_counts.sort_unstable();
    let distinct = sorted_counts.len() as f64;

    let mut hot = Vec::new();
    let mut cold = Vec::new();
    for (&combo, &(count, last_seen)) in &counts {
        // Midrank percentile: count strictly below plus half the ties.
        // With a single distinct count everything sits at 50, so nothing
        // qualifies as hot or cold and the two sets stay disjoint.
        let below = sorted_counts.partition_point(|&c| c < count);
        let at_or_below = sorted_counts.partition_point(|&c| c <= count);
        let percentile =
            100.0 * (below as f64 + 0.5 * (at_or_below - below) as f64) / distinct;

        let score = ComboScore {
            combo,
            count,
            percentile,
            last_seen,
        };
        if percentile >= settings.hot_threshold_percentile {
            hot.push(score);
        } else if percentile <= settings.cold_threshold_percentile {
            cold.push(score);
        }
    }

    hot.sort_by(|a, b| b.count.cmp(&a.count).then(a.combo.cmp(&b.combo)));
    cold.sort_by(|a, b| a.count.cmp(&b.count).then(a.combo.cmp(&b.combo)));

    HotCold::Report(HotColdReport {
        window_days,
        draws_in_window: window.len(),
        hot,
        cold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DrawRow, Session};
    use std::collections::HashSet;

    fn settings() -> HotColdSettings {
        HotColdSettings {
            hot_threshold_percentile: 75.0,
            cold_threshold_percentile: 25.0,
            min_draws_for_analysis: 10,
        }
    }

    fn history(combos: &[&str]) -> DrawHistory {
        let rows = combos
            .iter()
            .enumerate()
            .map(|(i, c)| {
                DrawRow::new(
                    NaiveDate::from_ymd_opt(2024, 1, 1 + (i as u32 % 20)).unwrap(),
                    Session::Midday,
                    Combo::parse(c).unwrap(),
                )
            })
            .collect();
        DrawHistory::new("test", 1.0, rows)
    }

    #[test]
    fn test_insufficient_data_below_minimum() {
        let h = history(&["1234", "5678", "0001"]);
        match hot_cold(&h, 30, &settings()) {
            HotCold::InsufficientData { have, need } => {
                assert_eq!(have, 3);
                assert_eq!(need, 10);
            }
            HotCold::Report(_) => panic!("expected insufficient data"),
        }
    }

    #[test]
    fn test_skewed_counts_split_hot_and_cold() {
        // Counts: 0001 x4, 0002 x3, 0003 x2, 0004 x1 -> percentiles 87.5 / 62.5 / 37.5 / 12.5
        let h = history(&[
            "0001", "0001", "0001", "0001", "0002", "0002", "0002", "0003", "0003", "0004",
        ]);
        match hot_cold(&h, 30, &settings()) {
            HotCold::Report(report) => {
                assert_eq!(report.draws_in_window, 10);
                let hot: Vec<String> = report.hot.iter().map(|s| s.combo.to_string()).collect();
                let cold: Vec<String> = report.cold.iter().map(|s| s.combo.to_string()).collect();
                assert_eq!(hot, vec!["0001"]);
                assert_eq!(cold, vec!["0004"]);
            }
            HotCold::InsufficientData { .. } => panic!("expected a report"),
        }
    }

    #[test]
    fn test_uniform_counts_have_neither_hot_nor_cold() {
        let h = history(&[
            "0001", "0002", "0003", "0004", "0005", "0006", "0007", "0008", "0009", "0010",
        ]);
        match hot_cold(&h, 30, &settings()) {
            HotCold::Report(report) => {
                assert!(report.hot.is_empty());
                assert!(report.cold.is_empty());
            }
            HotCold::InsufficientData { .. } => panic!("expected a report"),
        }
    }

    #[test]
    fn test_hot_and_cold_sets_are_disjoint() {
        let h = history(&[
            "0001", "0001", "0001", "0002", "0002", "0003", "0003", "0004", "0005", "0006",
            "0007", "0008",
        ]);
        if let HotCold::Report(report) = hot_cold(&h, 30, &settings()) {
            let hot: HashSet<Combo> = report.hot.iter().map(|s| s.combo).collect();
            let cold: HashSet<Combo> = report.cold.iter().map(|s| s.combo).collect();
            assert!(hot.is_disjoint(&cold));
        } else {
            panic!("expected a report");
        }
    }
}
