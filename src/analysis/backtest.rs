use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use rayon::prelude::*;
use strum_macros::{Display, EnumString};

use crate::domain::{Combo, DrawRow};
use crate::models::DrawHistory;

/// Prediction heuristics for the backtest.
///
/// Lottery draws are independent, so neither method has any predictive
/// validity; the backtest exists to illustrate how little frequency skew
/// buys you, not to be optimized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum PredictionMethod {
    /// Most frequent combo in the lookback window, ties to the smallest combo
    MostFrequent,
    /// Modal digit per position, ties to the smallest digit
    HotDigits,
}

#[derive(Debug, Clone)]
pub struct PredictionOutcome {
    pub date: NaiveDate,
    pub predicted: Combo,
    pub actual: Combo,
    pub straight_hit: bool,
    pub box_hit: bool,
    /// Running hit rates up to and including this point, for the trend line
    pub cumulative_straight_rate: f64,
    pub cumulative_box_rate: f64,
}

#[derive(Debug, Clone)]
pub struct BacktestReport {
    pub method: PredictionMethod,
    pub window_days: u32,
    pub evaluated: usize,
    /// Draws with too little lookback data to predict
    pub skipped: usize,
    pub straight_hits: usize,
    pub box_hits: usize,
    pub outcomes: Vec<PredictionOutcome>,
}

impl BacktestReport {
    pub fn straight_rate(&self) -> f64 {
        rate(self.straight_hits, self.evaluated)
    }

    pub fn box_rate(&self) -> f64 {
        rate(self.box_hits, self.evaluated)
    }
}

#[derive(Debug, Clone)]
pub enum Backtest {
    Report(BacktestReport),
    InsufficientData { have: usize, need: usize },
}

/// Walk the history chronologically; for every draw with at least
/// `min_draws` draws inside the preceding `window_days`, predict and score.
pub fn backtest(
    history: &DrawHistory,
    window_days: u32,
    method: PredictionMethod,
    min_draws: usize,
) -> Backtest {
    if history.len() < min_draws {
        return Backtest::InsufficientData {
            have: history.len(),
            need: min_draws,
        };
    }

    let mut rows = history.rows.clone();
    rows.sort_by_key(|r| (r.date, r.session));

    // The window search per draw is independent, so evaluate in parallel
    // and stitch the cumulative trend together afterwards.
    let predictions: Vec<Option<(usize, Combo)>> = (0..rows.len())
        .into_par_iter()
        .map(|i| {
            let cutoff = rows[i].date.checked_sub_days(Days::new(u64::from(window_days)))?;
            let start = rows[..i].partition_point(|r| r.date < cutoff);
            let window = &rows[start..i];
            if window.is_empty() || window.len() < min_draws {
                return None;
            }
            Some((i, predict(window, method)))
        })
        .collect();

    let mut outcomes = Vec::new();
    let mut straight_hits = 0usize;
    let mut box_hits = 0usize;
    for (i, predicted) in predictions.into_iter().flatten() {
        let actual = rows[i].combo;
        let straight_hit = predicted == actual;
        let box_hit = predicted.is_box_match(&actual);
        if straight_hit {
            straight_hits += 1;
        }
        if box_hit {
            box_hits += 1;
        }
        let evaluated_so_far = outcomes.len() + 1;
        outcomes.push(PredictionOutcome {
            date: rows[i].date,
            predicted,
            actual,
            straight_hit,
            box_hit,
            cumulative_straight_rate: rate(straight_hits, evaluated_so_far),
            cumulative_box_rate: rate(box_hits, evaluated_so_far),
        });
    }

    let evaluated = outcomes.len();
    Backtest::Report(BacktestReport {
        method,
        window_days,
        evaluated,
        skipped: rows.len() - evaluated,
        straight_hits,
        box_hits,
        outcomes,
    })
}

fn predict(window: &[DrawRow], method: PredictionMethod) -> Combo {
    match method {
        PredictionMethod::MostFrequent => {
            let mut counts: HashMap<Combo, u32> = HashMap::new();
            for row in window {
                *counts.entry(row.combo).or_insert(0) += 1;
            }
            counts
                .into_iter()
                .max_by_key(|&(combo, count)| (count, Reverse(combo)))
                .map(|(combo, _)| combo)
                .unwrap_or_else(|| Combo::from_digits([0; 4]))
        }
        PredictionMethod::HotDigits => {
            let mut counts = [[0u32; 10]; 4];
            for row in window {
                for (position, digit) in row.combo.digits().into_iter().enumerate() {
                    counts[position][usize::from(digit)] += 1;
                }
            }
            let mut digits = [0u8; 4];
            for (position, digit_counts) in counts.iter().enumerate() {
                let mut best = 0usize;
                for (digit, &count) in digit_counts.iter().enumerate() {
                    // Strict comparison keeps the smallest digit on ties
                    if count > digit_counts[best] {
                        best = digit;
                    }
                }
                digits[position] = best as u8;
            }
            Combo::from_digits(digits)
        }
    }
}

fn rate(hits: usize, evaluated: usize) -> f64 {
    if evaluated == 0 {
        0.0
    } else {
        hits as f64 / evaluated as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Session;

    fn row(day: u32, combo: &str) -> DrawRow {
        DrawRow::new(
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            Session::Midday,
            Combo::parse(combo).unwrap(),
        )
    }

    #[test]
    fn test_most_frequent_prediction_with_tie_break() {
        // 0002 and 0001 tie at one appearance each: smallest combo wins
        let window = vec![row(1, "0002"), row(2, "0001")];
        assert_eq!(
            predict(&window, PredictionMethod::MostFrequent).to_string(),
            "0001"
        );

        // A clear majority beats the tie-break
        let window = vec![row(1, "0002"), row(2, "0002"), row(3, "0001")];
        assert_eq!(
            predict(&window, PredictionMethod::MostFrequent).to_string(),
            "0002"
        );
    }

    #[test]
    fn test_hot_digits_prediction() {
        // Positions 1-3 have clear modes; position 4 ties between 4 and 5
        // and resolves to the smaller digit
        let window = vec![row(1, "1234"), row(2, "1235")];
        assert_eq!(
            predict(&window, PredictionMethod::HotDigits).to_string(),
            "1234"
        );
    }

    #[test]
    fn test_insufficient_history() {
        let history = DrawHistory::new("test", 1.0, vec![row(1, "1234")]);
        match backtest(&history, 30, PredictionMethod::MostFrequent, 10) {
            Backtest::InsufficientData { have, need } => {
                assert_eq!(have, 1);
                assert_eq!(need, 10);
            }
            Backtest::Report(_) => panic!("expected insufficient data"),
        }
    }

    #[test]
    fn test_backtest_scores_hits_and_trend() {
        // Window of one day, minimum one draw: each prediction is simply
        // the previous day's combo
        let history = DrawHistory::new(
            "test",
            1.0,
            vec![
                row(1, "1234"),
                row(2, "1234"), // predicted 1234 -> straight hit
                row(3, "4321"), // predicted 1234 -> box hit only
                row(4, "5678"), // predicted 4321 -> miss
            ],
        );
        match backtest(&history, 1, PredictionMethod::MostFrequent, 1) {
            Backtest::Report(report) => {
                assert_eq!(report.evaluated, 3);
                assert_eq!(report.skipped, 1);
                assert_eq!(report.straight_hits, 1);
                assert_eq!(report.box_hits, 2);

                let last = report.outcomes.last().unwrap();
                assert!((last.cumulative_straight_rate - 1.0 / 3.0).abs() < 1e-9);
                assert!((last.cumulative_box_rate - 2.0 / 3.0).abs() < 1e-9);
            }
            Backtest::InsufficientData { .. } => panic!("expected a report"),
        }
    }

    #[test]
    fn test_window_excludes_rows_older_than_cutoff() {
        // Day 20 looks back 1 day: only day 19 is in range, so the stale
        // day-1 combo cannot be predicted
        let history = DrawHistory::new(
            "test",
            1.0,
            vec![row(1, "9999"), row(19, "1111"), row(20, "2222")],
        );
        match backtest(&history, 1, PredictionMethod::MostFrequent, 1) {
            Backtest::Report(report) => {
                assert_eq!(report.evaluated, 1);
                assert_eq!(report.outcomes[0].predicted.to_string(), "1111");
            }
            Backtest::InsufficientData { .. } => panic!("expected a report"),
        }
    }
}
