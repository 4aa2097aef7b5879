use chrono::NaiveDate;
use strum::IntoEnumIterator;

use crate::domain::{BoxType, Combo, DrawRow, Session};

/// Straight and box match statistics for one candidate combo against a
/// draw set. A straight match is also a box match by construction.
#[derive(Debug, Clone)]
pub struct MatchReport {
    pub combo: Combo,
    pub box_type: BoxType,
    /// Box payout for a $1 bet on this combo
    pub box_payout: u32,
    pub straight_hits: usize,
    pub box_hits: usize,
    pub straight_by_session: Vec<(Session, usize)>,
    pub box_by_session: Vec<(Session, usize)>,
    pub last_seen_straight: Option<NaiveDate>,
    pub last_seen_box: Option<NaiveDate>,
}

pub fn check_combo(combo: Combo, rows: &[DrawRow]) -> MatchReport {
    let target_sorted = combo.sorted_digits();

    let mut straight_by_session: Vec<(Session, usize)> =
        Session::iter().map(|s| (s, 0)).collect();
    let mut box_by_session: Vec<(Session, usize)> = Session::iter().map(|s| (s, 0)).collect();
    let mut last_seen_straight: Option<NaiveDate> = None;
    let mut last_seen_box: Option<NaiveDate> = None;

    for row in rows {
        let is_box = row.combo.sorted_digits() == target_sorted;
        if !is_box {
            continue;
        }

        let slot = Session::iter().position(|s| s == row.session).unwrap_or(0);
        box_by_session[slot].1 += 1;
        last_seen_box = Some(last_seen_box.map_or(row.date, |d| d.max(row.date)));

        if row.combo == combo {
            straight_by_session[slot].1 += 1;
            last_seen_straight = Some(last_seen_straight.map_or(row.date, |d| d.max(row.date)));
        }
    }

    MatchReport {
        combo,
        box_type: combo.box_type(),
        box_payout: combo.box_payout(),
        straight_hits: straight_by_session.iter().map(|(_, n)| n).sum(),
        box_hits: box_by_session.iter().map(|(_, n)| n).sum(),
        straight_by_session,
        box_by_session,
        last_seen_straight,
        last_seen_box,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn row(date: (i32, u32, u32), session: Session, combo: &str) -> DrawRow {
        DrawRow::new(
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            session,
            Combo::parse(combo).unwrap(),
        )
    }

    fn fixture() -> Vec<DrawRow> {
        vec![
            row((2024, 1, 1), Session::Midday, "1234"),
            row((2024, 1, 1), Session::Evening, "4321"),
            row((2024, 1, 2), Session::Midday, "1234"),
            row((2024, 1, 2), Session::Evening, "5678"),
            row((2024, 1, 3), Session::Midday, "2143"),
        ]
    }

    #[test]
    fn test_straight_and_box_counts() {
        let report = check_combo(Combo::parse("1234").unwrap(), &fixture());
        assert_eq!(report.straight_hits, 2);
        assert_eq!(report.box_hits, 4); // 1234 x2, 4321, 2143
        assert_eq!(report.box_type, BoxType::TwentyFourWay);
        assert_eq!(report.box_payout, 208);
    }

    #[test]
    fn test_straight_match_implies_box_match() {
        for candidate in ["1234", "4321", "5678", "1111"] {
            let report = check_combo(Combo::parse(candidate).unwrap(), &fixture());
            assert!(report.straight_hits <= report.box_hits);
        }
    }

    #[test]
    fn test_session_breakdown_and_last_seen() {
        let report = check_combo(Combo::parse("1234").unwrap(), &fixture());
        assert_eq!(report.straight_by_session[0], (Session::Midday, 2));
        assert_eq!(report.straight_by_session[1], (Session::Evening, 0));
        assert_eq!(report.box_by_session[0], (Session::Midday, 3));
        assert_eq!(report.box_by_session[1], (Session::Evening, 1));
        assert_eq!(
            report.last_seen_straight,
            NaiveDate::from_ymd_opt(2024, 1, 2)
        );
        assert_eq!(report.last_seen_box, NaiveDate::from_ymd_opt(2024, 1, 3));
    }

    #[test]
    fn test_box_count_equals_permutation_straight_matches() {
        // Box matches of c must equal the summed straight matches of the
        // distinct permutations of c's digits
        let rows = fixture();
        let combo = Combo::parse("1234").unwrap();
        let report = check_combo(combo, &rows);

        let permutation_hits: usize = combo
            .digits()
            .into_iter()
            .permutations(4)
            .unique()
            .map(|perm| {
                let s: String = perm.into_iter().map(|d| d.to_string()).collect();
                check_combo(Combo::parse(&s).unwrap(), &rows).straight_hits
            })
            .sum();
        assert_eq!(report.box_hits, permutation_hits);
    }

    #[test]
    fn test_no_matches() {
        let report = check_combo(Combo::parse("0000").unwrap(), &fixture());
        assert_eq!(report.straight_hits, 0);
        assert_eq!(report.box_hits, 0);
        assert!(report.last_seen_straight.is_none());
        assert!(report.last_seen_box.is_none());
    }
}
