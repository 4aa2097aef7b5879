use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{DrawRow, Session};

/// The full normalized draw table for one dataset.
///
/// `version` tags the serialization format so stale cache files are rejected
/// rather than misread.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct DrawHistory {
    pub name: String, // Metadata e.g. "NY Win 4 draw history"
    pub version: f64,
    pub rows: Vec<DrawRow>,
}

impl DrawHistory {
    pub fn new(name: impl Into<String>, version: f64, rows: Vec<DrawRow>) -> Self {
        DrawHistory {
            name: name.into(),
            version,
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn min_date(&self) -> Option<NaiveDate> {
        self.rows.iter().map(|r| r.date).min()
    }

    pub fn max_date(&self) -> Option<NaiveDate> {
        self.rows.iter().map(|r| r.date).max()
    }

    /// Sort by date, Midday before Evening within a date.
    pub fn sort_chronological(&mut self) {
        self.rows.sort_by_key(|r| (r.date, r.session));
    }

    /// Rows with `start <= date <= end`; either bound may be open.
    pub fn filter_date_range(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> DrawHistory {
        let rows = self
            .rows
            .iter()
            .filter(|r| start.is_none_or(|s| r.date >= s))
            .filter(|r| end.is_none_or(|e| r.date <= e))
            .copied()
            .collect();
        DrawHistory {
            name: self.name.clone(),
            version: self.version,
            rows,
        }
    }

    pub fn filter_session(&self, session: Option<Session>) -> DrawHistory {
        match session {
            None => self.clone(),
            Some(wanted) => DrawHistory {
                name: self.name.clone(),
                version: self.version,
                rows: self
                    .rows
                    .iter()
                    .filter(|r| r.session == wanted)
                    .copied()
                    .collect(),
            },
        }
    }

    /// Rows from the most recent `window_days` days, measured back from the
    /// newest row (not from today, so an old cache still windows sensibly).
    pub fn recent_window(&self, window_days: u32) -> DrawHistory {
        let cutoff = self
            .max_date()
            .and_then(|max| max.checked_sub_days(Days::new(u64::from(window_days))));
        self.filter_date_range(cutoff, None)
    }

    /// CSV export of the draw table, columns `draw_date,session,win4`.
    pub fn to_csv(&self) -> String {
        let mut out = String::from("draw_date,session,win4\n");
        for row in &self.rows {
            out.push_str(&format!("{},{},{}\n", row.date, row.session, row.combo));
        }
        out
    }
}
