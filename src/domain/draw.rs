use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::domain::combo::Combo;

/// Which of the two daily drawings a row belongs to.
/// Declaration order gives Midday < Evening, the within-date sort order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Session {
    Midday,
    Evening,
}

/// One normalized draw: a date, a session, and a validated 4-digit combo.
/// Immutable once produced by the normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRow {
    pub date: NaiveDate,
    pub session: Session,
    pub combo: Combo,
}

impl DrawRow {
    pub fn new(date: NaiveDate, session: Session, combo: Combo) -> Self {
        DrawRow {
            date,
            session,
            combo,
        }
    }
}
