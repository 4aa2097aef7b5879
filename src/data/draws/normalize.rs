use crate::data::draws::socrata_client::RawRecord;
use crate::domain::{Combo, DrawRow, Session};
use crate::utils::parse_draw_date;

/// Convert raw API rows into the long-format draw table: one row per draw,
/// up to two per record. Pure and deterministic; emits rows in input order
/// and never re-sorts (callers order by date as needed).
///
/// Sessions that fail digit validation are dropped and logged, never
/// fabricated; the other session of the same record is unaffected.
/// Idempotent: feeding already-normalized values through the same padding
/// rule changes nothing.
pub fn normalize(records: &[RawRecord]) -> Vec<DrawRow> {
    let mut rows = Vec::with_capacity(records.len() * 2);
    let mut dropped = 0usize;

    for record in records {
        let Some(date) = parse_draw_date(&record.draw_date) else {
            log::warn!(
                "Dropping record with unparseable draw_date {:?}",
                record.draw_date
            );
            dropped += 1;
            continue;
        };

        let sessions = [
            (Session::Midday, record.midday_win_4.as_deref()),
            (Session::Evening, record.evening_win_4.as_deref()),
        ];
        for (session, value) in sessions {
            // A missing or blank session is normal (e.g. dates before the
            // midday drawing existed), not a parse failure.
            let Some(raw) = value else { continue };
            if raw.trim().is_empty() {
                continue;
            }

            match Combo::from_raw(raw) {
                Ok(combo) => rows.push(DrawRow::new(date, session, combo)),
                Err(e) => {
                    log::warn!("Dropping {} {} draw: {:#}", record.draw_date, session, e);
                    dropped += 1;
                }
            }
        }
    }

    if dropped > 0 {
        log::info!(
            "Normalized {} draws ({} invalid rows dropped)",
            rows.len(),
            dropped
        );
    }
    rows
}
