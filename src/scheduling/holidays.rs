//! Holiday blocking rules for appointment slots

use chrono::{NaiveDate, NaiveTime};

use crate::models::holiday::Holiday;

/// Whether the slot `date` + `time` falls inside any of the given holidays.
///
/// A full-day record blocks everything. Timed records block the half-open
/// range `[start, end)`. Records dated another day never block. The caller
/// picks the scope (hospital or doctor).
pub fn is_blocked(date: NaiveDate, time: NaiveTime, holidays_on_date: &[Holiday]) -> bool {
    holidays_on_date
        .iter()
        .filter(|holiday| holiday.date == date)
        .any(|holiday| blocks(holiday, time))
}

fn blocks(holiday: &Holiday, time: NaiveTime) -> bool {
    if holiday.is_full_day {
        return true;
    }
    match (holiday.start_time, holiday.end_time) {
        (Some(start), Some(end)) => start <= time && time < end,
        _ => {
            tracing::warn!(
                "Timed holiday {} on {} has no usable range, ignoring it",
                holiday.id,
                holiday.date
            );
            false
        }
    }
}

/// First full-day holiday of the date, if any
pub fn full_day_holiday(holidays: &[Holiday]) -> Option<&Holiday> {
    holidays.iter().find(|h| h.is_full_day)
}

/// Timed holidays, ordered by start time
pub fn partial_overrides(holidays: &[Holiday]) -> Vec<Holiday> {
    let mut partial: Vec<Holiday> = holidays
        .iter()
        .filter(|h| !h.is_full_day)
        .cloned()
        .collect();
    partial.sort_by_key(|h| h.start_time);
    partial
}
