//! Conversion between working hours forms and the persisted weekly structure

use std::collections::BTreeMap;

use crate::{
    error::AppResult,
    models::working_hours::{
        DayHours, DayInitial, DaySchedule, TimeInput, Weekday, WorkingHours, WorkingHoursForm,
        WorkingHoursInitial,
    },
    scheduling::time_window,
};

/// Build the persisted structure from a submitted form.
///
/// In 24h mode every day is available with no bounds, whatever the per-day
/// fields say. Days absent from the form are stored as closed.
pub fn from_form_input(form: &WorkingHoursForm) -> AppResult<WorkingHours> {
    let mut hours = WorkingHours::default();

    for day in Weekday::ALL {
        let entry = if form.is_open_24_hours {
            DayHours::all_day()
        } else {
            match form.days.get(&day) {
                Some(input) => DayHours {
                    is_available: input.is_open,
                    start: input.start.as_ref().map(TimeInput::to_hhmm).transpose()?,
                    end: input.end.as_ref().map(TimeInput::to_hhmm).transpose()?,
                },
                None => DayHours::closed(),
            }
        };
        hours.insert(day, entry);
    }

    Ok(hours)
}

/// Pre-fill values for the edit form from persisted hours
pub fn to_form_initial(hours: &WorkingHours, is_open_24_hours: bool) -> WorkingHoursInitial {
    let days = Weekday::ALL
        .into_iter()
        .map(|day| {
            let initial = match hours.day(day) {
                Some(stored) => DayInitial {
                    is_open: stored.is_available,
                    start: parse_stored(day, stored.start.as_deref()),
                    end: parse_stored(day, stored.end.as_deref()),
                },
                None => DayInitial {
                    is_open: false,
                    start: None,
                    end: None,
                },
            };
            (day, initial)
        })
        .collect::<BTreeMap<_, _>>();

    WorkingHoursInitial {
        is_open_24_hours,
        days,
    }
}

/// Effective schedule for one weekday
pub fn resolve_day(hours: &WorkingHours, day: Weekday, is_open_24_hours: bool) -> DaySchedule {
    if is_open_24_hours {
        return DaySchedule::AllDay;
    }

    let Some(stored) = hours.day(day) else {
        return DaySchedule::Closed;
    };
    if !stored.is_available {
        return DaySchedule::Closed;
    }

    match (stored.start.as_deref(), stored.end.as_deref()) {
        (None, None) => DaySchedule::AllDay,
        (Some(start), Some(end)) => {
            match (time_window::parse_time(start), time_window::parse_time(end)) {
                (Ok(start), Ok(end)) if start < end => DaySchedule::Window { start, end },
                _ => {
                    tracing::warn!(
                        "Ignoring invalid working hours for {}: {}-{}",
                        day.key(),
                        start,
                        end
                    );
                    DaySchedule::Closed
                }
            }
        }
        _ => {
            tracing::warn!("Working hours for {} have only one bound", day.key());
            DaySchedule::Closed
        }
    }
}

fn parse_stored(day: Weekday, value: Option<&str>) -> Option<chrono::NaiveTime> {
    let value = value?;
    match time_window::parse_time(value) {
        Ok(t) => Some(t),
        Err(_) => {
            tracing::warn!("Stored {} time '{}' is not HH:MM, leaving blank", day.key(), value);
            None
        }
    }
}
