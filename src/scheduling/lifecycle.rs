//! Appointment lifecycle: display status and display ordering
//!
//! Only `cancelled` is ever persisted. Whether an appointment is planned or
//! completed depends on where its scheduled instant falls relative to `now`,
//! which callers inject.

use std::cmp::Reverse;

use chrono::NaiveDateTime;

use crate::{
    error::AppResult,
    models::appointment::{Appointment, DisplayLabel, PersistedStatus},
    scheduling::time_window,
};

/// Position of the scheduled instant relative to now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalPosition {
    Upcoming,
    Past,
}

/// What to do when an appointment's date or time cannot be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFallback {
    /// Use the current instant, so the row sorts as borderline upcoming
    TreatAsNow,
}

pub const ON_PARSE_FAILURE: ParseFallback = ParseFallback::TreatAsNow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub label: DisplayLabel,
    pub is_upcoming: bool,
}

pub fn label_for(status: PersistedStatus, position: TemporalPosition) -> DisplayLabel {
    match (status, position) {
        (PersistedStatus::Cancelled, _) => DisplayLabel::Cancelled,
        (PersistedStatus::Other, TemporalPosition::Upcoming) => DisplayLabel::Planned,
        (PersistedStatus::Other, TemporalPosition::Past) => DisplayLabel::Completed,
    }
}

/// Combined date and time of the appointment. A missing time means midnight.
pub fn parse_scheduled(appointment: &Appointment) -> AppResult<NaiveDateTime> {
    let time = match appointment.time.trim() {
        "" => "00:00",
        t => t,
    };
    time_window::combine(&appointment.date, time)
}

/// Scheduled instant, falling back per [`ON_PARSE_FAILURE`]
pub fn scheduled_at(appointment: &Appointment, now: NaiveDateTime) -> NaiveDateTime {
    match parse_scheduled(appointment) {
        Ok(instant) => instant,
        Err(e) => match ON_PARSE_FAILURE {
            ParseFallback::TreatAsNow => {
                tracing::warn!(
                    appointment_id = %appointment.id,
                    "Unparseable appointment schedule, treating as now: {}",
                    e
                );
                now
            }
        },
    }
}

fn position(instant: NaiveDateTime, now: NaiveDateTime) -> TemporalPosition {
    if instant >= now {
        TemporalPosition::Upcoming
    } else {
        TemporalPosition::Past
    }
}

fn classify_at(appointment: &Appointment, instant: NaiveDateTime, now: NaiveDateTime) -> Classification {
    let label = label_for(
        PersistedStatus::of(appointment.status.as_deref()),
        position(instant, now),
    );
    Classification {
        label,
        is_upcoming: label == DisplayLabel::Planned,
    }
}

pub fn classify(appointment: &Appointment, now: NaiveDateTime) -> Classification {
    classify_at(appointment, scheduled_at(appointment, now), now)
}

/// Upcoming soonest first, then cancelled and completed most recent first.
///
/// Sorting is stable, so ties keep the store's order.
pub fn order_for_display(appointments: Vec<Appointment>, now: NaiveDateTime) -> Vec<Appointment> {
    order_classified(appointments, now)
        .into_iter()
        .map(|(appointment, _)| appointment)
        .collect()
}

/// [`order_for_display`], keeping the classification computed for each row
pub fn order_classified(
    appointments: Vec<Appointment>,
    now: NaiveDateTime,
) -> Vec<(Appointment, Classification)> {
    let mut upcoming = Vec::new();
    let mut cancelled = Vec::new();
    let mut completed = Vec::new();

    for appointment in appointments {
        let instant = scheduled_at(&appointment, now);
        let classification = classify_at(&appointment, instant, now);
        let entry = (instant, appointment, classification);
        match classification.label {
            DisplayLabel::Planned => upcoming.push(entry),
            DisplayLabel::Cancelled => cancelled.push(entry),
            DisplayLabel::Completed => completed.push(entry),
        }
    }

    upcoming.sort_by_key(|(instant, _, _)| *instant);
    cancelled.sort_by_key(|(instant, _, _)| Reverse(*instant));
    completed.sort_by_key(|(instant, _, _)| Reverse(*instant));

    upcoming
        .into_iter()
        .chain(cancelled)
        .chain(completed)
        .map(|(_, appointment, classification)| (appointment, classification))
        .collect()
}
