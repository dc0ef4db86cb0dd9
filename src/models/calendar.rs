//! Calendar view models (derived per request, never stored)

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::{holiday::Holiday, working_hours::Weekday};
use crate::scheduling::time_window::hhmm_option;

/// One day of a month grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CalendarDay {
    #[schema(value_type = String, example = "2024-02-29")]
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub is_working_day: bool,
    /// Working day without opening bounds (24h or unbounded day)
    pub open_all_day: bool,
    #[serde(with = "hhmm_option")]
    #[schema(value_type = Option<String>)]
    pub opens_at: Option<NaiveTime>,
    #[serde(with = "hhmm_option")]
    #[schema(value_type = Option<String>)]
    pub closes_at: Option<NaiveTime>,
    /// Full-day holiday closing this date
    pub full_day_holiday: Option<Holiday>,
    /// Timed holidays inside a working day
    pub holidays: Vec<Holiday>,
    pub is_today: bool,
    pub is_past: bool,
}

/// Month grid for the hospital or a single doctor
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CalendarGrid {
    pub year: i32,
    pub month: u32,
    pub doctor_id: Option<String>,
    pub days: Vec<CalendarDay>,
}

/// Query parameters for the calendar view
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct CalendarQuery {
    /// Year (defaults to the current year)
    pub year: Option<i32>,
    /// Month 1-12 (defaults to the current month)
    pub month: Option<u32>,
    /// Doctor ID; hospital calendar when absent
    pub doctor: Option<String>,
}
