//! Holiday models (hospital-wide and doctor-specific closures)

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    scheduling::time_window::{self, hhmm_option},
};

/// Which holiday set a record belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HolidayScope {
    Hospital(String),
    Doctor(String),
}

impl HolidayScope {
    pub fn table(&self) -> &'static str {
        match self {
            HolidayScope::Hospital(_) => "hospital_holidays",
            HolidayScope::Doctor(_) => "doctor_holidays",
        }
    }

    /// Owner column and value used to filter the holiday table
    pub fn owner(&self) -> (&'static str, &str) {
        match self {
            HolidayScope::Hospital(id) => ("hospital_id", id),
            HolidayScope::Doctor(id) => ("doctor_id", id),
        }
    }
}

/// A closure on a single date, either all day or for a time range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Holiday {
    pub id: String,
    #[schema(value_type = String, example = "2024-04-23")]
    pub date: NaiveDate,
    pub reason: Option<String>,
    pub is_full_day: bool,
    /// Start of a partial closure (HH:MM)
    #[serde(with = "hhmm_option")]
    #[schema(value_type = Option<String>)]
    pub start_time: Option<NaiveTime>,
    /// End of a partial closure, exclusive (HH:MM)
    #[serde(with = "hhmm_option")]
    #[schema(value_type = Option<String>)]
    pub end_time: Option<NaiveTime>,
}

/// Create holiday request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateHoliday {
    /// Holiday date (YYYY-MM-DD)
    pub date: String,
    #[validate(length(min = 1, max = 255, message = "Reason is required"))]
    pub reason: String,
    /// Defaults to true
    pub is_full_day: Option<bool>,
    /// Start time (HH:MM), required when not full day
    pub start_time: Option<String>,
    /// End time (HH:MM), required when not full day
    pub end_time: Option<String>,
}

/// Parsed and checked holiday creation data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHoliday {
    pub date: NaiveDate,
    pub reason: String,
    pub is_full_day: bool,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

impl CreateHoliday {
    /// Parse dates and times; a timed holiday needs both bounds with start < end
    pub fn parse(&self) -> AppResult<NewHoliday> {
        self.validate()?;
        let date = time_window::parse_date(&self.date)?;
        let is_full_day = self.is_full_day.unwrap_or(true);

        if is_full_day {
            return Ok(NewHoliday {
                date,
                reason: self.reason.clone(),
                is_full_day,
                start_time: None,
                end_time: None,
            });
        }

        let (Some(start), Some(end)) = (self.start_time.as_deref(), self.end_time.as_deref()) else {
            return Err(AppError::Validation(
                "Start and end times are required for a timed holiday".to_string(),
            ));
        };
        let start = time_window::parse_time(start)?;
        let end = time_window::parse_time(end)?;
        if start >= end {
            return Err(AppError::Validation(
                "Holiday end time must be after its start time".to_string(),
            ));
        }

        Ok(NewHoliday {
            date,
            reason: self.reason.clone(),
            is_full_day,
            start_time: Some(start),
            end_time: Some(end),
        })
    }
}

/// Query parameters for holiday listings
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct HolidayQuery {
    /// Filter holidays from this date (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Filter holidays until this date (YYYY-MM-DD)
    pub end_date: Option<String>,
}
