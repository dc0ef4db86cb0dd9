//! Weekly working hours (hospital and doctor level)

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    scheduling::time_window::{self, hhmm_option},
};

/// Day of the week, in display order (Monday first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Persisted key (`monday`, `tuesday`, ...)
    pub fn key(self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }

    pub fn of(date: impl Datelike) -> Self {
        Self::ALL[date.weekday().num_days_from_monday() as usize]
    }
}

/// Persisted opening record for one weekday
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayHours {
    #[serde(default)]
    pub is_available: bool,
    /// Opening time (HH:MM)
    #[serde(default)]
    pub start: Option<String>,
    /// Closing time (HH:MM)
    #[serde(default)]
    pub end: Option<String>,
}

impl DayHours {
    pub fn closed() -> Self {
        Self {
            is_available: false,
            start: None,
            end: None,
        }
    }

    pub fn all_day() -> Self {
        Self {
            is_available: true,
            start: None,
            end: None,
        }
    }
}

/// Weekday -> opening record, stored as JSON in the `working_hours` column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkingHours(pub BTreeMap<Weekday, DayHours>);

impl WorkingHours {
    pub fn day(&self, day: Weekday) -> Option<&DayHours> {
        self.0.get(&day)
    }

    pub fn insert(&mut self, day: Weekday, hours: DayHours) {
        self.0.insert(day, hours);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Effective opening of a single day once the 24h flag and stored hours are merged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaySchedule {
    Closed,
    AllDay,
    Window { start: NaiveTime, end: NaiveTime },
}

/// Time value coming from a form: either already typed or raw text
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TimeInput {
    Time(NaiveTime),
    Text(String),
}

impl TimeInput {
    pub fn to_time(&self) -> AppResult<NaiveTime> {
        match self {
            TimeInput::Time(t) => Ok(*t),
            TimeInput::Text(s) => time_window::parse_time(s),
        }
    }

    /// Coerce to the persisted `HH:MM` representation
    pub fn to_hhmm(&self) -> AppResult<String> {
        self.to_time().map(time_window::format_time)
    }
}

impl From<NaiveTime> for TimeInput {
    fn from(t: NaiveTime) -> Self {
        TimeInput::Time(t)
    }
}

impl From<&str> for TimeInput {
    fn from(s: &str) -> Self {
        TimeInput::Text(s.to_string())
    }
}

/// One weekday as submitted by the working hours form
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct DayForm {
    #[serde(default)]
    pub is_open: bool,
    /// Opening time (HH:MM)
    #[schema(value_type = Option<String>)]
    pub start: Option<TimeInput>,
    /// Closing time (HH:MM)
    #[schema(value_type = Option<String>)]
    pub end: Option<TimeInput>,
}

/// Working hours form submission
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct WorkingHoursForm {
    /// Open around the clock; per-day values are ignored
    #[serde(default)]
    pub is_open_24_hours: bool,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub days: BTreeMap<Weekday, DayForm>,
}

impl WorkingHoursForm {
    /// Reject open days without both bounds and inverted windows.
    ///
    /// Skipped entirely in 24h mode.
    pub fn validate(&self) -> AppResult<()> {
        if self.is_open_24_hours {
            return Ok(());
        }

        let mut problems = Vec::new();
        for day in Weekday::ALL {
            let Some(form) = self.days.get(&day) else {
                continue;
            };
            let start = form.start.as_ref().map(TimeInput::to_time).transpose()?;
            let end = form.end.as_ref().map(TimeInput::to_time).transpose()?;

            if form.is_open && (start.is_none() || end.is_none()) {
                problems.push(format!("{}: start and end times are required", day.key()));
            }
            if let (Some(start), Some(end)) = (start, end) {
                if start >= end {
                    problems.push(format!("{}: start must be before end", day.key()));
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(problems.join("; ")))
        }
    }
}

/// One weekday pre-filled for an edit form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DayInitial {
    pub is_open: bool,
    #[serde(with = "hhmm_option")]
    #[schema(value_type = Option<String>)]
    pub start: Option<NaiveTime>,
    #[serde(with = "hhmm_option")]
    #[schema(value_type = Option<String>)]
    pub end: Option<NaiveTime>,
}

/// Working hours pre-filled for an edit form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct WorkingHoursInitial {
    pub is_open_24_hours: bool,
    #[schema(value_type = Object)]
    pub days: BTreeMap<Weekday, DayInitial>,
}

/// Working hours columns of a hospital or doctor row
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoredHours {
    #[serde(default)]
    pub working_hours: Option<WorkingHours>,
    #[serde(default)]
    pub is_open_24_hours: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_weekday_of_date() {
        // 2024-04-01 was a Monday
        let date = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        assert_eq!(Weekday::of(date), Weekday::Monday);
        assert_eq!(Weekday::of(date.succ_opt().unwrap()), Weekday::Tuesday);
        let sunday = NaiveDate::from_ymd_opt(2024, 4, 7).unwrap();
        assert_eq!(Weekday::of(sunday), Weekday::Sunday);
    }

    #[test]
    fn test_working_hours_json_shape() {
        let json = r#"{"monday": {"isAvailable": true, "start": "08:00", "end": "17:00"},
                       "tuesday": {"isAvailable": false, "start": null, "end": null}}"#;
        let hours: WorkingHours = serde_json::from_str(json).unwrap();
        assert_eq!(
            hours.day(Weekday::Monday),
            Some(&DayHours {
                is_available: true,
                start: Some("08:00".to_string()),
                end: Some("17:00".to_string()),
            })
        );
        assert_eq!(hours.day(Weekday::Tuesday), Some(&DayHours::closed()));
        assert_eq!(hours.day(Weekday::Sunday), None);

        let back = serde_json::to_value(&hours).unwrap();
        assert_eq!(back["monday"]["isAvailable"], true);
    }

    #[test]
    fn test_validate_requires_bounds_for_open_days() {
        let mut form = WorkingHoursForm::default();
        form.days.insert(
            Weekday::Monday,
            DayForm {
                is_open: true,
                start: Some("08:00".into()),
                end: None,
            },
        );
        let err = form.validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("monday")));
    }

    #[test]
    fn test_validate_rejects_inverted_window() {
        let mut form = WorkingHoursForm::default();
        form.days.insert(
            Weekday::Friday,
            DayForm {
                is_open: false,
                start: Some("18:00".into()),
                end: Some("09:00".into()),
            },
        );
        assert!(form.validate().is_err());

        form.is_open_24_hours = true;
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_time_input_accepts_text_or_time() {
        let text: TimeInput = serde_json::from_str("\"9:05\"").unwrap();
        assert_eq!(text.to_hhmm().unwrap(), "09:05");
        let typed = TimeInput::from(NaiveTime::from_hms_opt(12, 30, 0).unwrap());
        assert_eq!(typed.to_hhmm().unwrap(), "12:30");
        assert!(TimeInput::from("noon").to_hhmm().is_err());
    }
}
