//! Month grid assembly from working hours and holidays

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult},
    models::{
        calendar::CalendarDay,
        holiday::Holiday,
        working_hours::{DaySchedule, Weekday, WorkingHours},
    },
    scheduling::{holidays, working_hours},
};

/// First and last date of a month
pub fn month_bounds(year: i32, month: u32) -> AppResult<(NaiveDate, NaiveDate)> {
    let invalid = || AppError::Validation(format!("Invalid month {}-{}", year, month));

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;
    let last = next_first.pred_opt().ok_or_else(invalid)?;

    Ok((first, last))
}

/// Build every day of the month.
///
/// `holidays` may span more than the month; records are matched to days by
/// exact date.
pub fn assemble_month(
    year: i32,
    month: u32,
    hours: &WorkingHours,
    is_open_24_hours: bool,
    holidays: &[Holiday],
    today: NaiveDate,
) -> AppResult<Vec<CalendarDay>> {
    let (first, last) = month_bounds(year, month)?;

    let mut by_date: BTreeMap<NaiveDate, Vec<Holiday>> = BTreeMap::new();
    for holiday in holidays {
        by_date.entry(holiday.date).or_default().push(holiday.clone());
    }

    let days = first
        .iter_days()
        .take_while(|date| *date <= last)
        .map(|date| {
            let weekday = Weekday::of(date);
            let on_date = by_date.get(&date).map(Vec::as_slice).unwrap_or_default();
            let schedule = working_hours::resolve_day(hours, weekday, is_open_24_hours);
            assemble_day(date, weekday, schedule, on_date, today)
        })
        .collect();

    Ok(days)
}

fn assemble_day(
    date: NaiveDate,
    weekday: Weekday,
    schedule: DaySchedule,
    on_date: &[Holiday],
    today: NaiveDate,
) -> CalendarDay {
    let full_day_holiday = holidays::full_day_holiday(on_date).cloned();
    let closed = schedule == DaySchedule::Closed || full_day_holiday.is_some();

    let mut day = CalendarDay {
        date,
        weekday,
        is_working_day: !closed,
        open_all_day: false,
        opens_at: None,
        closes_at: None,
        full_day_holiday,
        holidays: Vec::new(),
        is_today: date == today,
        is_past: date < today,
    };
    if closed {
        return day;
    }

    match schedule {
        DaySchedule::AllDay => day.open_all_day = true,
        DaySchedule::Window { start, end } => {
            day.opens_at = Some(start);
            day.closes_at = Some(end);
        }
        DaySchedule::Closed => {}
    }
    day.holidays = holidays::partial_overrides(on_date);
    day
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weekday_hours() -> WorkingHours {
        serde_json::from_value(serde_json::json!({
            "monday": {"isAvailable": true, "start": "08:00", "end": "17:00"},
            "tuesday": {"isAvailable": true, "start": "08:00", "end": "17:00"},
            "wednesday": {"isAvailable": true, "start": "08:00", "end": "17:00"},
            "thursday": {"isAvailable": true, "start": "08:00", "end": "17:00"},
            "friday": {"isAvailable": true, "start": "08:00", "end": "12:00"},
            "saturday": {"isAvailable": false, "start": null, "end": null},
            "sunday": {"isAvailable": false, "start": null, "end": null},
        }))
        .unwrap()
    }

    fn holiday(id: &str, on: NaiveDate, range: Option<(u32, u32)>) -> Holiday {
        Holiday {
            id: id.to_string(),
            date: on,
            reason: Some("Closed".to_string()),
            is_full_day: range.is_none(),
            start_time: range.map(|(s, _)| NaiveTime::from_hms_opt(s, 0, 0).unwrap()),
            end_time: range.map(|(_, e)| NaiveTime::from_hms_opt(e, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_month_lengths() {
        let count = |y, m| {
            assemble_month(y, m, &WorkingHours::default(), false, &[], date(2024, 1, 1))
                .unwrap()
                .len()
        };
        assert_eq!(count(2024, 2), 29);
        assert_eq!(count(2023, 2), 28);
        assert_eq!(count(1900, 2), 28);
        assert_eq!(count(2000, 2), 29);
        assert_eq!(count(2024, 4), 30);
        assert_eq!(count(2024, 12), 31);
    }

    #[test]
    fn test_invalid_month_is_rejected() {
        assert!(matches!(month_bounds(2024, 13), Err(AppError::Validation(_))));
        assert!(matches!(month_bounds(2024, 0), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_weekday_availability_and_windows() {
        let days = assemble_month(2024, 4, &weekday_hours(), false, &[], date(2024, 4, 10)).unwrap();

        // 2024-04-01 is a Monday
        let monday = &days[0];
        assert_eq!(monday.weekday, Weekday::Monday);
        assert!(monday.is_working_day);
        assert_eq!(monday.opens_at, NaiveTime::from_hms_opt(8, 0, 0));
        assert!(monday.is_past);

        let friday = &days[4];
        assert_eq!(friday.closes_at, NaiveTime::from_hms_opt(12, 0, 0));

        let saturday = &days[5];
        assert!(!saturday.is_working_day);
        assert_eq!(saturday.opens_at, None);

        assert!(days[9].is_today);
        assert!(!days[10].is_past);
    }

    #[test]
    fn test_full_day_holiday_closes_a_working_day() {
        let holidays = vec![holiday("1", date(2024, 4, 23), None)];
        let days = assemble_month(2024, 4, &weekday_hours(), false, &holidays, date(2024, 1, 1)).unwrap();

        let closed = &days[22];
        assert!(!closed.is_working_day);
        assert_eq!(closed.full_day_holiday.as_ref().map(|h| h.id.as_str()), Some("1"));
        assert_eq!(closed.opens_at, None);
        assert!(days[21].is_working_day);
    }

    #[test]
    fn test_partial_holidays_are_attached_to_working_days() {
        let holidays = vec![
            holiday("late", date(2024, 4, 2), Some((14, 16))),
            holiday("early", date(2024, 4, 2), Some((9, 10))),
            holiday("weekend", date(2024, 4, 6), Some((9, 10))),
            holiday("other-month", date(2024, 5, 2), None),
        ];
        let days = assemble_month(2024, 4, &weekday_hours(), false, &holidays, date(2024, 1, 1)).unwrap();

        let tuesday = &days[1];
        assert!(tuesday.is_working_day);
        let ids: Vec<&str> = tuesday.holidays.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late"]);

        assert!(days[5].holidays.is_empty());
        assert!(days.iter().all(|d| d.full_day_holiday.is_none()));
    }

    #[test]
    fn test_24_hour_mode_opens_every_day() {
        let days = assemble_month(2024, 2, &WorkingHours::default(), true, &[], date(2024, 1, 1)).unwrap();
        assert!(days.iter().all(|d| d.is_working_day && d.open_all_day));
    }
}
