//! Schedule service: month calendars and holiday management

use chrono::NaiveDate;

use crate::{
    error::AppResult,
    models::{
        calendar::CalendarGrid,
        holiday::{CreateHoliday, Holiday, HolidayQuery, HolidayScope},
        working_hours::{StoredHours, WorkingHours},
    },
    repository::Repository,
    scheduling::{calendar, time_window},
};

#[derive(Clone)]
pub struct SchedulesService {
    repository: Repository,
}

impl SchedulesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Month grid for the hospital, or for one of its doctors.
    ///
    /// A doctor without stored working hours follows the hospital's hours.
    /// Holidays come from the doctor's set when a doctor is given, otherwise
    /// from the hospital's.
    pub async fn build_calendar_data(
        &self,
        hospital_id: &str,
        year: i32,
        month: u32,
        doctor_id: Option<&str>,
        today: NaiveDate,
    ) -> AppResult<CalendarGrid> {
        let (first, last) = calendar::month_bounds(year, month)?;

        let (hours, is_open_24_hours) = match doctor_id {
            Some(doctor_id) => self.doctor_schedule(hospital_id, doctor_id).await?,
            None => hospital_schedule(self.repository.working_hours.hospital_hours(hospital_id).await?),
        };

        let scope = scope_for(hospital_id, doctor_id);
        let holidays = self
            .repository
            .holidays
            .list(&scope, Some(first), Some(last))
            .await?;

        let days = calendar::assemble_month(year, month, &hours, is_open_24_hours, &holidays, today)?;
        tracing::debug!(%hospital_id, ?doctor_id, year, month, holidays = holidays.len(), "Calendar assembled");

        Ok(CalendarGrid {
            year,
            month,
            doctor_id: doctor_id.map(str::to_string),
            days,
        })
    }

    async fn doctor_schedule(&self, hospital_id: &str, doctor_id: &str) -> AppResult<(WorkingHours, bool)> {
        let stored = self.repository.working_hours.doctor_hours(doctor_id).await?;
        match stored.working_hours {
            Some(hours) if !hours.is_empty() => Ok((hours, false)),
            _ => {
                tracing::debug!(%doctor_id, "Doctor has no working hours, using the hospital's");
                let hospital = self.repository.working_hours.hospital_hours(hospital_id).await?;
                Ok(hospital_schedule(hospital))
            }
        }
    }

    pub async fn list_holidays(&self, scope: &HolidayScope, query: &HolidayQuery) -> AppResult<Vec<Holiday>> {
        let start = query
            .start_date
            .as_deref()
            .map(time_window::parse_date)
            .transpose()?;
        let end = query
            .end_date
            .as_deref()
            .map(time_window::parse_date)
            .transpose()?;
        self.repository.holidays.list(scope, start, end).await
    }

    pub async fn add_holiday(&self, scope: &HolidayScope, data: &CreateHoliday) -> AppResult<Holiday> {
        let new_holiday = data.parse()?;
        let holiday = self.repository.holidays.create(scope, &new_holiday).await?;
        tracing::info!(table = scope.table(), holiday_id = %holiday.id, date = %holiday.date, "Holiday added");
        Ok(holiday)
    }

    pub async fn delete_holiday(&self, scope: &HolidayScope, id: &str) -> AppResult<()> {
        self.repository.holidays.delete(scope, id).await?;
        tracing::info!(table = scope.table(), holiday_id = %id, "Holiday deleted");
        Ok(())
    }
}

fn hospital_schedule(stored: StoredHours) -> (WorkingHours, bool) {
    (
        stored.working_hours.unwrap_or_default(),
        stored.is_open_24_hours.unwrap_or(false),
    )
}

fn scope_for(hospital_id: &str, doctor_id: Option<&str>) -> HolidayScope {
    match doctor_id {
        Some(doctor_id) => HolidayScope::Doctor(doctor_id.to_string()),
        None => HolidayScope::Hospital(hospital_id.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::AppError,
        store::{Filter, MockDataStore, Record},
    };
    use chrono::NaiveTime;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tokio_test::assert_ok;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 14).unwrap()
    }

    fn weekday_hours() -> Value {
        json!({
            "monday": {"isAvailable": true, "start": "09:00", "end": "17:00"},
            "tuesday": {"isAvailable": true, "start": "09:00", "end": "17:00"},
            "wednesday": {"isAvailable": true, "start": "09:00", "end": "17:00"},
            "thursday": {"isAvailable": true, "start": "09:00", "end": "17:00"},
            "friday": {"isAvailable": true, "start": "09:00", "end": "13:00"},
            "saturday": {"isAvailable": false, "start": null, "end": null},
            "sunday": {"isAvailable": false, "start": null, "end": null}
        })
    }

    #[tokio::test]
    async fn test_hospital_calendar_for_leap_february() {
        let mut store = MockDataStore::new();
        store
            .expect_fetch_one()
            .withf(|table, _| table == "hospitals")
            .returning(|_, _| {
                Ok(Some(record(json!({
                    "id": "h-1",
                    "is_open_24_hours": false,
                    "working_hours": weekday_hours()
                }))))
            });
        store
            .expect_fetch_rows()
            .withf(|table, filters| {
                table == "hospital_holidays"
                    && filters.to_vec()
                        == vec![
                            Filter::eq("hospital_id", "h-1"),
                            Filter::gte("date", "2024-02-01"),
                            Filter::lte("date", "2024-02-29"),
                        ]
            })
            .returning(|_, _| {
                Ok(vec![record(json!({
                    "id": 9,
                    "date": "2024-02-05",
                    "is_full_day": true,
                    "reason": "Inventory"
                }))])
            });

        let service = SchedulesService::new(Repository::new(Arc::new(store)));
        let grid = assert_ok!(service.build_calendar_data("h-1", 2024, 2, None, today()).await);

        assert_eq!(grid.days.len(), 29);
        assert_eq!(grid.doctor_id, None);

        // 2024-02-02 is a Friday
        let friday = &grid.days[1];
        assert!(friday.is_working_day);
        assert_eq!(friday.closes_at, NaiveTime::from_hms_opt(13, 0, 0));

        // 2024-02-03 is a Saturday
        assert!(!grid.days[2].is_working_day);

        let closed = &grid.days[4];
        assert_eq!(closed.full_day_holiday.as_ref().map(|h| h.id.as_str()), Some("9"));
        assert!(!closed.is_working_day);

        assert!(grid.days[13].is_today);
        assert!(grid.days[12].is_past);
    }

    #[tokio::test]
    async fn test_unreadable_holiday_row_does_not_break_the_month() {
        let mut store = MockDataStore::new();
        store
            .expect_fetch_one()
            .withf(|table, _| table == "hospitals")
            .returning(|_, _| {
                Ok(Some(record(json!({
                    "id": "h-1",
                    "is_open_24_hours": false,
                    "working_hours": weekday_hours()
                }))))
            });
        store
            .expect_fetch_rows()
            .withf(|table, _| table == "hospital_holidays")
            .returning(|_, _| {
                Ok(vec![
                    record(json!({"id": 1, "date": "2024-02-05", "is_full_day": true})),
                    record(json!({"id": 2, "date": "05.02.2024", "is_full_day": true})),
                ])
            });

        let service = SchedulesService::new(Repository::new(Arc::new(store)));
        let grid = assert_ok!(service.build_calendar_data("h-1", 2024, 2, None, today()).await);

        assert_eq!(grid.days.len(), 29);
        let monday = &grid.days[4];
        assert_eq!(monday.full_day_holiday.as_ref().map(|h| h.id.as_str()), Some("1"));
        assert!(!monday.is_working_day);
        assert!(grid.days[5].is_working_day);
    }

    #[tokio::test]
    async fn test_doctor_without_hours_falls_back_to_hospital() {
        let mut store = MockDataStore::new();
        store
            .expect_fetch_one()
            .withf(|table, _| table == "doctors")
            .returning(|_, _| Ok(Some(record(json!({"id": "d-1", "working_hours": null})))));
        store
            .expect_fetch_one()
            .withf(|table, _| table == "hospitals")
            .returning(|_, _| Ok(Some(record(json!({"id": "h-1", "is_open_24_hours": true})))));
        store
            .expect_fetch_rows()
            .withf(|table, filters| table == "doctor_holidays" && filters.contains(&Filter::eq("doctor_id", "d-1")))
            .returning(|_, _| Ok(Vec::new()));

        let service = SchedulesService::new(Repository::new(Arc::new(store)));
        let grid = assert_ok!(
            service
                .build_calendar_data("h-1", 2023, 11, Some("d-1"), today())
                .await
        );

        assert_eq!(grid.days.len(), 30);
        assert_eq!(grid.doctor_id.as_deref(), Some("d-1"));
        assert!(grid.days.iter().all(|d| d.is_working_day && d.open_all_day));
    }

    #[tokio::test]
    async fn test_invalid_month_is_rejected_before_any_query() {
        let service = SchedulesService::new(Repository::new(Arc::new(MockDataStore::new())));
        let result = service.build_calendar_data("h-1", 2024, 13, None, today()).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_add_timed_holiday_requires_both_times() {
        let service = SchedulesService::new(Repository::new(Arc::new(MockDataStore::new())));
        let data = CreateHoliday {
            date: "2024-04-01".to_string(),
            reason: "Drill".to_string(),
            is_full_day: Some(false),
            start_time: Some("10:00".to_string()),
            end_time: None,
        };
        let scope = HolidayScope::Hospital("h-1".to_string());
        assert!(matches!(
            service.add_holiday(&scope, &data).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_list_holidays_parses_range() {
        let mut store = MockDataStore::new();
        store
            .expect_fetch_rows()
            .withf(|_, filters| filters.contains(&Filter::gte("date", "2024-04-01")) && filters.len() == 2)
            .returning(|_, _| Ok(Vec::new()));

        let service = SchedulesService::new(Repository::new(Arc::new(store)));
        let scope = HolidayScope::Doctor("d-1".to_string());
        let query = HolidayQuery {
            start_date: Some("2024-04-01".to_string()),
            end_date: None,
        };
        assert!(assert_ok!(service.list_holidays(&scope, &query).await).is_empty());
    }
}
