//! Hospital and doctor holidays repository

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::holiday::{Holiday, HolidayScope, NewHoliday},
    scheduling::time_window,
    store::{from_record, id_string, DataStore, Filter, Record},
};

/// Holiday row in the store's native schema
#[derive(Debug, Deserialize)]
struct HolidayRow {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    is_full_day: Option<bool>,
    #[serde(default)]
    start_time: Option<String>,
    #[serde(default)]
    end_time: Option<String>,
}

impl HolidayRow {
    /// `known_date` stands in for a missing or unreadable date when the row
    /// was selected by date equality. Without it such rows are dropped.
    fn into_holiday(self, known_date: Option<NaiveDate>) -> Option<Holiday> {
        let id = id_string(&self.id);
        let date = match self.date.as_deref().map(time_window::parse_date) {
            Some(Ok(date)) => date,
            _ => {
                let shown = self.date.as_deref().unwrap_or("<missing>");
                match known_date {
                    Some(date) => {
                        tracing::warn!("Holiday {} has invalid date '{}', using {}", id, shown, date);
                        date
                    }
                    None => {
                        tracing::warn!("Skipping holiday {} with invalid date '{}'", id, shown);
                        return None;
                    }
                }
            }
        };
        let parse = |value: Option<String>| {
            value.and_then(|v| match time_window::parse_time(&v) {
                Ok(t) => Some(t),
                Err(_) => {
                    tracing::warn!("Holiday {} has invalid time '{}'", id, v);
                    None
                }
            })
        };

        Some(Holiday {
            date,
            reason: self.reason,
            is_full_day: self.is_full_day.unwrap_or(true),
            start_time: parse(self.start_time),
            end_time: parse(self.end_time),
            id: id.clone(),
        })
    }
}

#[derive(Clone)]
pub struct HolidaysRepository {
    store: Arc<dyn DataStore>,
}

impl HolidaysRepository {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Holidays of the scope, optionally limited to an inclusive date range
    pub async fn list(
        &self,
        scope: &HolidayScope,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> AppResult<Vec<Holiday>> {
        let (owner_column, owner_id) = scope.owner();
        let mut filters = vec![Filter::eq(owner_column, owner_id)];
        if let Some(start) = start_date {
            filters.push(Filter::gte("date", time_window::format_date(start)));
        }
        if let Some(end) = end_date {
            filters.push(Filter::lte("date", time_window::format_date(end)));
        }

        let mut holidays = self.fetch(scope.table(), &filters, None).await?;
        holidays.sort_by_key(|h| (h.date, h.start_time));
        Ok(holidays)
    }

    /// Holidays of the scope recorded for exactly this date
    pub async fn on_date(&self, scope: &HolidayScope, date: NaiveDate) -> AppResult<Vec<Holiday>> {
        let (owner_column, owner_id) = scope.owner();
        let filters = [
            Filter::eq(owner_column, owner_id),
            Filter::eq("date", time_window::format_date(date)),
        ];
        self.fetch(scope.table(), &filters, Some(date)).await
    }

    pub async fn create(&self, scope: &HolidayScope, data: &NewHoliday) -> AppResult<Holiday> {
        let (owner_column, owner_id) = scope.owner();

        let mut record = Record::new();
        record.insert(owner_column.into(), Value::String(owner_id.to_string()));
        record.insert("date".into(), Value::String(time_window::format_date(data.date)));
        record.insert("reason".into(), Value::String(data.reason.clone()));
        record.insert("is_full_day".into(), Value::Bool(data.is_full_day));
        record.insert("start_time".into(), time_value(data.start_time));
        record.insert("end_time".into(), time_value(data.end_time));

        let row = self.store.insert_row(scope.table(), record).await?;
        from_record::<HolidayRow>(scope.table(), row)?
            .into_holiday(Some(data.date))
            .ok_or_else(|| AppError::Store(format!("Unreadable row returned by {}", scope.table())))
    }

    /// Delete a holiday belonging to the scope
    pub async fn delete(&self, scope: &HolidayScope, id: &str) -> AppResult<()> {
        let (owner_column, owner_id) = scope.owner();
        let filters = [Filter::eq("id", id), Filter::eq(owner_column, owner_id)];
        super::delete_row(self.store.as_ref(), scope.table(), id, &filters).await
    }

    async fn fetch(
        &self,
        table: &str,
        filters: &[Filter],
        known_date: Option<NaiveDate>,
    ) -> AppResult<Vec<Holiday>> {
        let mut holidays = Vec::new();
        for row in self.store.fetch_rows(table, filters).await? {
            if let Some(holiday) = from_record::<HolidayRow>(table, row)?.into_holiday(known_date) {
                holidays.push(holiday);
            }
        }
        Ok(holidays)
    }
}

fn time_value(time: Option<chrono::NaiveTime>) -> Value {
    time.map(|t| Value::String(time_window::format_time(t)))
        .unwrap_or(Value::Null)
}
