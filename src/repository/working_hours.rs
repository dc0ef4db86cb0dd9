//! Working hours columns of the hospitals and doctors tables

use std::sync::Arc;

use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::working_hours::{StoredHours, WorkingHours},
    store::{DataStore, Filter, Record},
};

pub const HOSPITALS: &str = "hospitals";
pub const DOCTORS: &str = "doctors";

#[derive(Clone)]
pub struct WorkingHoursRepository {
    store: Arc<dyn DataStore>,
}

impl WorkingHoursRepository {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    pub async fn hospital_hours(&self, hospital_id: &str) -> AppResult<StoredHours> {
        self.fetch(HOSPITALS, hospital_id).await
    }

    /// Doctors have no 24h mode; `is_open_24_hours` is always `None`
    pub async fn doctor_hours(&self, doctor_id: &str) -> AppResult<StoredHours> {
        let stored = self.fetch(DOCTORS, doctor_id).await?;
        Ok(StoredHours {
            is_open_24_hours: None,
            ..stored
        })
    }

    pub async fn update_hospital_hours(
        &self,
        hospital_id: &str,
        hours: &WorkingHours,
        is_open_24_hours: bool,
    ) -> AppResult<StoredHours> {
        let mut patch = Record::new();
        patch.insert("working_hours".into(), to_value(hours)?);
        patch.insert("is_open_24_hours".into(), Value::Bool(is_open_24_hours));

        let row = super::update_row(self.store.as_ref(), HOSPITALS, hospital_id, patch).await?;
        Ok(stored_hours(HOSPITALS, hospital_id, row))
    }

    pub async fn update_doctor_hours(&self, doctor_id: &str, hours: &WorkingHours) -> AppResult<StoredHours> {
        let mut patch = Record::new();
        patch.insert("working_hours".into(), to_value(hours)?);

        let row = super::update_row(self.store.as_ref(), DOCTORS, doctor_id, patch).await?;
        Ok(StoredHours {
            is_open_24_hours: None,
            ..stored_hours(DOCTORS, doctor_id, row)
        })
    }

    async fn fetch(&self, table: &str, id: &str) -> AppResult<StoredHours> {
        let row = self
            .store
            .fetch_one(table, &[Filter::eq("id", id)])
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} row {} not found", table, id)))?;
        Ok(stored_hours(table, id, row))
    }
}

fn to_value(hours: &WorkingHours) -> AppResult<Value> {
    serde_json::to_value(hours).map_err(|e| AppError::Internal(e.to_string()))
}

/// Read the working hours columns of a row.
///
/// Some deployments keep `working_hours` as a JSON string rather than jsonb.
/// Unreadable schedules are treated as absent.
fn stored_hours(table: &str, id: &str, row: Record) -> StoredHours {
    let parsed = match row.get("working_hours") {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(serde_json::from_str::<WorkingHours>(text)),
        Some(value) => Some(serde_json::from_value::<WorkingHours>(value.clone())),
    };

    let working_hours = match parsed {
        Some(Ok(hours)) => Some(hours),
        Some(Err(e)) => {
            tracing::warn!("Ignoring unreadable working hours of {} {}: {}", table, id, e);
            None
        }
        None => None,
    };

    StoredHours {
        working_hours,
        is_open_24_hours: row.get("is_open_24_hours").and_then(Value::as_bool),
    }
}
