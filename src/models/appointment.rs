//! Appointment models

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::{AppError, AppResult},
    scheduling::time_window,
    store::{id_string, Record},
};

/// Appointment as exposed to callers: camelCase keys, identities as strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub user_id: String,
    pub hospital_id: String,
    pub doctor_id: String,
    /// Service ID
    pub service: String,
    /// Appointment date (YYYY-MM-DD)
    pub date: String,
    /// Appointment time (HH:MM)
    pub time: String,
    /// Persisted status; only `cancelled` is meaningful for display
    pub status: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<String>,
}

/// Appointment row in the store's native snake_case schema
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentRow {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub user_id: Value,
    #[serde(default)]
    pub hospital_id: Value,
    #[serde(default)]
    pub doctor_id: Value,
    #[serde(default)]
    pub service_id: Value,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Value,
}

impl From<AppointmentRow> for Appointment {
    fn from(row: AppointmentRow) -> Self {
        // `time` columns come back as HH:MM:SS; anything unparseable is kept verbatim
        let time = row.time.unwrap_or_default();
        let time = time_window::parse_time(&time)
            .map(time_window::format_time)
            .unwrap_or(time);

        Self {
            id: id_string(&row.id),
            user_id: id_string(&row.user_id),
            hospital_id: id_string(&row.hospital_id),
            doctor_id: id_string(&row.doctor_id),
            service: id_string(&row.service_id),
            date: row.date.unwrap_or_default(),
            time,
            status: row.status,
            notes: row.notes,
            created_at: match row.created_at {
                Value::Null => None,
                other => Some(id_string(&other)),
            },
        }
    }
}

/// Persisted status as far as display is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistedStatus {
    Cancelled,
    Other,
}

impl PersistedStatus {
    pub fn of(status: Option<&str>) -> Self {
        match status {
            Some("cancelled") => PersistedStatus::Cancelled,
            _ => PersistedStatus::Other,
        }
    }
}

/// Status shown to users, derived and never persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DisplayLabel {
    Planned,
    Completed,
    Cancelled,
}

/// Filters for appointment listings; `None` means unconstrained
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub status: Option<String>,
    pub doctor_id: Option<String>,
    pub service_id: Option<String>,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
}

/// Query parameters for appointment listings
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct AppointmentQuery {
    /// Persisted status
    pub status: Option<String>,
    /// Doctor ID
    pub doctor: Option<String>,
    /// Service ID
    pub service: Option<String>,
    /// From this date, inclusive (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Until this date, inclusive (YYYY-MM-DD)
    pub end_date: Option<String>,
    /// Page number (1-based)
    pub page: Option<i64>,
    /// Items per page (default: 10)
    pub per_page: Option<i64>,
}

impl AppointmentQuery {
    pub fn filter(&self) -> AppResult<AppointmentFilter> {
        Ok(AppointmentFilter {
            status: non_blank(&self.status),
            doctor_id: non_blank(&self.doctor),
            service_id: non_blank(&self.service),
            start_date: non_blank(&self.start_date)
                .map(|d| time_window::parse_date(&d))
                .transpose()?,
            end_date: non_blank(&self.end_date)
                .map(|d| time_window::parse_date(&d))
                .transpose()?,
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Update appointment request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateAppointment {
    pub status: Option<String>,
    /// New date (YYYY-MM-DD)
    pub date: Option<String>,
    /// New time (HH:MM)
    pub time: Option<String>,
    pub notes: Option<String>,
}

impl UpdateAppointment {
    /// Store patch holding only the provided fields, dates and times normalized
    pub fn to_patch(&self) -> AppResult<Record> {
        let mut patch = Record::new();

        if let Some(status) = &self.status {
            if status.trim().is_empty() {
                return Err(AppError::Validation("Status cannot be empty".to_string()));
            }
            patch.insert("status".into(), Value::String(status.trim().to_string()));
        }
        if let Some(date) = &self.date {
            let date = time_window::parse_date(date)?;
            patch.insert("date".into(), Value::String(time_window::format_date(date)));
        }
        if let Some(time) = &self.time {
            let time = time_window::parse_time(time)?;
            patch.insert("time".into(), Value::String(time_window::format_time(time)));
        }
        if let Some(notes) = &self.notes {
            patch.insert("notes".into(), Value::String(notes.clone()));
        }

        if patch.is_empty() {
            return Err(AppError::Validation("Nothing to update".to_string()));
        }
        Ok(patch)
    }
}

/// Appointment annotated for display
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AppointmentListEntry {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub display_status: DisplayLabel,
    /// Date as dd.mm.yyyy, or the raw value if it does not parse
    pub formatted_date: String,
}

/// One page of display-ordered appointments
#[derive(Debug, Serialize, ToSchema)]
pub struct AppointmentPage {
    pub appointments: Vec<AppointmentListEntry>,
    /// Total number of matching appointments
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

/// Counts per display status for the active hospital
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct AppointmentSummary {
    pub total: i64,
    pub planned: i64,
    pub completed: i64,
    pub cancelled: i64,
    /// Appointments scheduled today, whatever their status
    pub today: i64,
}

/// Query parameters for the slot blocking check
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BlockedSlotQuery {
    /// Slot date (YYYY-MM-DD)
    pub date: String,
    /// Slot time (HH:MM)
    pub time: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BlockedSlotResponse {
    pub date: String,
    pub time: String,
    pub blocked: bool,
}
