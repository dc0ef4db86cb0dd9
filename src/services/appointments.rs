//! Appointment service: listing, display ordering, edits and slot checks

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::{
    error::AppResult,
    models::{
        appointment::{
            Appointment, AppointmentFilter, AppointmentListEntry, AppointmentPage, AppointmentQuery,
            AppointmentSummary, DisplayLabel, UpdateAppointment,
        },
        holiday::HolidayScope,
    },
    repository::Repository,
    scheduling::{holidays, lifecycle, time_window},
};

pub const DEFAULT_PER_PAGE: i64 = 10;
pub const MAX_PER_PAGE: i64 = 100;

#[derive(Clone)]
pub struct AppointmentsService {
    repository: Repository,
}

impl AppointmentsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Appointments of the hospital matching the filters, in store order
    pub async fn filter_appointments(
        &self,
        hospital_id: &str,
        filter: &AppointmentFilter,
    ) -> AppResult<Vec<Appointment>> {
        self.repository.appointments.filter(hospital_id, filter).await
    }

    pub fn order_appointments_for_display(
        &self,
        appointments: Vec<Appointment>,
        now: NaiveDateTime,
    ) -> Vec<Appointment> {
        lifecycle::order_for_display(appointments, now)
    }

    /// Filtered, display-ordered and paginated listing
    pub async fn list_for_display(
        &self,
        hospital_id: &str,
        query: &AppointmentQuery,
        now: NaiveDateTime,
    ) -> AppResult<AppointmentPage> {
        let filter = query.filter()?;
        let appointments = self.filter_appointments(hospital_id, &filter).await?;
        let ordered = lifecycle::order_classified(appointments, now);

        let total = ordered.len() as i64;
        let (page, per_page, offset) = page_bounds(total, query.page, query.per_page);

        let appointments = ordered
            .into_iter()
            .skip(offset as usize)
            .take(per_page as usize)
            .map(|(appointment, classification)| AppointmentListEntry {
                display_status: classification.label,
                formatted_date: display_date(&appointment.date),
                appointment,
            })
            .collect();

        Ok(AppointmentPage {
            appointments,
            total,
            page,
            per_page,
        })
    }

    /// Counts per display label, plus today's appointments
    pub async fn summary(&self, hospital_id: &str, now: NaiveDateTime) -> AppResult<AppointmentSummary> {
        let appointments = self
            .filter_appointments(hospital_id, &AppointmentFilter::default())
            .await?;
        let today = time_window::format_date(now.date());

        let mut summary = AppointmentSummary::default();
        for appointment in &appointments {
            summary.total += 1;
            match lifecycle::classify(appointment, now).label {
                DisplayLabel::Planned => summary.planned += 1,
                DisplayLabel::Completed => summary.completed += 1,
                DisplayLabel::Cancelled => summary.cancelled += 1,
            }
            if appointment.date.trim() == today {
                summary.today += 1;
            }
        }
        Ok(summary)
    }

    pub async fn update_appointment(&self, id: &str, data: &UpdateAppointment) -> AppResult<Appointment> {
        let patch = data.to_patch()?;
        let appointment = self.repository.appointments.update(id, patch).await?;
        tracing::info!(appointment_id = %id, "Appointment updated");
        Ok(appointment)
    }

    pub async fn delete_appointment(&self, id: &str) -> AppResult<()> {
        self.repository.appointments.delete(id).await?;
        tracing::info!(appointment_id = %id, "Appointment deleted");
        Ok(())
    }

    /// Whether a hospital holiday on `date` covers `time`
    pub async fn is_appointment_time_blocked(
        &self,
        hospital_id: &str,
        date: NaiveDate,
        time: NaiveTime,
    ) -> AppResult<bool> {
        let scope = HolidayScope::Hospital(hospital_id.to_string());
        let on_date = self.repository.holidays.on_date(&scope, date).await?;
        Ok(holidays::is_blocked(date, time, &on_date))
    }
}

/// Resolve (page, per_page, offset). The page is clamped into the available
/// range, so an out-of-range page shows the nearest existing one.
pub fn page_bounds(total: i64, page: Option<i64>, per_page: Option<i64>) -> (i64, i64, i64) {
    let per_page = match per_page {
        Some(n) if n > 0 => n.min(MAX_PER_PAGE),
        _ => DEFAULT_PER_PAGE,
    };
    let last_page = ((total + per_page - 1) / per_page).max(1);
    let page = page.unwrap_or(1).clamp(1, last_page);
    (page, per_page, (page - 1) * per_page)
}

/// `dd.mm.yyyy`, or the stored value when it is not a date
fn display_date(date: &str) -> String {
    time_window::parse_date(date)
        .map(|d| d.format("%d.%m.%Y").to_string())
        .unwrap_or_else(|_| date.to_string())
}
