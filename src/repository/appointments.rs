//! Appointments repository

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::appointment::{Appointment, AppointmentFilter, AppointmentRow},
    scheduling::time_window,
    store::{from_record, DataStore, Filter, Record},
};

pub const TABLE: &str = "appointments";

#[derive(Clone)]
pub struct AppointmentsRepository {
    store: Arc<dyn DataStore>,
}

impl AppointmentsRepository {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Appointments of the hospital matching the optional filters, in store order.
    ///
    /// Both date bounds are inclusive.
    pub async fn filter(&self, hospital_id: &str, filter: &AppointmentFilter) -> AppResult<Vec<Appointment>> {
        let mut filters = vec![Filter::eq("hospital_id", hospital_id)];

        if let Some(status) = &filter.status {
            filters.push(Filter::eq("status", status));
        }
        if let Some(doctor_id) = &filter.doctor_id {
            filters.push(Filter::eq("doctor_id", doctor_id));
        }
        if let Some(service_id) = &filter.service_id {
            filters.push(Filter::eq("service_id", service_id));
        }
        if let Some(start) = filter.start_date {
            filters.push(Filter::gte("date", time_window::format_date(start)));
        }
        if let Some(end) = filter.end_date {
            filters.push(Filter::lte("date", time_window::format_date(end)));
        }

        self.store
            .fetch_rows(TABLE, &filters)
            .await?
            .into_iter()
            .map(to_appointment)
            .collect()
    }

    /// Apply a patch; fails with NotFound when no row has this id
    pub async fn update(&self, id: &str, patch: Record) -> AppResult<Appointment> {
        let row = super::update_row(self.store.as_ref(), TABLE, id, patch).await?;
        to_appointment(row)
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        super::delete_row(self.store.as_ref(), TABLE, id, &[Filter::eq("id", id)]).await
    }
}

fn to_appointment(record: Record) -> AppResult<Appointment> {
    from_record::<AppointmentRow>(TABLE, record).map(Appointment::from)
}
