//! Repository layer: typed access to the data store tables

pub mod appointments;
pub mod events;
pub mod holidays;
pub mod working_hours;

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    store::{DataStore, Filter, Record},
};

/// Per-table repositories sharing one data store handle
#[derive(Clone)]
pub struct Repository {
    pub appointments: appointments::AppointmentsRepository,
    pub holidays: holidays::HolidaysRepository,
    pub working_hours: working_hours::WorkingHoursRepository,
    pub events: events::EventsRepository,
}

impl Repository {
    /// Create a new repository on top of the given store
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            appointments: appointments::AppointmentsRepository::new(store.clone()),
            holidays: holidays::HolidaysRepository::new(store.clone()),
            working_hours: working_hours::WorkingHoursRepository::new(store.clone()),
            events: events::EventsRepository::new(store),
        }
    }
}

/// Update one row by id; zero affected rows means it does not exist
pub(crate) async fn update_row(
    store: &dyn DataStore,
    table: &str,
    id: &str,
    patch: Record,
) -> AppResult<Record> {
    store
        .update_rows(table, &[Filter::eq("id", id)], patch)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound(format!("{} row {} not found", table, id)))
}

/// Delete rows matching `filters`, which must include the row id
pub(crate) async fn delete_row(
    store: &dyn DataStore,
    table: &str,
    id: &str,
    filters: &[Filter],
) -> AppResult<()> {
    if store.delete_rows(table, filters).await? == 0 {
        return Err(AppError::NotFound(format!("{} row {} not found", table, id)));
    }
    Ok(())
}
