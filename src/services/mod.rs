//! Business logic services

pub mod appointments;
pub mod events;
pub mod schedules;
pub mod working_hours;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub appointments: appointments::AppointmentsService,
    pub schedules: schedules::SchedulesService,
    pub working_hours: working_hours::WorkingHoursService,
    pub events: events::EventsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            appointments: appointments::AppointmentsService::new(repository.clone()),
            schedules: schedules::SchedulesService::new(repository.clone()),
            working_hours: working_hours::WorkingHoursService::new(repository.clone()),
            events: events::EventsService::new(repository),
        }
    }
}
