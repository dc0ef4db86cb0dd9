//! Appointment availability and scheduling engine
//!
//! Pure functions over already fetched records. Everything that talks to the
//! data store lives in `services`.

pub mod calendar;
pub mod holidays;
pub mod lifecycle;
pub mod time_window;
pub mod working_hours;
