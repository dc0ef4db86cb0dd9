//! Data models for the hospital panel

pub mod appointment;
pub mod calendar;
pub mod holiday;
pub mod working_hours;

// Re-export commonly used types
pub use appointment::{Appointment, AppointmentFilter, DisplayLabel, PersistedStatus};
pub use calendar::{CalendarDay, CalendarGrid};
pub use holiday::{Holiday, HolidayScope};
pub use working_hours::{DayHours, Weekday, WorkingHours};
