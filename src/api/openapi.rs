//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{appointments, health, schedules, working_hours};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hospital Panel API",
        version = "0.3.0",
        description = "Hospital administration panel: appointments, holidays, working hours and calendars"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Appointments
        appointments::list_appointments,
        appointments::appointment_summary,
        appointments::update_appointment,
        appointments::delete_appointment,
        appointments::blocked_slot,
        // Schedules
        schedules::get_calendar,
        schedules::list_hospital_holidays,
        schedules::create_hospital_holiday,
        schedules::delete_hospital_holiday,
        schedules::list_doctor_holidays,
        schedules::create_doctor_holiday,
        schedules::delete_doctor_holiday,
        // Working hours
        working_hours::get_hospital_hours,
        working_hours::update_hospital_hours,
        working_hours::get_doctor_hours,
        working_hours::update_doctor_hours,
    ),
    components(
        schemas(
            // Appointments
            crate::models::appointment::Appointment,
            crate::models::appointment::AppointmentListEntry,
            crate::models::appointment::AppointmentPage,
            crate::models::appointment::AppointmentSummary,
            crate::models::appointment::AppointmentQuery,
            crate::models::appointment::UpdateAppointment,
            crate::models::appointment::DisplayLabel,
            crate::models::appointment::BlockedSlotQuery,
            crate::models::appointment::BlockedSlotResponse,
            // Schedules
            crate::models::calendar::CalendarDay,
            crate::models::calendar::CalendarGrid,
            crate::models::calendar::CalendarQuery,
            crate::models::holiday::Holiday,
            crate::models::holiday::CreateHoliday,
            crate::models::holiday::HolidayQuery,
            // Working hours
            crate::models::working_hours::Weekday,
            crate::models::working_hours::DayHours,
            crate::models::working_hours::DayForm,
            crate::models::working_hours::WorkingHoursForm,
            crate::models::working_hours::DayInitial,
            crate::models::working_hours::WorkingHoursInitial,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&HospitalHeader),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "appointments", description = "Appointment listing and edits"),
        (name = "schedules", description = "Calendars and holidays"),
        (name = "working-hours", description = "Hospital and doctor working hours")
    )
)]
pub struct ApiDoc;

/// Documents the `X-Hospital-Id` header every panel endpoint requires
struct HospitalHeader;

impl Modify for HospitalHeader {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "hospital_id",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-Hospital-Id"))),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
