//! Appointment API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::{
    error::AppResult,
    models::appointment::{
        Appointment, AppointmentPage, AppointmentQuery, AppointmentSummary, BlockedSlotQuery,
        BlockedSlotResponse, UpdateAppointment,
    },
    scheduling::time_window,
};

use super::{local_now, PanelContext};

/// List appointments of the active hospital, ordered for display
#[utoipa::path(
    get,
    path = "/appointments",
    tag = "appointments",
    security(("hospital_id" = [])),
    params(AppointmentQuery),
    responses(
        (status = 200, description = "Page of appointments", body = AppointmentPage),
        (status = 400, description = "Malformed filter", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_appointments(
    State(state): State<crate::AppState>,
    ctx: PanelContext,
    Query(query): Query<AppointmentQuery>,
) -> AppResult<Json<AppointmentPage>> {
    let page = state
        .services
        .appointments
        .list_for_display(&ctx.hospital_id, &query, local_now())
        .await?;
    Ok(Json(page))
}

/// Appointment counts per display status
#[utoipa::path(
    get,
    path = "/appointments/summary",
    tag = "appointments",
    security(("hospital_id" = [])),
    responses(
        (status = 200, description = "Appointment counts", body = AppointmentSummary)
    )
)]
pub async fn appointment_summary(
    State(state): State<crate::AppState>,
    ctx: PanelContext,
) -> AppResult<Json<AppointmentSummary>> {
    let summary = state
        .services
        .appointments
        .summary(&ctx.hospital_id, local_now())
        .await?;
    Ok(Json(summary))
}

/// Update an appointment's status, schedule or notes
#[utoipa::path(
    put,
    path = "/appointments/{id}",
    tag = "appointments",
    security(("hospital_id" = [])),
    params(
        ("id" = String, Path, description = "Appointment ID")
    ),
    request_body = UpdateAppointment,
    responses(
        (status = 200, description = "Appointment updated", body = Appointment),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Appointment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_appointment(
    State(state): State<crate::AppState>,
    ctx: PanelContext,
    Path(id): Path<String>,
    Json(data): Json<UpdateAppointment>,
) -> AppResult<Json<Appointment>> {
    let appointment = state.services.appointments.update_appointment(&id, &data).await?;

    state
        .services
        .events
        .log_event(
            "appointment_updated",
            &ctx.hospital_id,
            ctx.user(),
            json!({
                "appointment_id": appointment.id,
                "status": appointment.status,
                "date": appointment.date,
                "time": appointment.time,
            }),
        )
        .await;

    Ok(Json(appointment))
}

/// Delete an appointment
#[utoipa::path(
    delete,
    path = "/appointments/{id}",
    tag = "appointments",
    security(("hospital_id" = [])),
    params(
        ("id" = String, Path, description = "Appointment ID")
    ),
    responses(
        (status = 204, description = "Appointment deleted"),
        (status = 404, description = "Appointment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_appointment(
    State(state): State<crate::AppState>,
    ctx: PanelContext,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.appointments.delete_appointment(&id).await?;

    state
        .services
        .events
        .log_event("appointment_deleted", &ctx.hospital_id, ctx.user(), json!({ "appointment_id": id }))
        .await;

    Ok(StatusCode::NO_CONTENT)
}

/// Whether a hospital holiday blocks the given slot
#[utoipa::path(
    get,
    path = "/appointments/blocked",
    tag = "appointments",
    security(("hospital_id" = [])),
    params(BlockedSlotQuery),
    responses(
        (status = 200, description = "Blocking verdict", body = BlockedSlotResponse),
        (status = 400, description = "Malformed date or time", body = crate::error::ErrorResponse)
    )
)]
pub async fn blocked_slot(
    State(state): State<crate::AppState>,
    ctx: PanelContext,
    Query(query): Query<BlockedSlotQuery>,
) -> AppResult<Json<BlockedSlotResponse>> {
    let date = time_window::parse_date(&query.date)?;
    let time = time_window::parse_time(&query.time)?;

    let blocked = state
        .services
        .appointments
        .is_appointment_time_blocked(&ctx.hospital_id, date, time)
        .await?;

    Ok(Json(BlockedSlotResponse {
        date: time_window::format_date(date),
        time: time_window::format_time(time),
        blocked,
    }))
}
