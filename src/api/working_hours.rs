//! Working hours API endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::json;

use crate::{
    error::AppResult,
    models::working_hours::{WorkingHoursForm, WorkingHoursInitial},
    AppState,
};

use super::PanelContext;

/// Working hours of the active hospital, as edit form values
#[utoipa::path(
    get,
    path = "/hospital/working-hours",
    tag = "working-hours",
    security(("hospital_id" = [])),
    responses(
        (status = 200, description = "Hospital working hours", body = WorkingHoursInitial),
        (status = 404, description = "Hospital not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_hospital_hours(
    State(state): State<AppState>,
    ctx: PanelContext,
) -> AppResult<Json<WorkingHoursInitial>> {
    let initial = state.services.working_hours.get_hospital_hours(&ctx.hospital_id).await?;
    Ok(Json(initial))
}

/// Replace the working hours of the active hospital
#[utoipa::path(
    put,
    path = "/hospital/working-hours",
    tag = "working-hours",
    security(("hospital_id" = [])),
    request_body = WorkingHoursForm,
    responses(
        (status = 200, description = "Working hours updated", body = WorkingHoursInitial),
        (status = 400, description = "Invalid working hours", body = crate::error::ErrorResponse),
        (status = 404, description = "Hospital not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_hospital_hours(
    State(state): State<AppState>,
    ctx: PanelContext,
    Json(form): Json<WorkingHoursForm>,
) -> AppResult<Json<WorkingHoursInitial>> {
    let initial = state
        .services
        .working_hours
        .update_hospital_hours(&ctx.hospital_id, &form)
        .await?;

    state
        .services
        .events
        .log_event(
            "hospital_working_hours_updated",
            &ctx.hospital_id,
            ctx.user(),
            json!({ "is_open_24_hours": initial.is_open_24_hours }),
        )
        .await;

    Ok(Json(initial))
}

/// Working hours of a doctor, as edit form values
#[utoipa::path(
    get,
    path = "/doctors/{doctor_id}/working-hours",
    tag = "working-hours",
    security(("hospital_id" = [])),
    params(
        ("doctor_id" = String, Path, description = "Doctor ID")
    ),
    responses(
        (status = 200, description = "Doctor working hours", body = WorkingHoursInitial),
        (status = 404, description = "Doctor not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_doctor_hours(
    State(state): State<AppState>,
    _ctx: PanelContext,
    Path(doctor_id): Path<String>,
) -> AppResult<Json<WorkingHoursInitial>> {
    let initial = state.services.working_hours.get_doctor_hours(&doctor_id).await?;
    Ok(Json(initial))
}

/// Replace the working hours of a doctor
#[utoipa::path(
    put,
    path = "/doctors/{doctor_id}/working-hours",
    tag = "working-hours",
    security(("hospital_id" = [])),
    params(
        ("doctor_id" = String, Path, description = "Doctor ID")
    ),
    request_body = WorkingHoursForm,
    responses(
        (status = 200, description = "Working hours updated", body = WorkingHoursInitial),
        (status = 400, description = "Invalid working hours", body = crate::error::ErrorResponse),
        (status = 404, description = "Doctor not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_doctor_hours(
    State(state): State<AppState>,
    ctx: PanelContext,
    Path(doctor_id): Path<String>,
    Json(form): Json<WorkingHoursForm>,
) -> AppResult<Json<WorkingHoursInitial>> {
    let initial = state
        .services
        .working_hours
        .update_doctor_hours(&doctor_id, &form)
        .await?;

    state
        .services
        .events
        .log_event(
            "doctor_working_hours_updated",
            &ctx.hospital_id,
            ctx.user(),
            json!({ "doctor_id": doctor_id }),
        )
        .await;

    Ok(Json(initial))
}
