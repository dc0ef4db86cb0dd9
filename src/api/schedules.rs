//! Schedule API endpoints (calendar, hospital and doctor holidays)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Datelike;
use serde_json::json;

use crate::{
    error::AppResult,
    models::{
        calendar::{CalendarGrid, CalendarQuery},
        holiday::{CreateHoliday, Holiday, HolidayQuery, HolidayScope},
    },
    AppState,
};

use super::{local_now, PanelContext};

/// Month calendar of the hospital or of one doctor
#[utoipa::path(
    get,
    path = "/schedules/calendar",
    tag = "schedules",
    security(("hospital_id" = [])),
    params(CalendarQuery),
    responses(
        (status = 200, description = "Month grid", body = CalendarGrid),
        (status = 400, description = "Invalid month", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_calendar(
    State(state): State<AppState>,
    ctx: PanelContext,
    Query(query): Query<CalendarQuery>,
) -> AppResult<Json<CalendarGrid>> {
    let today = local_now().date();
    let doctor_id = query.doctor.as_deref().filter(|d| !d.trim().is_empty());

    let grid = state
        .services
        .schedules
        .build_calendar_data(
            &ctx.hospital_id,
            query.year.unwrap_or_else(|| today.year()),
            query.month.unwrap_or_else(|| today.month()),
            doctor_id,
            today,
        )
        .await?;
    Ok(Json(grid))
}

// ---- Hospital holidays ----

/// List holidays of the active hospital
#[utoipa::path(
    get,
    path = "/hospital/holidays",
    tag = "schedules",
    security(("hospital_id" = [])),
    params(HolidayQuery),
    responses(
        (status = 200, description = "Hospital holidays", body = Vec<Holiday>)
    )
)]
pub async fn list_hospital_holidays(
    State(state): State<AppState>,
    ctx: PanelContext,
    Query(query): Query<HolidayQuery>,
) -> AppResult<Json<Vec<Holiday>>> {
    let scope = HolidayScope::Hospital(ctx.hospital_id);
    let holidays = state.services.schedules.list_holidays(&scope, &query).await?;
    Ok(Json(holidays))
}

/// Add a hospital holiday
#[utoipa::path(
    post,
    path = "/hospital/holidays",
    tag = "schedules",
    security(("hospital_id" = [])),
    request_body = CreateHoliday,
    responses(
        (status = 201, description = "Holiday created", body = Holiday),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_hospital_holiday(
    State(state): State<AppState>,
    ctx: PanelContext,
    Json(data): Json<CreateHoliday>,
) -> AppResult<(StatusCode, Json<Holiday>)> {
    let scope = HolidayScope::Hospital(ctx.hospital_id.clone());
    let holiday = state.services.schedules.add_holiday(&scope, &data).await?;
    log_holiday_event(&state, &ctx, "hospital_holiday_added", &scope, &holiday.id).await;
    Ok((StatusCode::CREATED, Json(holiday)))
}

/// Delete a hospital holiday
#[utoipa::path(
    delete,
    path = "/hospital/holidays/{id}",
    tag = "schedules",
    security(("hospital_id" = [])),
    params(
        ("id" = String, Path, description = "Holiday ID")
    ),
    responses(
        (status = 204, description = "Holiday deleted"),
        (status = 404, description = "Holiday not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_hospital_holiday(
    State(state): State<AppState>,
    ctx: PanelContext,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let scope = HolidayScope::Hospital(ctx.hospital_id.clone());
    state.services.schedules.delete_holiday(&scope, &id).await?;
    log_holiday_event(&state, &ctx, "hospital_holiday_deleted", &scope, &id).await;
    Ok(StatusCode::NO_CONTENT)
}

// ---- Doctor holidays ----

/// List holidays of a doctor
#[utoipa::path(
    get,
    path = "/doctors/{doctor_id}/holidays",
    tag = "schedules",
    security(("hospital_id" = [])),
    params(
        ("doctor_id" = String, Path, description = "Doctor ID"),
        HolidayQuery
    ),
    responses(
        (status = 200, description = "Doctor holidays", body = Vec<Holiday>)
    )
)]
pub async fn list_doctor_holidays(
    State(state): State<AppState>,
    _ctx: PanelContext,
    Path(doctor_id): Path<String>,
    Query(query): Query<HolidayQuery>,
) -> AppResult<Json<Vec<Holiday>>> {
    let scope = HolidayScope::Doctor(doctor_id);
    let holidays = state.services.schedules.list_holidays(&scope, &query).await?;
    Ok(Json(holidays))
}

/// Add a doctor holiday
#[utoipa::path(
    post,
    path = "/doctors/{doctor_id}/holidays",
    tag = "schedules",
    security(("hospital_id" = [])),
    params(
        ("doctor_id" = String, Path, description = "Doctor ID")
    ),
    request_body = CreateHoliday,
    responses(
        (status = 201, description = "Holiday created", body = Holiday),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_doctor_holiday(
    State(state): State<AppState>,
    ctx: PanelContext,
    Path(doctor_id): Path<String>,
    Json(data): Json<CreateHoliday>,
) -> AppResult<(StatusCode, Json<Holiday>)> {
    let scope = HolidayScope::Doctor(doctor_id);
    let holiday = state.services.schedules.add_holiday(&scope, &data).await?;
    log_holiday_event(&state, &ctx, "doctor_holiday_added", &scope, &holiday.id).await;
    Ok((StatusCode::CREATED, Json(holiday)))
}

/// Delete a doctor holiday
#[utoipa::path(
    delete,
    path = "/doctors/{doctor_id}/holidays/{id}",
    tag = "schedules",
    security(("hospital_id" = [])),
    params(
        ("doctor_id" = String, Path, description = "Doctor ID"),
        ("id" = String, Path, description = "Holiday ID")
    ),
    responses(
        (status = 204, description = "Holiday deleted"),
        (status = 404, description = "Holiday not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_doctor_holiday(
    State(state): State<AppState>,
    ctx: PanelContext,
    Path((doctor_id, id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let scope = HolidayScope::Doctor(doctor_id);
    state.services.schedules.delete_holiday(&scope, &id).await?;
    log_holiday_event(&state, &ctx, "doctor_holiday_deleted", &scope, &id).await;
    Ok(StatusCode::NO_CONTENT)
}

async fn log_holiday_event(state: &AppState, ctx: &PanelContext, name: &str, scope: &HolidayScope, holiday_id: &str) {
    let (owner_column, owner_id) = scope.owner();
    let mut props = json!({ "holiday_id": holiday_id });
    props[owner_column] = json!(owner_id);

    state
        .services
        .events
        .log_event(name, &ctx.hospital_id, ctx.user(), props)
        .await;
}
