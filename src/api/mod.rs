//! API handlers for the hospital panel REST endpoints

pub mod appointments;
pub mod health;
pub mod openapi;
pub mod schedules;
pub mod working_hours;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};

use chrono::{Local, NaiveDateTime};

use crate::{error::AppError, AppState};

pub const HOSPITAL_HEADER: &str = "x-hospital-id";
pub const USER_HEADER: &str = "x-user-id";

/// Active hospital and acting user of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelContext {
    pub hospital_id: String,
    pub user_id: Option<String>,
}

impl PanelContext {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AppError> {
        let hospital_id = header_value(headers, HOSPITAL_HEADER)
            .ok_or_else(|| AppError::BadRequest("Missing X-Hospital-Id header".to_string()))?;

        Ok(Self {
            hospital_id,
            user_id: header_value(headers, USER_HEADER),
        })
    }

    pub fn user(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}

/// Appointment dates and times are wall-clock values of the hospital
pub(crate) fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl FromRequestParts<AppState> for PanelContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &AppState) -> Result<Self, Self::Rejection> {
        PanelContext::from_headers(&parts.headers)
    }
}
