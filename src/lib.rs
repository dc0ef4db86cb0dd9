//! Hospital Panel
//!
//! REST JSON server behind a hospital administration panel: appointment
//! listing and lifecycle, hospital and doctor holidays, weekly working hours
//! and month calendars, on top of a PostgREST or Postgres data store.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod scheduling;
pub mod services;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
