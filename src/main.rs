//! Hospital Panel Server
//!
//! REST API server for the hospital administration panel.

use anyhow::Context;
use axum::{
    routing::{delete, get, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hospital_panel::{
    api,
    config::{AppConfig, LoggingConfig},
    repository::Repository,
    services::Services,
    store, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    init_tracing(&config.logging);

    tracing::info!("Starting Hospital Panel v{}", env!("CARGO_PKG_VERSION"));

    let store = store::connect(&config.store)
        .await
        .context("Failed to set up the data store")?;

    tracing::info!(backend = ?config.store.backend, "Data store ready");

    // Save server address before moving config
    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    let services = Services::new(Repository::new(store));

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    let app = create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `RUST_LOG` wins over the configured level; `format = "json"` switches to
/// structured output
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("hospital_panel={},tower_http=debug", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Appointments
        .route("/appointments", get(api::appointments::list_appointments))
        .route("/appointments/summary", get(api::appointments::appointment_summary))
        .route("/appointments/blocked", get(api::appointments::blocked_slot))
        .route("/appointments/:id", put(api::appointments::update_appointment))
        .route("/appointments/:id", delete(api::appointments::delete_appointment))
        // Calendar
        .route("/schedules/calendar", get(api::schedules::get_calendar))
        // Hospital holidays and working hours
        .route(
            "/hospital/holidays",
            get(api::schedules::list_hospital_holidays).post(api::schedules::create_hospital_holiday),
        )
        .route("/hospital/holidays/:id", delete(api::schedules::delete_hospital_holiday))
        .route(
            "/hospital/working-hours",
            get(api::working_hours::get_hospital_hours).put(api::working_hours::update_hospital_hours),
        )
        // Doctor holidays and working hours
        .route(
            "/doctors/:doctor_id/holidays",
            get(api::schedules::list_doctor_holidays).post(api::schedules::create_doctor_holiday),
        )
        .route(
            "/doctors/:doctor_id/holidays/:id",
            delete(api::schedules::delete_doctor_holiday),
        )
        .route(
            "/doctors/:doctor_id/working-hours",
            get(api::working_hours::get_doctor_hours).put(api::working_hours::update_doctor_hours),
        )
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
