//! Route definitions for the AgroSat Monitor API

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Protected routes - farm management and per-farm resources
        .nest("/farms", farm_routes())
        // Protected routes - alert mark-read
        .nest("/alerts", alert_routes())
        // Protected routes - task lifecycle
        .nest("/tasks", task_routes())
        // Protected routes - current user
        .nest("/users", user_routes())
        // Protected routes - dashboard weather passthrough
        .nest("/weather", weather_routes())
}

/// Farm management routes (protected)
fn farm_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_farms).post(handlers::create_farm))
        .route(
            "/:farm_id",
            get(handlers::get_farm).put(handlers::update_farm),
        )
        // Satellite readings
        .route(
            "/:farm_id/readings",
            get(handlers::list_readings).post(handlers::ingest_reading),
        )
        .route("/:farm_id/readings/backfill", post(handlers::backfill_readings))
        .route("/:farm_id/readings/latest", get(handlers::get_latest_reading))
        // Alert feed
        .route("/:farm_id/alerts", get(handlers::list_alerts))
        .route("/:farm_id/alerts/unread-count", get(handlers::get_unread_count))
        // Tasks
        .route("/:farm_id/tasks", get(handlers::list_tasks))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Alert routes (protected)
fn alert_routes() -> Router<AppState> {
    Router::new()
        .route("/:alert_id/read", post(handlers::mark_alert_as_read))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Task lifecycle routes (protected)
fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/:task_id/status", post(handlers::update_task_status))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Current user routes (protected)
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(handlers::get_profile))
        .route("/me/alert-preference", put(handlers::update_alert_preference))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Weather routes (protected)
fn weather_routes() -> Router<AppState> {
    Router::new()
        .route("/forecast", get(handlers::get_climate_summary))
        .route_layer(middleware::from_fn(auth_middleware))
}
