use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = if state.config.cors_allow_any {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    };

    Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/tenants/:tenant_id/personnel/:account_id/schedule",
            post(handlers::schedule::set_schedule),
        )
        .route(
            "/tenants/:tenant_id/personnel/:account_id/services",
            get(handlers::services::services_for_personnel)
                .post(handlers::services::create_service),
        )
        .route(
            "/tenants/:tenant_id/services",
            get(handlers::services::services_for_tenant),
        )
        .route(
            "/tenants/:tenant_id/services/:service_id/timetable",
            get(handlers::appointments::timetable),
        )
        .route(
            "/tenants/:tenant_id/services/:service_id/schedule",
            post(handlers::appointments::create_appointment),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
