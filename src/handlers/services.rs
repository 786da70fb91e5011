use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppResult;
use crate::handlers::auth::{require_manager_of, AuthenticatedAccount};
use crate::handlers::extract::{AppJson, AppPath};
use crate::models::Service;
use crate::services::catalog;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateServiceRequest {
    pub service_name: String,
    pub price: f64,
    pub duration_minutes: i64,
}

#[derive(Serialize)]
pub struct CreateServiceResponse {
    service_id: String,
}

#[derive(Serialize)]
pub struct ServiceResponse {
    service_id: String,
    personnel_id: String,
    service_name: String,
    price: f64,
    duration_minutes: i64,
}

impl From<Service> for ServiceResponse {
    fn from(s: Service) -> Self {
        Self {
            price: s.price(),
            service_id: s.id,
            personnel_id: s.personnel_id,
            service_name: s.name,
            duration_minutes: s.duration_minutes,
        }
    }
}

#[derive(Serialize)]
pub struct ServicesResponse {
    services: Vec<ServiceResponse>,
}

impl From<Vec<Service>> for ServicesResponse {
    fn from(services: Vec<Service>) -> Self {
        Self {
            services: services.into_iter().map(ServiceResponse::from).collect(),
        }
    }
}

// POST /tenants/:tenant_id/personnel/:account_id/services
pub async fn create_service(
    State(state): State<Arc<AppState>>,
    AppPath((tenant_id, personnel_id)): AppPath<(String, String)>,
    AuthenticatedAccount(caller): AuthenticatedAccount,
    AppJson(body): AppJson<CreateServiceRequest>,
) -> AppResult<(StatusCode, Json<CreateServiceResponse>)> {
    let conn = state.conn();
    require_manager_of(&conn, &tenant_id, &caller, &personnel_id)?;

    let service_id = catalog::create_service(
        &conn,
        &tenant_id,
        &personnel_id,
        &body.service_name,
        body.price,
        body.duration_minutes,
    )?;
    Ok((StatusCode::CREATED, Json(CreateServiceResponse { service_id })))
}

// GET /tenants/:tenant_id/personnel/:account_id/services
pub async fn services_for_personnel(
    State(state): State<Arc<AppState>>,
    AppPath((tenant_id, personnel_id)): AppPath<(String, String)>,
) -> AppResult<Json<ServicesResponse>> {
    let services = queries::list_services_for_personnel(&state.conn(), &tenant_id, &personnel_id)?;
    Ok(Json(services.into()))
}

// GET /tenants/:tenant_id/services
pub async fn services_for_tenant(
    State(state): State<Arc<AppState>>,
    AppPath(tenant_id): AppPath<String>,
) -> AppResult<Json<ServicesResponse>> {
    let services = queries::list_services_for_tenant(&state.conn(), &tenant_id)?;
    Ok(Json(services.into()))
}
