use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::errors::AppResult;
use crate::handlers::auth::AuthenticatedAccount;
use crate::handlers::extract::{AppJson, AppPath, AppQuery};
use crate::services::{availability, booking, catalog};
use crate::state::AppState;

// GET /tenants/:tenant_id/services/:service_id/timetable?date=YYYY-MM-DD
#[derive(Deserialize)]
pub struct TimetableQuery {
    pub date: NaiveDate,
}

#[derive(Serialize)]
pub struct TimetableResponse {
    times: Vec<NaiveDateTime>,
}

pub async fn timetable(
    State(state): State<Arc<AppState>>,
    AppPath((tenant_id, service_id)): AppPath<(String, String)>,
    AppQuery(query): AppQuery<TimetableQuery>,
) -> AppResult<Json<TimetableResponse>> {
    let conn = state.conn();
    let service = catalog::get_tenant_service(&conn, &tenant_id, &service_id)?;
    let times = availability::for_service(&conn, &service, query.date)?;
    Ok(Json(TimetableResponse { times }))
}

// POST /tenants/:tenant_id/services/:service_id/schedule
#[derive(Deserialize)]
pub struct CreateAppointmentRequest {
    pub starting: NaiveDateTime,
}

#[derive(Serialize)]
pub struct CreateAppointmentResponse {
    appointment_id: String,
}

pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    AppPath((tenant_id, service_id)): AppPath<(String, String)>,
    AuthenticatedAccount(caller): AuthenticatedAccount,
    AppJson(body): AppJson<CreateAppointmentRequest>,
) -> AppResult<(StatusCode, Json<CreateAppointmentResponse>)> {
    let mut conn = state.conn();
    let appointment =
        booking::create_appointment(&mut conn, &tenant_id, &service_id, &caller, body.starting)?;
    Ok((
        StatusCode::CREATED,
        Json(CreateAppointmentResponse {
            appointment_id: appointment.id,
        }),
    ))
}
