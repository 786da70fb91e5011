use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::NaiveTime;
use serde::Deserialize;

use crate::errors::AppResult;
use crate::handlers::auth::{require_manager_of, AuthenticatedAccount};
use crate::handlers::extract::{AppJson, AppPath};
use crate::models::ScheduleWindow;
use crate::services::schedule;
use crate::state::AppState;

// POST /tenants/:tenant_id/personnel/:account_id/schedule
#[derive(Deserialize)]
pub struct SetScheduleRequest {
    /// 0 (Sunday) through 6 (Saturday).
    pub weekday: i64,
    pub starting: NaiveTime,
    pub ending: NaiveTime,
}

pub async fn set_schedule(
    State(state): State<Arc<AppState>>,
    AppPath((tenant_id, personnel_id)): AppPath<(String, String)>,
    AuthenticatedAccount(caller): AuthenticatedAccount,
    AppJson(body): AppJson<SetScheduleRequest>,
) -> AppResult<Json<ScheduleWindow>> {
    let conn = state.conn();
    require_manager_of(&conn, &tenant_id, &caller, &personnel_id)?;

    let window = schedule::set_window(
        &conn,
        &personnel_id,
        body.weekday,
        body.starting,
        body.ending,
    )?;
    Ok(Json(window))
}
