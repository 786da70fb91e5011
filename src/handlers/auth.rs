use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use rusqlite::Connection;

use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::MemberRole;
use crate::state::AppState;

/// The account behind the request's `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount(pub String);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthenticatedAccount {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AppError::Unauthorized)?;

        let account = queries::account_for_token(&state.conn(), token)?;
        account.map(AuthenticatedAccount).ok_or(AppError::Unauthorized)
    }
}

/// Checks that `caller` manages `tenant_id` and that `personnel_id` works there.
pub fn require_manager_of(
    conn: &Connection,
    tenant_id: &str,
    caller: &str,
    personnel_id: &str,
) -> AppResult<()> {
    if queries::member_role(conn, tenant_id, caller)? != Some(MemberRole::Manager) {
        tracing::warn!(tenant_id = %tenant_id, account_id = %caller, "manager access denied");
        return Err(AppError::Forbidden);
    }
    if queries::member_role(conn, tenant_id, personnel_id)?.is_none() {
        return Err(AppError::NotFound("personnel".to_string()));
    }
    Ok(())
}
