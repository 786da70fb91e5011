use rusqlite::Connection;

use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::{Service, SLOT_MINUTES};

pub const MAX_PRICE: f64 = 1_000_000.0;
const MAX_DURATION_MINUTES: i64 = 24 * 60;

/// Converts a price to whole cents, rounding half-up on its decimal value.
///
/// The price is first scaled to millionths so that inputs such as `4.205`,
/// whose binary value sits just below the half, still round up.
pub fn price_to_cents(price: f64) -> AppResult<i64> {
    if !price.is_finite() || !(0.0..=MAX_PRICE).contains(&price) {
        return Err(AppError::InvalidPrice);
    }
    let micros = (price * 1_000_000.0).round() as i64;
    Ok((micros + 5_000) / 10_000)
}

pub fn validate_duration(duration_minutes: i64) -> AppResult<()> {
    if duration_minutes <= 0
        || duration_minutes % SLOT_MINUTES != 0
        || duration_minutes > MAX_DURATION_MINUTES
    {
        return Err(AppError::InvalidDuration);
    }
    Ok(())
}

pub fn create_service(
    conn: &Connection,
    tenant_id: &str,
    personnel_id: &str,
    name: &str,
    price: f64,
    duration_minutes: i64,
) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("service name is required".to_string()));
    }
    let price_cents = price_to_cents(price)?;
    validate_duration(duration_minutes)?;

    let id = queries::create_service(
        conn,
        tenant_id,
        personnel_id,
        name,
        price_cents,
        duration_minutes,
    )?;

    tracing::info!(
        service_id = %id,
        tenant_id = %tenant_id,
        personnel_id = %personnel_id,
        price_cents,
        duration_minutes,
        "service created"
    );
    Ok(id)
}

pub fn get_service(conn: &Connection, service_id: &str) -> AppResult<Service> {
    queries::get_service(conn, service_id)?.ok_or(AppError::ServiceNotFound)
}

/// Like [`get_service`], but a service of another tenant does not resolve.
pub fn get_tenant_service(conn: &Connection, tenant_id: &str, service_id: &str) -> AppResult<Service> {
    let service = get_service(conn, service_id)?;
    if service.tenant_id != tenant_id {
        return Err(AppError::ServiceNotFound);
    }
    Ok(service)
}
