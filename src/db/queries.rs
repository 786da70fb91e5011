use chrono::{NaiveDateTime, NaiveTime, Weekday};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::models::schedule::{weekday_from_number, weekday_number};
use crate::models::{Appointment, BookedInterval, MemberRole, ScheduleWindow, Service};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const TIME_FORMAT: &str = "%H:%M:%S";

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

fn parse_datetime(idx: usize, s: &str) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_time(idx: usize, s: &str) -> rusqlite::Result<NaiveTime> {
    NaiveTime::parse_from_str(s, TIME_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

// ── Accounts & Sessions ──

pub fn create_account(conn: &Connection, email: &str) -> rusqlite::Result<String> {
    let id = new_id();
    conn.execute(
        "INSERT INTO accounts (id, email) VALUES (?1, ?2)",
        params![id, email],
    )?;
    Ok(id)
}

pub fn create_session(conn: &Connection, account_id: &str) -> rusqlite::Result<String> {
    let token = new_id();
    conn.execute(
        "INSERT INTO sessions (token, account_id) VALUES (?1, ?2)",
        params![token, account_id],
    )?;
    Ok(token)
}

pub fn account_for_token(conn: &Connection, token: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT account_id FROM sessions WHERE token = ?1",
        params![token],
        |row| row.get(0),
    )
    .optional()
}

// ── Tenants ──

pub fn create_tenant(conn: &Connection, name: &str) -> rusqlite::Result<String> {
    let id = new_id();
    conn.execute(
        "INSERT INTO tenants (id, name) VALUES (?1, ?2)",
        params![id, name],
    )?;
    Ok(id)
}

pub fn add_tenant_member(
    conn: &Connection,
    tenant_id: &str,
    account_id: &str,
    role: MemberRole,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO tenant_members (tenant_id, account_id, role) VALUES (?1, ?2, ?3)
         ON CONFLICT(tenant_id, account_id) DO UPDATE SET role = excluded.role",
        params![tenant_id, account_id, role.as_str()],
    )?;
    Ok(())
}

pub fn member_role(
    conn: &Connection,
    tenant_id: &str,
    account_id: &str,
) -> rusqlite::Result<Option<MemberRole>> {
    let role: Option<String> = conn
        .query_row(
            "SELECT role FROM tenant_members WHERE tenant_id = ?1 AND account_id = ?2",
            params![tenant_id, account_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(role.map(|r| MemberRole::parse(&r)))
}

// ── Schedules ──

pub fn upsert_schedule_window(conn: &Connection, window: &ScheduleWindow) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO schedules (personnel_id, weekday, starting_time, ending_time)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(personnel_id, weekday) DO UPDATE SET
           starting_time = excluded.starting_time,
           ending_time = excluded.ending_time",
        params![
            window.personnel_id,
            weekday_number(window.weekday),
            window.starting.format(TIME_FORMAT).to_string(),
            window.ending.format(TIME_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_schedule_window(
    conn: &Connection,
    personnel_id: &str,
    weekday: Weekday,
) -> rusqlite::Result<Option<ScheduleWindow>> {
    conn.query_row(
        "SELECT personnel_id, weekday, starting_time, ending_time
         FROM schedules WHERE personnel_id = ?1 AND weekday = ?2",
        params![personnel_id, weekday_number(weekday)],
        |row| {
            let weekday: i64 = row.get(1)?;
            let starting: String = row.get(2)?;
            let ending: String = row.get(3)?;
            Ok(ScheduleWindow {
                personnel_id: row.get(0)?,
                weekday: weekday_from_number(weekday).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(1, Type::Integer, Box::new(e))
                })?,
                starting: parse_time(2, &starting)?,
                ending: parse_time(3, &ending)?,
            })
        },
    )
    .optional()
}

// ── Services ──

pub fn create_service(
    conn: &Connection,
    tenant_id: &str,
    personnel_id: &str,
    name: &str,
    price_cents: i64,
    duration_minutes: i64,
) -> rusqlite::Result<String> {
    let id = new_id();
    conn.execute(
        "INSERT INTO services (id, tenant_id, personnel_id, name, price_cents, duration_minutes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![id, tenant_id, personnel_id, name, price_cents, duration_minutes],
    )?;
    Ok(id)
}

fn parse_service_row(row: &rusqlite::Row) -> rusqlite::Result<Service> {
    Ok(Service {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        personnel_id: row.get(2)?,
        name: row.get(3)?,
        price_cents: row.get(4)?,
        duration_minutes: row.get(5)?,
    })
}

pub fn get_service(conn: &Connection, id: &str) -> rusqlite::Result<Option<Service>> {
    conn.query_row(
        "SELECT id, tenant_id, personnel_id, name, price_cents, duration_minutes
         FROM services WHERE id = ?1",
        params![id],
        parse_service_row,
    )
    .optional()
}

pub fn list_services_for_personnel(
    conn: &Connection,
    tenant_id: &str,
    personnel_id: &str,
) -> rusqlite::Result<Vec<Service>> {
    let mut stmt = conn.prepare(
        "SELECT id, tenant_id, personnel_id, name, price_cents, duration_minutes
         FROM services WHERE tenant_id = ?1 AND personnel_id = ?2 ORDER BY created_at, name",
    )?;
    let rows = stmt.query_map(params![tenant_id, personnel_id], parse_service_row)?;
    rows.collect()
}

pub fn list_services_for_tenant(conn: &Connection, tenant_id: &str) -> rusqlite::Result<Vec<Service>> {
    let mut stmt = conn.prepare(
        "SELECT id, tenant_id, personnel_id, name, price_cents, duration_minutes
         FROM services WHERE tenant_id = ?1 ORDER BY created_at, name",
    )?;
    let rows = stmt.query_map(params![tenant_id], parse_service_row)?;
    rows.collect()
}

// ── Appointments ──

/// Appointments of a personnel starting in `[from, to)`, with the duration of
/// the service each one booked.
pub fn list_appointments(
    conn: &Connection,
    personnel_id: &str,
    from: &NaiveDateTime,
    to: &NaiveDateTime,
) -> rusqlite::Result<Vec<BookedInterval>> {
    let mut stmt = conn.prepare(
        "SELECT a.starting, s.duration_minutes
         FROM appointments a
         INNER JOIN services s ON s.id = a.service_id
         WHERE a.personnel_id = ?1 AND a.starting >= ?2 AND a.starting < ?3
         ORDER BY a.starting ASC",
    )?;

    let rows = stmt.query_map(
        params![personnel_id, format_datetime(from), format_datetime(to)],
        |row| {
            let starting: String = row.get(0)?;
            Ok(BookedInterval {
                starting: parse_datetime(0, &starting)?,
                duration_minutes: row.get(1)?,
            })
        },
    )?;
    rows.collect()
}

pub fn insert_appointment(conn: &Connection, appointment: &Appointment) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO appointments (id, service_id, personnel_id, account_id, starting)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            appointment.id,
            appointment.service_id,
            appointment.personnel_id,
            appointment.account_id,
            format_datetime(&appointment.starting),
        ],
    )?;
    Ok(())
}

pub fn get_appointment(conn: &Connection, id: &str) -> rusqlite::Result<Option<Appointment>> {
    conn.query_row(
        "SELECT id, service_id, personnel_id, account_id, starting FROM appointments WHERE id = ?1",
        params![id],
        |row| {
            let starting: String = row.get(4)?;
            Ok(Appointment {
                id: row.get(0)?,
                service_id: row.get(1)?,
                personnel_id: row.get(2)?,
                account_id: row.get(3)?,
                starting: parse_datetime(4, &starting)?,
            })
        },
    )
    .optional()
}

pub(crate) fn new_appointment_id() -> String {
    new_id()
}
